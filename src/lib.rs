pub mod cache;
pub mod config;
pub mod debug;
pub mod error;
pub mod models;
pub mod services;

pub use cache::{Cache, CacheKey, FileStorage, MemoryStorage, Storage};
pub use config::Config;
pub use debug::{DebugBuffer, DebugCategory, DebugEvent, DebugSink};
pub use error::{AppError, AppResult};
pub use models::{Catalog, ShowRecord};
pub use services::{GeminiClient, ModelClient, QueryService};
