pub mod extract;
pub mod model;
pub mod normalize;
pub mod prompts;
pub mod query;

pub use model::{GeminiClient, ModelClient};
pub use query::QueryService;
