use crate::error::AppResult;

pub mod gemini;

pub use gemini::GeminiClient;

/// Generative model boundary
///
/// The pipeline treats the model as an opaque asynchronous call: prompt in,
/// one text blob out. Implementations own their transport, grounding, and
/// safety configuration.
#[async_trait::async_trait]
pub trait ModelClient: Send + Sync {
    /// Runs one generation call and returns the raw response text
    async fn generate(&self, prompt: &str) -> AppResult<String>;

    /// Model name for logging and debugging
    fn name(&self) -> &'static str;
}
