/// Application-level errors
///
/// Every variant renders a single human-readable message suitable for
/// direct display next to a retry affordance. Nothing here is retried
/// automatically.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("No data received from the model. The response was empty.")]
    EmptyResponse,

    #[error("Invalid JSON received from the model: {0}")]
    MalformedPayload(String),

    #[error("Model response JSON was not an array.")]
    UnexpectedShape,

    #[error("Request timed out for {0}. The service may be experiencing high load. Please try again.")]
    Timeout(String),

    #[error("Could not fetch {0} data. Please try again later.")]
    CallFailed(String),

    #[error("Could not load content from any streaming catalog. Please try again.")]
    AllSourcesFailed,

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the underlying failure looks like an upstream timeout.
    ///
    /// The model boundary has no dedicated timer; timeouts are recognized
    /// by matching known indicators in the error text.
    pub fn is_timeout(&self) -> bool {
        let text = self.to_string();
        text.contains("timeout") || text.contains("timed out") || text.contains("DEADLINE_EXCEEDED")
    }
}

pub type AppResult<T> = Result<T, AppError>;
