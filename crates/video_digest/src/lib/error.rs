#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed URL, unknown option value, empty transcript or question
    #[error("{0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No transcript available: {0}")]
    NoTranscript(String),

    /// Private, deleted or otherwise unplayable video
    #[error("Video unavailable: {0}")]
    VideoUnavailable(String),

    /// Every key in a pool failed with a rotate-class error
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Parse error: {0}")]
    ParseError(&'static str),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest_middleware::Error),
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::Http(value.into())
    }
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }
}
