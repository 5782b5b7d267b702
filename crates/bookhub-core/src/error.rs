use thiserror::Error;

/// Top-level error type for BookHub.
#[derive(Debug, Error)]
pub enum BookhubError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Transport-level failure while fetching a resource.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// A resource answered with a non-success status.
    #[error("resource {path} returned status {status}")]
    Status { path: String, status: u16 },

    /// Durable storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Page template or rendering error.
    #[error("render error: {0}")]
    Render(String),

    /// A language code that cannot be used to address a resource.
    #[error("invalid language code: {0:?}")]
    InvalidLanguage(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
