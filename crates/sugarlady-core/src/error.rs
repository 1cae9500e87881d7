use thiserror::Error;

/// Top-level error type for Sugarlady.
#[derive(Debug, Error)]
pub enum SugarladyError {
    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
}

/// Failure kinds from the generative-text backend.
///
/// Every variant is recoverable inside a reply worker: the worker turns the
/// error into a visible fallback reply instead of propagating it.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The request never produced an HTTP response.
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),
}
