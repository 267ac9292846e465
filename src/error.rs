//! Unified error type.

use thiserror::Error;

/// A boxed, thread-safe error, used where the concrete source type is
/// erased (request body transports, free-form handler failures).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type returned by ringmaster's fallible operations.
///
/// Client-facing outcomes (404, 400) are expressed as HTTP responses, not as
/// `Error`s. Everything here is either a configuration mistake caught at
/// startup or a failure that the dispatcher turns into a generic 500.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// The request body stream failed before end-of-input.
    #[error("reading request body: {0}")]
    Body(#[source] BoxError),

    #[error("unsupported method `{0}`")]
    UnsupportedMethod(String),

    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: &'static str },

    #[error("config: {0}")]
    Config(String),

    /// `send`/`json` was called after the response had already been sent.
    #[error("response already finalized")]
    AlreadyFinalized,

    #[error("{0}")]
    Handler(String),
}

impl Error {
    /// Free-form failure raised from a handler or middleware.
    pub fn handler(msg: impl Into<String>) -> Self {
        Self::Handler(msg.into())
    }
}
