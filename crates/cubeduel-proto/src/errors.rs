//! Protocol error types.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while decoding or encoding envelopes.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Frame text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Frame is valid JSON but not an object.
    #[error("envelope is not a JSON object")]
    NotAnObject,

    /// Envelope has no `type` field, or it is not a string.
    #[error("envelope has no string `type` field")]
    MissingType,
}
