use thiserror::Error;

/// Errors raised while converting protocol values to or from wire bytes.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A value could not be rendered as JSON
    #[error("failed to encode payload: {0}")]
    Encode(#[source] serde_json::Error),
    /// Incoming bytes were not a valid envelope
    #[error("failed to decode envelope: {0}")]
    Decode(#[source] serde_json::Error),
}
