use thiserror::Error;

/// Errors raised by the relay service itself, before any remote call.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The submitted rectifier is the nil sentinel
    #[error("rectifier has no target; nothing to enact")]
    NilRectifier,
    /// The submitted rectifier has a method but no target
    #[error("rectifier target domain is empty")]
    MissingTarget,
}
