use reqwest::StatusCode;
use thiserror::Error;

/// Why a rectifier could not be evaluated at all.
///
/// These never end up inside a [`Log`](catch_core::Log): they say the
/// remediation attempt failed, not the original operation.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),
    #[error("invalid target URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to encode rectifier: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl DispatchError {
    /// Status reported alongside a dispatch error.
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Error surfaced by the legacy form-encoded transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LegacyError {
    /// Remote side answered with a non-200 status and this error text
    #[error("{0}")]
    Remote(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}
