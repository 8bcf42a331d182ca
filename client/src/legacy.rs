//! The older transport where errors come back as form-encoded `error=...`
//! bodies instead of envelopes.

use catch_core::Rectifier;
use catch_core::protocol::{LEGACY_ERROR_KEY, UNKNOWN_ERROR_MESSAGE};
use reqwest::StatusCode;

use crate::dispatch::{Dispatcher, read_body};
use crate::error::{DispatchError, LegacyError};

/// Reply from an endpoint speaking the legacy transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyReply {
    pub status: StatusCode,
    /// Raw body on 200, otherwise the remote error text
    pub outcome: Result<Vec<u8>, LegacyError>,
}

/// Read a legacy response: the raw body on 200, the `error` form field as
/// [`LegacyError::Remote`] on anything else.
pub async fn read_legacy_stream(response: reqwest::Response) -> Result<Vec<u8>, LegacyError> {
    let status = response.status();
    let bytes = read_body(response)
        .await
        .map_err(|e| LegacyError::Body(e.to_string()))?;

    if status == StatusCode::OK {
        return Ok(bytes);
    }

    let message = parse_legacy_error(&bytes).unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string());
    Err(LegacyError::Remote(message))
}

/// Pull the non-empty `error` value out of a form-encoded body.
pub fn parse_legacy_error(bytes: &[u8]) -> Option<String> {
    url::form_urlencoded::parse(bytes)
        .find(|(key, _)| key == LEGACY_ERROR_KEY)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

impl Dispatcher {
    /// Enact against an endpoint that speaks the legacy transport.
    ///
    /// Request construction and transport failures are still returned as
    /// [`DispatchError`]; remote errors land in [`LegacyReply::outcome`].
    pub async fn enact_legacy(&self, rectifier: &Rectifier) -> Result<LegacyReply, DispatchError> {
        let response = self.build_request(rectifier)?.send().await?;
        let status = response.status();
        let outcome = read_legacy_stream(response).await;
        if let Err(e) = &outcome {
            tracing::debug!(status = status.as_u16(), error = %e, "Legacy rectifier rejected");
        }
        Ok(LegacyReply { status, outcome })
    }
}
