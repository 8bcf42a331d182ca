//! Wire constants and the protocol-variant switch.

use std::str::FromStr;

/// Content type of every envelope response and rectifier request.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Content type of legacy form-encoded error responses.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Body used when an error response has no error value to report.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Encountered unknown error";

/// Form key carrying the error text on the legacy transport.
pub const LEGACY_ERROR_KEY: &str = "error";

/// Which wire format a remote endpoint speaks.
///
/// `Envelope` is the structured `{Body, Log}` format. `LegacyForm` is the
/// older transport where non-200 responses carry a form-encoded `error` key
/// and nothing else. Callers must know which one the other side implements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Protocol {
    #[default]
    Envelope,
    LegacyForm,
}

impl Protocol {
    /// Read `CATCH_PROTOCOL`, falling back to [`Protocol::Envelope`] when it is
    /// unset or unrecognised.
    pub fn from_env() -> Self {
        std::env::var("CATCH_PROTOCOL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Envelope => "envelope",
            Protocol::LegacyForm => "legacy-form",
        }
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "envelope" | "json" => Ok(Protocol::Envelope),
            "legacy" | "legacy-form" | "form" => Ok(Protocol::LegacyForm),
            other => Err(format!("unknown protocol '{other}'")),
        }
    }
}
