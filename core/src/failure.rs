use std::error::Error;

use serde::{Deserialize, Serialize};

use crate::rectifier::Rectifier;

/// One detected error.
///
/// Once appended to a [`Log`](crate::Log) a failure is owned by it and never
/// changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Failure {
    /// HTTP status or application classification code. Any integer;
    /// producers may use negative or large values.
    pub code: i64,
    /// Component or operation that produced the failure
    pub origin: String,
    /// Rendered text of the underlying error
    pub message: String,
    /// Whether this failure alone aborts the request
    pub fatal: bool,
    /// Remediation, or the nil rectifier when none exists
    pub rectifier: Rectifier,
}

impl Failure {
    /// Build a failure from an error value.
    ///
    /// Returns `None` when the error renders to an empty string: a failure
    /// always carries a message.
    pub fn from_error(
        code: i64,
        origin: impl Into<String>,
        err: &(dyn Error + '_),
        fatal: bool,
        rectifier: Rectifier,
    ) -> Option<Self> {
        let message = err.to_string();
        if message.is_empty() {
            return None;
        }
        Some(Self {
            code,
            origin: origin.into(),
            message,
            fatal,
            rectifier,
        })
    }
}
