//! Where fatal logs go before they are written to the wire.

use axum::http::StatusCode;
use catch_core::Log;

/// Receives every fatal log the responder emits.
///
/// Implement this to forward fatalities to an external diagnostics service.
pub trait FatalityReporter: Send + Sync {
    fn report(&self, status: StatusCode, log: &Log);
}

/// Writes fatal logs to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl FatalityReporter for TracingReporter {
    fn report(&self, status: StatusCode, log: &Log) {
        let fatal: Vec<String> = log
            .failures()
            .iter()
            .filter(|f| f.fatal)
            .map(|f| format!("{} {}: {}", f.code, f.origin, f.message))
            .collect();
        tracing::error!(
            status = status.as_u16(),
            failures = log.failures().len(),
            fatal = ?fatal,
            "Fatal log emitted"
        );
    }
}
