//! Writing envelopes to outgoing responses.
//!
//! Success and failure go through the same path: a failed request is just a
//! response whose log has failures in it.

use std::error::Error;
use std::sync::Arc;

use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use catch_core::protocol::{
    FORM_CONTENT_TYPE, JSON_CONTENT_TYPE, LEGACY_ERROR_KEY, UNKNOWN_ERROR_MESSAGE,
};
use catch_core::{Envelope, Failure, Log, Protocol, Rectifier};
use serde::Serialize;
use serde_json::Value;

use crate::report::{FatalityReporter, TracingReporter};

/// An envelope ready to be sent with a status code.
#[derive(Debug, Clone)]
pub struct EnvelopeResponse {
    pub status: StatusCode,
    pub envelope: Envelope,
}

impl EnvelopeResponse {
    pub fn new(status: StatusCode, envelope: Envelope) -> Self {
        Self { status, envelope }
    }
}

impl IntoResponse for EnvelopeResponse {
    fn into_response(self) -> Response {
        match self.envelope.encode() {
            Ok(bytes) => (
                self.status,
                [
                    (CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE)),
                    (CONTENT_LENGTH, HeaderValue::from(bytes.len())),
                ],
                bytes,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode envelope");
                unknown_error_response(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

/// Emits envelopes for handlers, reporting fatal logs on the way out.
#[derive(Clone)]
pub struct Responder {
    protocol: Protocol,
    reporter: Arc<dyn FatalityReporter>,
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(Protocol::Envelope, Arc::new(TracingReporter))
    }
}

impl Responder {
    pub fn new(protocol: Protocol, reporter: Arc<dyn FatalityReporter>) -> Self {
        Self { protocol, reporter }
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Send `body` and `log` as one envelope with `status`.
    pub fn send_response(&self, status: StatusCode, log: Log, body: Option<Value>) -> Response {
        if log.fatality() {
            self.reporter.report(status, &log);
        }
        EnvelopeResponse::new(status, Envelope::new(body, log)).into_response()
    }

    /// [`Responder::send_response`] for a typed body. A body that cannot be
    /// serialized knocks the request out with a 500.
    pub fn send_json<T: Serialize>(&self, status: StatusCode, log: Log, body: &T) -> Response {
        match serde_json::to_value(body) {
            Ok(value) => self.send_response(status, log, Some(value)),
            Err(e) => {
                let mut log = log;
                log.add_new_failure_from_error(
                    StatusCode::INTERNAL_SERVER_ERROR.as_u16().into(),
                    "responder.encode",
                    &e,
                    true,
                    Rectifier::nil(),
                );
                self.handle_knockout(StatusCode::INTERNAL_SERVER_ERROR, log)
            }
        }
    }

    /// Respond with diagnostics only, no body.
    ///
    /// On the legacy transport this writes `error=<first failure message>`
    /// as a form-encoded body instead of an envelope.
    pub fn handle_knockout(&self, status: StatusCode, log: Log) -> Response {
        match self.protocol {
            Protocol::Envelope => self.send_response(status, log, None),
            Protocol::LegacyForm => {
                if log.fatality() {
                    self.reporter.report(status, &log);
                }
                let message = log.failures().first().map(|f| f.message.as_str());
                legacy_error_response(status, message)
            }
        }
    }

    /// Knock out with a single fatal failure that has no remediation.
    ///
    /// For errors that cannot be retried against any endpoint, such as a
    /// malformed request.
    pub fn handle_knockout_punch(
        &self,
        status: StatusCode,
        origin: &str,
        punch: &(dyn Error + '_),
    ) -> Response {
        self.handle_knockout(status, punch_log(status, origin, punch))
    }
}

/// A fresh log holding one fatal failure built from `punch` with the nil
/// rectifier.
pub fn punch_log(status: StatusCode, origin: &str, punch: &(dyn Error + '_)) -> Log {
    let code = i64::from(status.as_u16());
    let failure = Failure::from_error(code, origin, punch, true, Rectifier::nil())
        .unwrap_or_else(|| {
            tracing::warn!(origin, "Knockout punch with an empty error message");
            Failure {
                code,
                origin: origin.to_string(),
                message: UNKNOWN_ERROR_MESSAGE.to_string(),
                fatal: true,
                rectifier: Rectifier::nil(),
            }
        });
    let mut log = Log::new();
    log.add_failure(failure);
    log
}

/// `Responder::default().send_response(..)`.
pub fn send_response(status: StatusCode, log: Log, body: Option<Value>) -> Response {
    Responder::default().send_response(status, log, body)
}

/// `Responder::default().handle_knockout(..)`.
pub fn handle_knockout(status: StatusCode, log: Log) -> Response {
    Responder::default().handle_knockout(status, log)
}

/// `Responder::default().handle_knockout_punch(..)`.
pub fn handle_knockout_punch(status: StatusCode, origin: &str, punch: &(dyn Error + '_)) -> Response {
    Responder::default().handle_knockout_punch(status, origin, punch)
}

/// Form-encoded `error=...` body, or plain text when there is no message.
pub fn legacy_error_response(status: StatusCode, message: Option<&str>) -> Response {
    match message {
        Some(message) => {
            let body = url::form_urlencoded::Serializer::new(String::new())
                .append_pair(LEGACY_ERROR_KEY, message)
                .finish();
            (
                status,
                [
                    (CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE)),
                    (CONTENT_LENGTH, HeaderValue::from(body.len())),
                ],
                body,
            )
                .into_response()
        }
        None => unknown_error_response(status),
    }
}

fn unknown_error_response(status: StatusCode) -> Response {
    (
        status,
        [
            (CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8")),
            (CONTENT_LENGTH, HeaderValue::from(UNKNOWN_ERROR_MESSAGE.len())),
        ],
        UNKNOWN_ERROR_MESSAGE,
    )
        .into_response()
}
