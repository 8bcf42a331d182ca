//! JSON extractor whose rejections are knockout punches.
//!
//! Use `EnvelopeJson<T>` in place of `axum::Json<T>`. A body that fails to
//! parse is answered with a fatal, non-rectifiable envelope instead of
//! axum's plain-text rejection.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, FromRequest, Request};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use crate::responder::{Responder, punch_log};

pub struct EnvelopeJson<T>(pub T);

impl<S, T> FromRequest<S> for EnvelopeJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    Responder: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(EnvelopeJson(value)),
            Err(rejection) => Err(knockout_rejection(&Responder::from_ref(state), rejection)),
        }
    }
}

/// Turn a `JsonRejection` into a 400 knockout punch with a field hint
/// message. axum's own rejection status is not used.
pub fn knockout_rejection(responder: &Responder, rejection: JsonRejection) -> Response {
    let status = StatusCode::BAD_REQUEST;
    let mut log = punch_log(status, "request.body", &rejection);
    if let Some(field) = extract_field_from_serde_message(&rejection.body_text()) {
        log.add_message(format!("field: {field}"));
    }
    responder.handle_knockout(status, log)
}

/// Try to extract a field name from serde's error messages.
fn extract_field_from_serde_message(msg: &str) -> Option<String> {
    for pattern in ["missing field `", "unknown field `"] {
        if let Some(start) = msg.find(pattern) {
            let after = &msg[start + pattern.len()..];
            if let Some(end) = after.find('`') {
                return Some(after[..end].to_string());
            }
        }
    }
    None
}
