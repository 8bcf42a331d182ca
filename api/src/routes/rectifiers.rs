//! Relay: enact a rectifier on behalf of a caller and hand back the remote
//! reply with its log merged into ours.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::{Router, routing::post};
use catch_core::{Log, Rectifier};

use crate::error::RelayError;
use crate::extract::EnvelopeJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/rectifiers/enact", post(enact))
}

pub async fn enact(
    State(state): State<AppState>,
    EnvelopeJson(rectifier): EnvelopeJson<Rectifier>,
) -> Response {
    if rectifier.is_nil() {
        return state.responder.handle_knockout_punch(
            StatusCode::UNPROCESSABLE_ENTITY,
            "relay.rectifier",
            &RelayError::NilRectifier,
        );
    }
    if rectifier.target_domain.is_empty() {
        return state.responder.handle_knockout_punch(
            StatusCode::UNPROCESSABLE_ENTITY,
            "relay.rectifier",
            &RelayError::MissingTarget,
        );
    }

    let mut log = Log::new();
    match state.dispatcher.enact(&rectifier).await {
        Ok(remediation) => {
            if remediation.is_anomalous() {
                log.add_message(format!(
                    "reply from {} carried no usable log (status {}, malformed: {})",
                    rectifier.target_domain,
                    remediation.status.as_u16(),
                    remediation.malformed
                ));
            }
            log.merge_logs(remediation.log);
            state
                .responder
                .send_response(remediation.status, log, remediation.body)
        }
        Err(err) => {
            log.add_new_failure_from_error(
                StatusCode::BAD_GATEWAY.as_u16().into(),
                "relay.transport",
                &err,
                true,
                Rectifier::nil(),
            );
            state.responder.handle_knockout(StatusCode::BAD_GATEWAY, log)
        }
    }
}
