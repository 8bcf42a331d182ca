//! Server side of the Catch protocol for axum services.

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod extract;
pub mod report;
pub mod responder;
pub mod routes;
pub mod state;

pub use extract::EnvelopeJson;
pub use report::{FatalityReporter, TracingReporter};
pub use responder::{
    EnvelopeResponse, Responder, handle_knockout, handle_knockout_punch, send_response,
};
pub use state::AppState;

/// The relay service router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::rectifiers::router())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
