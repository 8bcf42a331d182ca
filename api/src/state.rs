use std::sync::Arc;

use axum::extract::FromRef;
use catch_client::Dispatcher;
use catch_core::Protocol;

use crate::report::TracingReporter;
use crate::responder::Responder;

#[derive(Clone)]
pub struct AppState {
    pub responder: Responder,
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Protocol from `CATCH_PROTOCOL`, fatal logs to tracing.
    pub fn from_env() -> Self {
        Self {
            responder: Responder::new(Protocol::from_env(), Arc::new(TracingReporter)),
            dispatcher: Dispatcher::new(catch_client::client()),
        }
    }
}

impl FromRef<AppState> for Responder {
    fn from_ref(state: &AppState) -> Self {
        state.responder.clone()
    }
}
