use catch_client::Dispatcher;
use catch_core::Rectifier;
use serde_json::{Value, json};

use crate::util::{emit, exit_code, report_dispatch_error};

pub async fn run(api_url: &str, raw: bool) -> i32 {
    let probe = Rectifier::with_path("GET", api_url, "/health", "", Value::Null);
    match Dispatcher::new(catch_client::client()).enact(&probe).await {
        Ok(reply) => {
            let code = exit_code(reply.status.as_u16(), &reply.log);
            emit(
                &json!({
                    "status": reply.status.as_u16(),
                    "body": reply.body,
                    "log": reply.log,
                }),
                raw,
                code,
            );
            code
        }
        Err(e) => report_dispatch_error(&e, raw),
    }
}
