use catch_client::{Dispatcher, LegacyError};
use catch_core::Rectifier;
use clap::Args;
use serde_json::json;

use crate::util::{
    EXIT_CLIENT, EXIT_OK, EXIT_SERVER, emit, exit_code, exit_error, read_json_from_file,
    report_dispatch_error,
};

#[derive(Args)]
pub struct EnactArgs {
    /// Rectifier JSON file (use '-' for stdin)
    #[arg(long, short = 'f')]
    pub file: String,

    /// Target speaks the legacy form-encoded error transport
    #[arg(long)]
    pub legacy: bool,

    /// Skip pretty-printing (raw JSON for piping)
    #[arg(long)]
    pub raw: bool,
}

pub async fn run(args: EnactArgs) -> i32 {
    let value = match read_json_from_file(&args.file) {
        Ok(v) => v,
        Err(e) => exit_error(&e, Some("Create one with `catch rectifier new`.")),
    };
    let rectifier: Rectifier = match serde_json::from_value(value) {
        Ok(r) => r,
        Err(e) => exit_error(&format!("Not a rectifier: {e}"), None),
    };
    if rectifier.is_nil() {
        exit_error(
            "Rectifier is nil; there is nothing to enact.",
            Some("A nil rectifier marks a failure that cannot be remediated."),
        );
    }

    let dispatcher = Dispatcher::new(catch_client::client());
    if args.legacy {
        return enact_legacy(&dispatcher, &rectifier, args.raw).await;
    }

    match dispatcher.enact(&rectifier).await {
        Ok(reply) => {
            let code = exit_code(reply.status.as_u16(), &reply.log);
            emit(
                &json!({
                    "status": reply.status.as_u16(),
                    "body": reply.body,
                    "log": reply.log,
                    "malformed": reply.malformed,
                }),
                args.raw,
                code,
            );
            code
        }
        Err(e) => report_dispatch_error(&e, args.raw),
    }
}

async fn enact_legacy(dispatcher: &Dispatcher, rectifier: &Rectifier, raw: bool) -> i32 {
    let reply = match dispatcher.enact_legacy(rectifier).await {
        Ok(r) => r,
        Err(e) => return report_dispatch_error(&e, raw),
    };
    let status = reply.status.as_u16();
    match reply.outcome {
        Ok(bytes) => {
            let body = String::from_utf8_lossy(&bytes);
            emit(&json!({"status": status, "body": body}), raw, EXIT_OK);
            EXIT_OK
        }
        Err(LegacyError::Remote(message)) => {
            let code = if (400..500).contains(&status) {
                EXIT_CLIENT
            } else {
                EXIT_SERVER
            };
            emit(&json!({"status": status, "error": message}), raw, code);
            code
        }
        Err(e) => {
            emit(&json!({"status": status, "error": e.to_string()}), raw, EXIT_SERVER);
            EXIT_SERVER
        }
    }
}
