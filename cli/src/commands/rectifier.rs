use catch_core::Rectifier;
use clap::Subcommand;
use serde_json::Value;

use crate::util::{EXIT_OK, exit_error, render};

#[derive(Subcommand)]
pub enum RectifierCommands {
    /// Build a rectifier and print it as JSON
    New {
        /// HTTP method (empty means GET)
        #[arg(long, default_value = "POST")]
        method: String,
        /// Base URL of the remediation service (e.g. http://billing.local)
        #[arg(long)]
        domain: String,
        /// Path appended to the domain as-is (e.g. /v1/invoices/retry)
        #[arg(long, default_value = "")]
        path: String,
        /// Already-encoded query string, without the leading '?'
        #[arg(long, default_value = "")]
        query: String,
        /// Remediation payload as a JSON string
        #[arg(long)]
        payload: Option<String>,
        /// Skip pretty-printing
        #[arg(long)]
        raw: bool,
    },
}

pub fn run(command: RectifierCommands) -> i32 {
    match command {
        RectifierCommands::New {
            method,
            domain,
            path,
            query,
            payload,
            raw,
        } => {
            let rectifier = match build(&method, &domain, &path, &query, payload.as_deref()) {
                Ok(r) => r,
                Err(e) => exit_error(&e, Some("--payload must be valid JSON, e.g. '{\"id\":7}'")),
            };
            match serde_json::to_value(&rectifier) {
                Ok(v) => println!("{}", render(&v, raw)),
                Err(e) => exit_error(&format!("Failed to encode rectifier: {e}"), None),
            }
            EXIT_OK
        }
    }
}

fn build(
    method: &str,
    domain: &str,
    path: &str,
    query: &str,
    payload: Option<&str>,
) -> Result<Rectifier, String> {
    let payload = match payload {
        Some(p) => serde_json::from_str(p).map_err(|e| format!("Invalid JSON in --payload: {e}"))?,
        None => Value::Null,
    };
    Ok(Rectifier::with_path(method, domain, path, query, payload))
}
