use catch_client::DispatchError;
use catch_core::Log;
use serde_json::json;

/// Exit codes: 0=success (2xx, non-fatal log), 1=client error (4xx),
/// 2=server error (5xx) or fatal log, 3=transport error, 4=usage error
pub const EXIT_OK: i32 = 0;
pub const EXIT_CLIENT: i32 = 1;
pub const EXIT_SERVER: i32 = 2;
pub const EXIT_TRANSPORT: i32 = 3;
pub const EXIT_USAGE: i32 = 4;

pub fn exit_error(message: &str, docs_hint: Option<&str>) -> ! {
    let mut err = json!({
        "error": "cli_error",
        "message": message
    });
    if let Some(hint) = docs_hint {
        err["docs_hint"] = json!(hint);
    }
    eprintln!("{}", render(&err, false));
    std::process::exit(EXIT_USAGE);
}

/// Exit code for a reply with `status` carrying `log`.
pub fn exit_code(status: u16, log: &Log) -> i32 {
    match status {
        _ if log.fatality() => EXIT_SERVER,
        200..=299 => EXIT_OK,
        400..=499 => EXIT_CLIENT,
        _ => EXIT_SERVER,
    }
}

/// Print a dispatch error the same way the API prints failures.
pub fn report_dispatch_error(err: &DispatchError, raw: bool) -> i32 {
    let code = match err {
        DispatchError::Transport(_) => EXIT_TRANSPORT,
        _ => EXIT_USAGE,
    };
    let out = json!({
        "error": "dispatch_error",
        "status": err.status().as_u16(),
        "message": err.to_string(),
        "docs_hint": "Is the target reachable? Check the rectifier's TargetDomain and Method."
    });
    eprintln!("{}", render(&out, raw));
    code
}

pub fn render(value: &serde_json::Value, raw: bool) -> String {
    let rendered = if raw {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    rendered.unwrap_or_else(|_| value.to_string())
}

/// Print to stdout on success, stderr otherwise.
pub fn emit(value: &serde_json::Value, raw: bool, exit_code: i32) {
    if exit_code == EXIT_OK {
        println!("{}", render(value, raw));
    } else {
        eprintln!("{}", render(value, raw));
    }
}

/// Read JSON from a file path or stdin (when path is "-").
pub fn read_json_from_file(path: &str) -> Result<serde_json::Value, String> {
    let raw = if path == "-" {
        std::io::read_to_string(std::io::stdin())
            .map_err(|e| format!("Failed to read stdin: {e}"))?
    } else {
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read file '{path}': {e}"))?
    };
    serde_json::from_str(&raw).map_err(|e| format!("Invalid JSON in '{path}': {e}"))
}
