//! Enacting rectifiers over the envelope protocol.

use catch_core::protocol::JSON_CONTENT_TYPE;
use catch_core::{Envelope, Log, Rectifier};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::error::DispatchError;

/// Upper bound on how much buffer a declared `Content-Length` may reserve up
/// front. Longer bodies still read fine, they just grow the buffer.
const MAX_PRESIZE: u64 = 1024 * 1024;

/// What came back from a remediation request.
///
/// Same shape as a normal reply, so `log` can be merged straight into the
/// caller's own log.
#[derive(Debug, Clone, PartialEq)]
pub struct Remediation {
    pub body: Option<Value>,
    pub status: StatusCode,
    pub log: Log,
    /// The reply was not a valid envelope; `body` and `log` are empty
    pub malformed: bool,
}

impl Remediation {
    /// Empty log with a non-2xx status, or unparseable bytes.
    pub fn is_anomalous(&self) -> bool {
        self.malformed || (!self.status.is_success() && self.log.is_empty())
    }
}

impl DispatchError {
    /// Split into the `(body, status, log, error)` shape of a failed
    /// enactment: no body, 500, an empty log and the error itself.
    pub fn into_parts(self) -> (Option<Value>, StatusCode, Log, DispatchError) {
        (None, self.status(), Log::default(), self)
    }
}

/// Issues rectifier requests with a shared HTTP client.
///
/// One call is one round-trip. There is no retry and no timeout here; set a
/// timeout on the `reqwest::Client` if you need one.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    client: reqwest::Client,
}

impl Dispatcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Send the rectifier (payload included) to its target and decode the
    /// envelope that comes back.
    pub async fn enact(&self, rectifier: &Rectifier) -> Result<Remediation, DispatchError> {
        let request = self.build_request(rectifier)?;
        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    method = %rectifier.method,
                    url = %rectifier.target_url(),
                    "Rectifier request failed"
                );
                return Err(e.into());
            }
        };

        let status = response.status();
        let bytes = read_body(response).await?;
        let decoded = Envelope::decode(&bytes);
        if decoded.is_anomalous(status.as_u16()) {
            tracing::warn!(
                status = status.as_u16(),
                malformed = decoded.malformed,
                url = %rectifier.target_url(),
                "Rectifier reply carried no usable log"
            );
        }
        tracing::debug!(
            status = status.as_u16(),
            failures = decoded.envelope.log.failures().len(),
            fatal = decoded.envelope.log.fatality(),
            "Rectifier enacted"
        );

        let malformed = decoded.malformed;
        let (body, log) = decoded.envelope.into_parts();
        Ok(Remediation {
            body,
            status,
            log,
            malformed,
        })
    }

    pub(crate) fn build_request(
        &self,
        rectifier: &Rectifier,
    ) -> Result<reqwest::RequestBuilder, DispatchError> {
        let method = parse_method(&rectifier.method)?;
        let target = rectifier.target_url();
        let url = reqwest::Url::parse(&target).map_err(|source| DispatchError::InvalidUrl {
            url: target.clone(),
            source,
        })?;
        let body = serde_json::to_vec(rectifier).map_err(DispatchError::Encode)?;

        tracing::debug!(%method, url = %target, "Enacting rectifier");
        Ok(self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body))
    }
}

/// Enact with a fresh default client.
pub async fn enact_rectifier(rectifier: &Rectifier) -> Result<Remediation, DispatchError> {
    Dispatcher::new(crate::client()).enact(rectifier).await
}

fn parse_method(method: &str) -> Result<Method, DispatchError> {
    if method.is_empty() {
        return Ok(Method::GET);
    }
    Method::from_bytes(method.as_bytes())
        .map_err(|_| DispatchError::InvalidMethod(method.to_string()))
}

/// Read the whole body. The declared length only sizes the initial buffer.
pub(crate) async fn read_body(mut response: reqwest::Response) -> Result<Vec<u8>, reqwest::Error> {
    let hint = response.content_length().unwrap_or(0).min(MAX_PRESIZE) as usize;
    let mut buf = Vec::with_capacity(hint);
    while let Some(chunk) = response.chunk().await? {
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Bytes;
    use axum::extract::RawQuery;
    use axum::http::{HeaderMap, StatusCode as AxumStatus, header};
    use axum::response::IntoResponse;
    use axum::routing::{any, post};
    use catch_core::Failure;
    use serde_json::json;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("listener should have an address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server should run");
        });
        format!("http://{addr}")
    }

    async fn created() -> impl IntoResponse {
        (
            AxumStatus::CREATED,
            [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)],
            r#"{"Body":{"id":7},"Log":{"Fatality":false,"Failures":[],"Messages":[]}}"#,
        )
    }

    // Replies with what it received so tests can inspect the request.
    async fn echo(RawQuery(query): RawQuery, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
        let rectifier: Rectifier =
            serde_json::from_slice(&body).expect("request body should be a rectifier");
        let mut log = Log::new();
        log.add_message(format!("query={}", query.unwrap_or_default()));
        log.add_message(format!(
            "content-type={}",
            headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
        ));
        let envelope = Envelope::new(Some(rectifier.rectify), log);
        (
            AxumStatus::OK,
            envelope.encode().expect("envelope should encode"),
        )
    }

    async fn fatal() -> impl IntoResponse {
        let mut log = Log::new();
        log.add_failure(Failure {
            code: 409,
            origin: "ledger".to_string(),
            message: "entry already closed".to_string(),
            fatal: true,
            rectifier: Rectifier::nil(),
        });
        (
            AxumStatus::CONFLICT,
            Envelope::knockout(log).encode().expect("envelope should encode"),
        )
    }

    async fn html() -> impl IntoResponse {
        (AxumStatus::BAD_GATEWAY, "<html>bad gateway</html>")
    }

    #[tokio::test]
    async fn enact_decodes_created_reply() {
        let base = serve(Router::new().route("/v1/orders", post(created))).await;
        let rectifier = Rectifier::with_path("POST", &base, "/v1/orders", "", json!({"sku": "a"}));

        let remediation = Dispatcher::default()
            .enact(&rectifier)
            .await
            .expect("reachable host should answer");

        assert_eq!(remediation.status, StatusCode::CREATED);
        assert_eq!(remediation.body, Some(json!({"id": 7})));
        assert!(remediation.log.is_empty());
        assert!(!remediation.malformed);
        assert!(!remediation.is_anomalous());
    }

    #[tokio::test]
    async fn enact_sends_rectifier_payload_and_query() {
        let base = serve(Router::new().route("/retry", any(echo))).await;
        let rectifier = Rectifier::with_path(
            "PUT",
            &base,
            "/retry",
            "invoice=42&force=true",
            json!({"invoice": 42}),
        );

        let remediation = enact_rectifier(&rectifier)
            .await
            .expect("reachable host should answer");

        assert_eq!(remediation.body, Some(json!({"invoice": 42})));
        assert_eq!(
            remediation.log.messages(),
            [
                "query=invoice=42&force=true".to_string(),
                format!("content-type={JSON_CONTENT_TYPE}"),
            ]
        );
    }

    #[tokio::test]
    async fn empty_method_is_sent_as_get() {
        let base = serve(Router::new().route("/retry", axum::routing::get(echo))).await;
        let rectifier = Rectifier::with_path("", &base, "/retry", "", Value::Null);

        let remediation = Dispatcher::default()
            .enact(&rectifier)
            .await
            .expect("reachable host should answer");
        assert_eq!(remediation.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn enact_returns_remote_fatal_log() {
        let base = serve(Router::new().route("/close", post(fatal))).await;
        let rectifier = Rectifier::with_path("POST", &base, "/close", "", Value::Null);

        let remediation = Dispatcher::default()
            .enact(&rectifier)
            .await
            .expect("reachable host should answer");

        assert_eq!(remediation.status, StatusCode::CONFLICT);
        assert_eq!(remediation.body, None);
        assert!(remediation.log.fatality());
        assert_eq!(remediation.log.failures()[0].origin, "ledger");

        let mut local = Log::new();
        local.merge_logs(remediation.log);
        assert!(local.fatality());
    }

    #[tokio::test]
    async fn non_envelope_reply_is_flagged_malformed() {
        let base = serve(Router::new().route("/", post(html))).await;
        let rectifier = Rectifier::with_path("POST", &base, "/", "", Value::Null);

        let remediation = Dispatcher::default()
            .enact(&rectifier)
            .await
            .expect("reachable host should answer");

        assert_eq!(remediation.status, StatusCode::BAD_GATEWAY);
        assert!(remediation.malformed);
        assert!(remediation.is_anomalous());
        assert_eq!(remediation.body, None);
        assert!(remediation.log.is_empty());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("listener should have an address");
        drop(listener);

        let rectifier =
            Rectifier::with_path("POST", &format!("http://{addr}"), "/gone", "", Value::Null);
        let err = Dispatcher::default()
            .enact(&rectifier)
            .await
            .expect_err("closed port should refuse");

        assert!(matches!(err, DispatchError::Transport(_)));
        let (body, status, log, err) = err.into_parts();
        assert_eq!(body, None);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(log.is_empty());
        assert!(matches!(err, DispatchError::Transport(_)));
    }

    #[tokio::test]
    async fn bad_method_fails_before_sending() {
        let rectifier = Rectifier::with_path("NOT VALID", "http://127.0.0.1", "/", "", Value::Null);
        let err = Dispatcher::default()
            .enact(&rectifier)
            .await
            .expect_err("method with a space is invalid");
        assert!(matches!(err, DispatchError::InvalidMethod(m) if m == "NOT VALID"));
    }

    #[tokio::test]
    async fn bad_url_fails_before_sending() {
        let rectifier = Rectifier::with_path("GET", "not a url", "", "", Value::Null);
        let err = Dispatcher::default()
            .enact(&rectifier)
            .await
            .expect_err("relative target is invalid");
        assert!(matches!(err, DispatchError::InvalidUrl { .. }));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
