use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CodecError;

/// Description of an alternate request that could remediate a [`Failure`].
///
/// A rectifier is only a description: nothing in this crate issues it on its
/// own. The zero value (see [`Rectifier::nil`]) means no remediation exists.
///
/// [`Failure`]: crate::Failure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Rectifier {
    /// Caller-defined payload sent as the remediation request body.
    /// The remediation target defines its shape.
    pub rectify: Value,
    /// Base URL plus path of the remediation endpoint
    pub target_domain: String,
    /// Already-encoded query string, appended verbatim
    pub target_query: String,
    /// HTTP verb; empty means GET
    pub method: String,
}

impl Rectifier {
    /// The sentinel for "no remediation possible".
    pub fn nil() -> Self {
        Self::default()
    }

    pub fn is_nil(&self) -> bool {
        self.rectify.is_null()
            && self.target_domain.is_empty()
            && self.target_query.is_empty()
            && self.method.is_empty()
    }

    /// Build a rectifier targeting `domain` + `path`.
    ///
    /// No separator is inserted between `domain` and `path`, and `query` is
    /// stored as given.
    pub fn with_path(
        method: impl Into<String>,
        domain: &str,
        path: &str,
        query: impl Into<String>,
        rectify: Value,
    ) -> Self {
        Self {
            rectify,
            target_domain: format!("{domain}{path}"),
            target_query: query.into(),
            method: method.into(),
        }
    }

    /// Like [`Rectifier::with_path`], serializing a typed payload first.
    pub fn try_with_path<T: Serialize>(
        method: impl Into<String>,
        domain: &str,
        path: &str,
        query: impl Into<String>,
        rectify: &T,
    ) -> Result<Self, CodecError> {
        let payload = serde_json::to_value(rectify).map_err(CodecError::Encode)?;
        Ok(Self::with_path(method, domain, path, query, payload))
    }

    /// `TargetDomain?TargetQuery`. The `?` is always present.
    pub fn target_url(&self) -> String {
        format!("{}?{}", self.target_domain, self.target_query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_is_nil() {
        assert!(Rectifier::default().is_nil());
        assert!(Rectifier::nil().is_nil());
    }

    #[test]
    fn with_path_concatenates_without_separator() {
        let r = Rectifier::with_path(
            "POST",
            "http://billing.local",
            "/v1/retry",
            "id=4&force=true",
            json!({"invoice": 4}),
        );
        assert_eq!(r.target_domain, "http://billing.local/v1/retry");
        assert_eq!(r.target_query, "id=4&force=true");
        assert_eq!(r.method, "POST");
        assert_eq!(r.rectify, json!({"invoice": 4}));
        assert!(!r.is_nil());
    }

    #[test]
    fn query_is_not_re_encoded() {
        let r = Rectifier::with_path("GET", "http://a", "/b", "q=a%20b&x=1", Value::Null);
        assert_eq!(r.target_url(), "http://a/b?q=a%20b&x=1");
    }

    #[test]
    fn target_url_keeps_question_mark_for_empty_query() {
        let r = Rectifier::with_path("GET", "http://a", "/b", "", Value::Null);
        assert_eq!(r.target_url(), "http://a/b?");
    }

    #[test]
    fn try_with_path_serializes_typed_payload() {
        #[derive(Serialize)]
        struct Retry {
            attempt: u32,
        }
        let r = Rectifier::try_with_path("PUT", "http://a", "/r", "", &Retry { attempt: 2 })
            .expect("payload should serialize");
        assert_eq!(r.rectify, json!({"attempt": 2}));
    }

    #[test]
    fn wire_field_names_are_pascal_case() {
        let r = Rectifier::with_path("POST", "http://a", "/b", "c=d", json!([1]));
        let v = serde_json::to_value(&r).expect("rectifier should encode");
        assert_eq!(
            v,
            json!({
                "Rectify": [1],
                "TargetDomain": "http://a/b",
                "TargetQuery": "c=d",
                "Method": "POST"
            })
        );
    }
}
