//! The `{Body, Log}` transport unit and its JSON codec.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CodecError;
use crate::log::{IsLogged, Log};

/// A response body paired with the log of the request that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Envelope {
    /// Opaque payload; `None` is written as `null`. A `null` body and an
    /// absent body are the same thing and both decode to `None`.
    pub body: Option<Value>,
    pub log: Log,
}

/// Result of the lenient decoder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded {
    pub envelope: Envelope,
    /// Set when the bytes were not a valid envelope. The envelope is then the
    /// zero value.
    pub malformed: bool,
}

impl Envelope {
    /// `Some(Value::Null)` is stored as `None`.
    pub fn new(body: Option<Value>, log: Log) -> Self {
        let body = body.filter(|b| !b.is_null());
        Self { body, log }
    }

    /// An envelope with no body, only diagnostics.
    pub fn knockout(log: Log) -> Self {
        Self { body: None, log }
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(self).map_err(CodecError::Encode)
    }

    /// Strict decode.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CodecError> {
        serde_json::from_slice(bytes).map_err(CodecError::Decode)
    }

    /// Lenient decode: never fails, flags malformed input instead.
    pub fn decode(bytes: &[u8]) -> Decoded {
        match Self::from_slice(bytes) {
            Ok(envelope) => Decoded {
                envelope,
                malformed: false,
            },
            Err(_) => Decoded {
                envelope: Envelope::default(),
                malformed: true,
            },
        }
    }

    pub fn into_parts(self) -> (Option<Value>, Log) {
        (self.body, self.log)
    }
}

impl IsLogged for Envelope {
    fn get_log(&self) -> Log {
        self.log.clone()
    }
}

impl Decoded {
    /// Whether the decoded log cannot be trusted to mean "nothing failed".
    ///
    /// An empty log under a non-2xx status is a decode anomaly even when the
    /// bytes parsed.
    pub fn is_anomalous(&self, status: u16) -> bool {
        self.malformed || (!(200..300).contains(&status) && self.envelope.log.is_empty())
    }
}
