use std::error::Error;

use serde::{Deserialize, Deserializer, Serialize};

use crate::failure::Failure;
use crate::rectifier::Rectifier;

/// Everything that went wrong while handling one request.
///
/// Handlers add failures as sub-operations fail and merge the logs returned
/// by nested calls. `fatality` only ever goes from `false` to `true`. Once
/// the log is emitted in an envelope it is not touched again.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Log {
    fatality: bool,
    #[serde(deserialize_with = "null_as_empty")]
    failures: Vec<Failure>,
    #[serde(deserialize_with = "null_as_empty")]
    messages: Vec<String>,
}

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when any contained failure is fatal or a fatal log was merged in.
    pub fn fatality(&self) -> bool {
        self.fatality
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// No failures, no messages and not fatal.
    pub fn is_empty(&self) -> bool {
        !self.fatality && self.failures.is_empty() && self.messages.is_empty()
    }

    pub fn add_failure(&mut self, failure: Failure) {
        if failure.fatal {
            self.fatality = true;
        }
        self.failures.push(failure);
    }

    /// Build a failure from `err` and append it.
    ///
    /// Returns `false` and leaves the log untouched when `err` renders to an
    /// empty message.
    pub fn add_new_failure_from_error(
        &mut self,
        code: i64,
        origin: impl Into<String>,
        err: &(dyn Error + '_),
        fatal: bool,
        rectifier: Rectifier,
    ) -> bool {
        match Failure::from_error(code, origin, err, fatal, rectifier) {
            Some(failure) => {
                self.add_failure(failure);
                true
            }
            None => false,
        }
    }

    pub fn add_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Fold `other` into this log: its failures and messages go after ours
    /// and a fatal `other` makes this log fatal.
    pub fn merge_logs(&mut self, other: Log) {
        if other.fatality {
            self.fatality = true;
        }
        self.failures.extend(other.failures);
        self.messages.extend(other.messages);
    }
}

/// Anything that can hand back the log it carries.
pub trait IsLogged {
    fn get_log(&self) -> Log;
}

impl IsLogged for Log {
    fn get_log(&self) -> Log {
        self.clone()
    }
}

// Producers with nil slices send `null` instead of `[]`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
