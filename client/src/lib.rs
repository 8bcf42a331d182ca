//! Issues the requests described by [`Rectifier`](catch_core::Rectifier)s and
//! reads the replies back into the protocol's data model.

pub mod dispatch;
pub mod error;
pub mod legacy;

pub use dispatch::{Dispatcher, Remediation, enact_rectifier};
pub use error::{DispatchError, LegacyError};
pub use legacy::{LegacyReply, parse_legacy_error, read_legacy_stream};

/// Shared default HTTP client.
pub fn client() -> reqwest::Client {
    reqwest::Client::new()
}
