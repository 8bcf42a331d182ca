//! Shared data model for the Catch error-aggregation protocol.
//!
//! A [`Log`] collects [`Failure`]s and free-text messages while a request is
//! handled. Failures may carry a [`Rectifier`] describing an alternate request
//! that could remediate them. The [`Envelope`] pairs a response body with the
//! log and is the only unit written to or read from the wire.

pub mod envelope;
pub mod error;
pub mod failure;
pub mod log;
pub mod protocol;
pub mod rectifier;

#[cfg(test)]
mod strategies;

pub use envelope::{Decoded, Envelope};
pub use error::CodecError;
pub use failure::Failure;
pub use log::{IsLogged, Log};
pub use protocol::Protocol;
pub use rectifier::Rectifier;
