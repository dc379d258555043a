//! Fact provider wire types and error definitions.

use serde::Deserialize;
use thiserror::Error;

/// Body returned by the fact provider. Extra fields (e.g. `length`) are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FactPayload {
    pub fact: String,
}

/// Errors that can occur while fetching a fact.
#[derive(Debug, Error)]
pub enum FactError {
    /// Connection, DNS or I/O failure before a response arrived.
    #[error("fact provider unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("fact provider returned status {0}")]
    Status(u16),

    /// Response body was not the expected JSON shape.
    #[error("fact provider returned a malformed body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Result type for fact provider operations.
pub type FactResult<T> = Result<T, FactError>;
