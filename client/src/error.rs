//! Error types for the eventstore client.
//!
//! # Design
//! Only failures that leave the caller without an HTTP status are errors.
//! A 404 or 409 from the server is reported through `EventstoreResult`
//! instead, so there is no status-carrying variant here.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A required argument was empty. Raised before any request is sent.
    #[error("{name} can not be empty")]
    InvalidArgument { name: &'static str },

    /// The outgoing envelope could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A success response body was not a valid envelope for the target type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The transport did not produce a response.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport(err.into())
    }
}
