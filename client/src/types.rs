//! Wire envelope and call outcome for the eventstore API.
//!
//! # Design
//! `EventstoreEntity` is what travels over HTTP. `EventstoreResult` is what
//! callers get back: a non-success status is an ordinary value with no
//! resource, not an error, so callers can branch on 404/409 themselves.

use serde::{Deserialize, Serialize};

/// The `{id, version, data}` JSON wrapper around a stored value.
///
/// `version` is assigned by the server. Envelopes sent by this client
/// always carry 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventstoreEntity<T> {
    pub id: String,
    pub version: u64,
    pub data: T,
}

impl<T> EventstoreEntity<T> {
    /// Envelope for an outgoing Add or Save.
    pub fn outgoing(id: &str, data: T) -> Self {
        Self {
            id: id.to_string(),
            version: 0,
            data,
        }
    }
}

/// Outcome of a single eventstore call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventstoreResult<T> {
    pub status_code: u16,
    /// Present only when the status matched the operation's success rule.
    pub resource: Option<T>,
    /// Server version of `resource`; 0 when there is no resource.
    pub version: u64,
}

impl<T> EventstoreResult<T> {
    pub(crate) fn found(status_code: u16, entity: EventstoreEntity<T>) -> Self {
        Self {
            status_code,
            resource: Some(entity.data),
            version: entity.version,
        }
    }

    pub(crate) fn empty(status_code: u16) -> Self {
        Self {
            status_code,
            resource: None,
            version: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.resource.is_some()
    }
}
