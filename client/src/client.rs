//! Async client for the eventstore API.
//!
//! Each call validates and builds its request, runs it through the
//! transport once, and parses the response. Nothing is cached or retried.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

use crate::config::EventstoreClientBuilder;
use crate::error::Result;
use crate::requests::EventstoreRequests;
use crate::transport::Transport;
use crate::types::EventstoreResult;

/// Cloning is cheap; clones share the transport.
#[derive(Clone)]
pub struct EventstoreClient {
    requests: EventstoreRequests,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for EventstoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventstoreClient")
            .field("endpoint", &self.requests.endpoint())
            .finish_non_exhaustive()
    }
}

impl EventstoreClient {
    pub fn builder() -> EventstoreClientBuilder {
        EventstoreClientBuilder::new()
    }

    pub(crate) fn from_parts(requests: EventstoreRequests, transport: Arc<dyn Transport>) -> Self {
        Self { requests, transport }
    }

    pub fn endpoint(&self) -> &str {
        self.requests.endpoint()
    }

    /// Stores a new entity. Succeeds only on 201 Created.
    #[instrument(skip(self, value))]
    pub async fn add<T>(&self, storename: &str, id: &str, value: &T) -> Result<EventstoreResult<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        let request = self.requests.build_add(storename, id, value)?;
        let response = self.transport.execute(request).await?;
        self.requests.parse_add(response)
    }

    /// Stores a new version of an entity. Succeeds only on 200 OK.
    #[instrument(skip(self, value))]
    pub async fn save<T>(&self, storename: &str, id: &str, value: &T) -> Result<EventstoreResult<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        let request = self.requests.build_save(storename, id, value)?;
        let response = self.transport.execute(request).await?;
        self.requests.parse_save(response)
    }

    /// Fetches the latest version of an entity.
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, storename: &str, id: &str) -> Result<EventstoreResult<T>> {
        let request = self.requests.build_get(storename, id)?;
        let response = self.transport.execute(request).await?;
        self.requests.parse_get(response)
    }

    /// Fetches a specific version of an entity.
    #[instrument(skip(self))]
    pub async fn get_by_version<T: DeserializeOwned>(
        &self,
        storename: &str,
        id: &str,
        version: u64,
    ) -> Result<EventstoreResult<T>> {
        let request = self.requests.build_get_by_version(storename, id, version)?;
        let response = self.transport.execute(request).await?;
        self.requests.parse_get_by_version(response)
    }
}
