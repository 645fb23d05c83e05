//! Client configuration: endpoint, transport and JSON output options.
//!
//! # Design
//! The builder only collects immutable settings; `build()` freezes them into
//! an `EventstoreClient`. The default endpoint reads the port from the
//! environment once, when the builder is created.

use std::sync::Arc;

use url::Url;

use crate::client::EventstoreClient;
use crate::error::{Error, Result};
use crate::requests::EventstoreRequests;
use crate::transport::{Transport, UreqTransport};

/// Environment variable holding the port of the local eventstore runtime.
pub const PORT_ENV: &str = "EVENTSTORE_HTTP_PORT";

/// Port used when `EVENTSTORE_HTTP_PORT` is unset or empty.
pub const DEFAULT_PORT: &str = "5600";

/// Controls how request bodies are written.
///
/// Applies to outgoing envelopes only; responses are decoded with the
/// payload type's own serde impl. Field names and renames belong on the
/// payload type as serde attributes, which then hold in both directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonOptions {
    pub pretty: bool,
}

/// Resolves the default endpoint for an optional port override.
pub fn endpoint_for_port(port: Option<&str>) -> String {
    let port = port.filter(|p| !p.is_empty()).unwrap_or(DEFAULT_PORT);
    format!("http://127.0.0.1:{port}")
}

/// Assembles the configuration for an [`EventstoreClient`].
pub struct EventstoreClientBuilder {
    endpoint: String,
    transport: Option<Arc<dyn Transport>>,
    json: JsonOptions,
}

impl EventstoreClientBuilder {
    /// Starts from `http://127.0.0.1:{EVENTSTORE_HTTP_PORT}`, port 5600 when unset.
    pub fn new() -> Self {
        let port = std::env::var(PORT_ENV).ok();
        Self {
            endpoint: endpoint_for_port(port.as_deref()),
            transport: None,
            json: JsonOptions::default(),
        }
    }

    /// Overrides the endpoint of the eventstore runtime. It must be an
    /// absolute URL that can carry a path.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        let usable = Url::parse(&endpoint).is_ok_and(|url| !url.cannot_be_a_base());
        if !usable {
            return Err(Error::InvalidArgument { name: "endpoint" });
        }
        self.endpoint = endpoint;
        Ok(self)
    }

    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn with_json_options(mut self, options: JsonOptions) -> Self {
        self.json = options;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Creates a `UreqTransport` when no transport was supplied.
    pub fn build(self) -> EventstoreClient {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(UreqTransport::new()),
        };
        let requests = EventstoreRequests::with_json_options(&self.endpoint, self.json);
        tracing::debug!(endpoint = requests.endpoint(), "eventstore client built");
        EventstoreClient::from_parts(requests, transport)
    }
}

impl Default for EventstoreClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_port_is_5600() {
        assert_eq!(endpoint_for_port(None), "http://127.0.0.1:5600");
    }

    #[test]
    fn empty_port_falls_back_to_default() {
        assert_eq!(endpoint_for_port(Some("")), "http://127.0.0.1:5600");
    }

    #[test]
    fn port_override() {
        assert_eq!(endpoint_for_port(Some("7000")), "http://127.0.0.1:7000");
    }

    #[test]
    fn empty_endpoint_is_rejected() {
        let err = EventstoreClientBuilder::new().with_endpoint("").err().unwrap();
        assert!(matches!(err, Error::InvalidArgument { name: "endpoint" }));
    }

    #[test]
    fn unparseable_endpoint_is_rejected() {
        for endpoint in ["eventstore:5600 /x", "not a url", "mailto:store@example.com"] {
            let err = EventstoreClientBuilder::new().with_endpoint(endpoint).err().unwrap();
            assert!(matches!(err, Error::InvalidArgument { name: "endpoint" }), "{endpoint}");
        }
    }

    #[test]
    fn endpoint_override_is_kept() {
        let builder = EventstoreClientBuilder::new()
            .with_endpoint("http://eventstore:8080")
            .unwrap();
        assert_eq!(builder.endpoint(), "http://eventstore:8080");
    }
}
