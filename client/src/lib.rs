//! Async client for the eventstore HTTP service.
//!
//! # Overview
//! Four operations (add, save, get, get_by_version) wrap a value in the
//! `{id, version, data}` envelope, send one HTTP request, and report the
//! outcome as an `EventstoreResult`.
//!
//! # Design
//! - `EventstoreRequests` builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network.
//! - `Transport` executes requests; `UreqTransport` is the default.
//! - Non-success statuses are results with no resource, not errors.
//! - `EventstoreClient` holds only immutable configuration.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod requests;
pub mod transport;
pub mod types;

pub use client::EventstoreClient;
pub use config::{endpoint_for_port, EventstoreClientBuilder, JsonOptions, DEFAULT_PORT, PORT_ENV};
pub use error::{Error, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use requests::EventstoreRequests;
pub use transport::{Transport, UreqTransport};
pub use types::{EventstoreEntity, EventstoreResult};
