//! Pluggable execution of `HttpRequest` values.
//!
//! # Design
//! `Transport` is object safe so the client can hold an `Arc<dyn Transport>`
//! shared between clones. Implementations return every HTTP status as data;
//! only a missing response is an error.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request).await
    }
}

/// Default transport backed by a blocking `ureq::Agent`.
///
/// Calls run on tokio's blocking pool. Without a current tokio runtime the
/// call fails with `Error::Transport`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Use a caller-configured agent. It must not turn 4xx/5xx into errors,
    /// otherwise those statuses surface as `Error::Transport`.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let runtime = tokio::runtime::Handle::try_current().map_err(Error::transport)?;
        let agent = self.agent.clone();
        runtime
            .spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(Error::transport)?
    }
}

fn execute_blocking(agent: &ureq::Agent, req: HttpRequest) -> Result<HttpResponse> {
    tracing::debug!(method = req.method.as_str(), url = %req.url, "sending eventstore request");

    let content_type = req
        .headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        .map(|(_, value)| value.as_str())
        .unwrap_or("application/json");

    let mut response = match (req.method, req.body.as_deref()) {
        (HttpMethod::Get, _) => agent.get(&req.url).call(),
        (HttpMethod::Post, Some(body)) => agent.post(&req.url).content_type(content_type).send(body.as_bytes()),
        (HttpMethod::Post, None) => agent.post(&req.url).send_empty(),
        (HttpMethod::Put, Some(body)) => agent.put(&req.url).content_type(content_type).send(body.as_bytes()),
        (HttpMethod::Put, None) => agent.put(&req.url).send_empty(),
    }
    .map_err(Error::transport)?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
        .collect();
    // Error pages need not be UTF-8; only success bodies get parsed as JSON.
    let bytes = response.body_mut().read_to_vec().map_err(Error::transport)?;
    let body = String::from_utf8_lossy(&bytes).into_owned();

    tracing::debug!(status, "eventstore responded");
    Ok(HttpResponse { status, headers, body })
}
