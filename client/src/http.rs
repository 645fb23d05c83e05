//! HTTP request and response values shared by the builder and the transport.
//!
//! # Design
//! `EventstoreRequests` produces `HttpRequest` values and consumes
//! `HttpResponse` values without doing any I/O. A `Transport` sits between
//! the two and is the only piece that talks to the network, so request
//! shaping and status handling can be tested with plain data.

/// HTTP method for a request. The eventstore API only uses these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute, including any query string.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Transports return every status here, including 4xx and 5xx; the parse
/// step decides what counts as success.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// True for any status in the 2xx class.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}
