//! HTTP transport types for the client.
//!
//! # Design
//! Requests and responses are described as plain owned data. The client
//! assembles `HttpRequest` values and interprets `HttpResponse` values; the
//! actual round-trip lives behind the `HttpTransport` port in `transport`.
//! This keeps header merging, auth injection, and error normalization
//! deterministic and testable without a network.

/// HTTP method for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `ForkedClient` from an endpoint and `RequestOptions`, then handed
/// to an `HttpTransport` for execution.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Produced by an `HttpTransport`, then interpreted by `ForkedClient`:
/// non-2xx statuses are normalized into errors, 2xx bodies deserialized.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is in the 200-299 success range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
