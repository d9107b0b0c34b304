//! HTTP transport seam.
//!
//! The harness never talks to the network directly; the sandbox bridge goes
//! through the [`HttpClient`] trait so tests can substitute a recording mock.
//! The production implementation is a blocking reqwest client.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// HTTP verbs exposed to test scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved request: settings already applied by the bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    /// JSON payload for verbs that carry a body.
    pub body: Option<serde_json::Value>,
}

/// Wire result handed back to the script as `#{ response, body }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Human-readable status line, e.g. `200 OK`.
    pub status_line: String,
    /// Raw response payload as text.
    pub body: String,
}

/// The network call could not complete (DNS, refused connection, timeout).
/// Surfaced inside the sandbox as a script-level fault: a broken transport
/// means the test environment is broken, not that an assertion failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{method} request to {url} failed: {message}")]
pub struct TransportError {
    pub method: Method,
    pub url: String,
    pub message: String,
}

/// External HTTP collaborator. Synchronous; any timeout behavior is owned by
/// the implementation.
pub trait HttpClient {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Production transport backed by a blocking reqwest client.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let transport_error = |message: String| TransportError {
            method: request.method,
            url: request.url.clone(),
            message,
        };

        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(|e| transport_error(e.to_string()))?;
        let status_line = response.status().to_string();
        let body = response.text().map_err(|e| transport_error(e.to_string()))?;

        Ok(HttpResponse { status_line, body })
    }
}
