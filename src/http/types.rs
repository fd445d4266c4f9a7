//! Transport request/response types
//!
//! The SDK talks to the network only through [`HttpTransport`], so the
//! default reqwest client can be swapped for any other implementation.

use crate::error::Result;
use crate::types::Method;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use std::fmt;
use std::sync::Arc;

/// Cumulative upload progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    /// Bytes handed to the transport so far
    pub loaded: u64,
    /// Total bytes in the upload
    pub total: u64,
}

/// Callback invoked as upload bytes are sent
pub type ProgressHandler = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// Request body
#[derive(Default)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// Fully buffered body
    Bytes(Bytes),
    /// Streamed upload reporting progress
    Upload {
        data: Bytes,
        progress: Option<ProgressHandler>,
    },
}

impl RequestBody {
    /// Body length in bytes
    pub fn len(&self) -> usize {
        match self {
            RequestBody::Empty => 0,
            RequestBody::Bytes(data) | RequestBody::Upload { data, .. } => data.len(),
        }
    }

    /// True for an empty body
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Empty => f.write_str("Empty"),
            RequestBody::Bytes(data) => write!(f, "Bytes({} bytes)", data.len()),
            RequestBody::Upload { data, progress } => f
                .debug_struct("Upload")
                .field("bytes", &data.len())
                .field("has_progress", &progress.is_some())
                .finish(),
        }
    }
}

/// HTTP request to be sent
#[derive(Debug)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute request URL
    pub url: String,
    /// Request headers, in insertion order
    pub headers: Vec<(String, String)>,
    /// Request body
    pub body: RequestBody,
}

impl HttpRequest {
    /// Create a new request without headers or body
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add multiple headers
    #[must_use]
    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Set the request body
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Get a header value by name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP response received
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Bytes,
}

impl HttpResponse {
    /// Check if the response indicates success (2xx status)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// HTTP transport trait for making requests
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP request and return the response, whatever its status
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}
