//! Operation descriptors and request/response values

use crate::error::{Error, Result};
use crate::types::{JsonValue, Method};
use bytes::Bytes;
use reqwest::header::{HeaderMap, LOCATION};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Content type sent for uploads that do not declare one
pub const DEFAULT_UPLOAD_TYPE: &str = "text/plain";

/// Call shape of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Positional URL arguments only
    NoBody,
    /// JSON body followed by positional URL arguments
    WithData,
    /// Binary upload, optionally linked to another resource
    WithFile {
        /// Singular name of the linked resource (e.g., "document")
        link_type: Option<&'static str>,
    },
}

/// One operation of an endpoint definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Operation name (e.g., "retrieve")
    pub name: &'static str,
    /// HTTP method
    pub method: Method,
    /// Resource template relative to the base URL (e.g., "/folders/{id}")
    pub resource: &'static str,
    /// Positional argument names, in call order
    pub args: Vec<&'static str>,
    /// Accept header
    pub accept: Option<&'static str>,
    /// Content-Type header for data operations
    pub content_type: Option<&'static str>,
    /// Call shape
    pub kind: OperationKind,
    /// Follow a Location header on success with one GET
    pub follow_location: bool,
    /// Response refreshes the instance's pagination state
    pub paginated: bool,
}

impl Operation {
    /// Create an operation with no arguments and no body
    pub fn new(name: &'static str, method: Method, resource: &'static str) -> Self {
        Self {
            name,
            method,
            resource,
            args: Vec::new(),
            accept: None,
            content_type: None,
            kind: OperationKind::NoBody,
            follow_location: false,
            paginated: false,
        }
    }

    /// GET operation
    pub fn get(name: &'static str, resource: &'static str) -> Self {
        Self::new(name, Method::GET, resource)
    }

    /// POST operation
    pub fn post(name: &'static str, resource: &'static str) -> Self {
        Self::new(name, Method::POST, resource)
    }

    /// PATCH operation
    pub fn patch(name: &'static str, resource: &'static str) -> Self {
        Self::new(name, Method::PATCH, resource)
    }

    /// DELETE operation
    pub fn delete(name: &'static str, resource: &'static str) -> Self {
        Self::new(name, Method::DELETE, resource)
    }

    /// Set positional argument names
    #[must_use]
    pub fn args(mut self, args: &[&'static str]) -> Self {
        self.args = args.to_vec();
        self
    }

    /// Set the Accept header
    #[must_use]
    pub fn accept(mut self, mime: &'static str) -> Self {
        self.accept = Some(mime);
        self
    }

    /// Make this a data operation sending `mime`
    #[must_use]
    pub fn with_data(mut self, mime: &'static str) -> Self {
        self.kind = OperationKind::WithData;
        self.content_type = Some(mime);
        self
    }

    /// Make this a file upload, linked to `link_type` resources when given
    #[must_use]
    pub fn with_file(mut self, link_type: Option<&'static str>) -> Self {
        self.kind = OperationKind::WithFile { link_type };
        self
    }

    /// Follow the Location header of a successful response
    #[must_use]
    pub fn follow_location(mut self) -> Self {
        self.follow_location = true;
        self
    }

    /// Refresh pagination state from the response
    #[must_use]
    pub fn paginated(mut self) -> Self {
        self.paginated = true;
        self
    }

    /// Fail unless the operation has the `expected` call shape
    pub fn expect_kind(&self, expected: &str) -> Result<()> {
        let actual = match self.kind {
            OperationKind::NoBody => "call",
            OperationKind::WithData => "call_with_data",
            OperationKind::WithFile { .. } => "upload",
        };
        if actual == expected {
            Ok(())
        } else {
            Err(Error::operation_shape(self.name, actual))
        }
    }
}

/// A file to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// File name sent in Content-Disposition
    pub name: String,
    /// MIME type of the content
    pub content_type: Option<String>,
    /// File contents
    pub data: Bytes,
}

impl FileUpload {
    /// Create an upload from in-memory content
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            data: data.into(),
        }
    }

    /// Set the content type
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read an upload from disk, guessing the content type from the extension
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let content_type = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(guess_content_type)
            .map(String::from);

        Ok(Self {
            name,
            content_type,
            data: Bytes::from(data),
        })
    }

    /// Content type to send
    pub fn content_type_or_default(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_UPLOAD_TYPE)
    }
}

fn guess_content_type(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "pdf" => Some("application/pdf"),
        "txt" => Some("text/plain"),
        "html" | "htm" => Some("text/html"),
        "json" => Some("application/json"),
        "xml" => Some("application/xml"),
        "ps" => Some("application/postscript"),
        "doc" => Some("application/msword"),
        "docx" => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        _ => None,
    }
}

/// Successful API response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response headers
    pub headers: HeaderMap,
    /// Parsed body; `Null` when empty, a string when not JSON
    pub body: JsonValue,
}

impl ApiResponse {
    /// Build a response from a status, headers, and raw body bytes
    pub fn from_parts(status: u16, headers: HeaderMap, body: &[u8]) -> Self {
        let body = if body.iter().all(u8::is_ascii_whitespace) {
            JsonValue::Null
        } else {
            serde_json::from_slice(body)
                .unwrap_or_else(|_| JsonValue::String(String::from_utf8_lossy(body).into_owned()))
        };
        Self {
            status,
            headers,
            body,
        }
    }

    /// Deserialize the body
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.body.clone())?)
    }

    /// Get a header value by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Redirect target, if any
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }
}
