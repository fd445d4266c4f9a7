//! Tests for the request module

use super::*;
use crate::auth::{AuthFlowHandle, Authenticator, StaticToken, TokenStore, Unauthenticated};
use crate::error::{Error, Result};
use crate::http::{HttpRequest, HttpResponse, HttpTransport, ProgressHandler, UploadProgress};
use crate::mime;
use crate::types::{Method, Setting};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, LOCATION};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Request as seen by the transport
#[derive(Debug, Clone)]
pub(crate) struct SentRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl SentRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// In-memory transport returning queued responses and recording requests
#[derive(Default)]
pub(crate) struct MockTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    sent: Mutex<Vec<SentRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, headers: &[(&'static str, &str)], body: &str) {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.append(*name, HeaderValue::from_str(value).unwrap());
        }
        self.responses.lock().unwrap().push_back(HttpResponse {
            status,
            headers: map,
            body: Bytes::from(body.to_string()),
        });
    }

    pub fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let body = match request.body {
            crate::http::RequestBody::Empty => Bytes::new(),
            crate::http::RequestBody::Bytes(data) => data,
            crate::http::RequestBody::Upload { data, progress } => {
                if let Some(progress) = progress {
                    let total = data.len() as u64;
                    progress(UploadProgress {
                        loaded: total / 2,
                        total,
                    });
                    progress(UploadProgress {
                        loaded: total,
                        total,
                    });
                }
                data
            }
        };
        self.sent.lock().unwrap().push(SentRequest {
            method: request.method,
            url: request.url,
            headers: request.headers,
            body,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::Other("no queued response".to_string()))
    }
}

pub(crate) fn builder_with(flow: AuthFlowHandle, transport: Arc<MockTransport>) -> RequestBuilder {
    RequestBuilder::new(
        Authenticator::new(Setting::Value(flow).into_accessor()),
        Setting::from("https://api.example.com/").into_accessor(),
        transport,
    )
}

fn builder(transport: Arc<MockTransport>) -> RequestBuilder {
    builder_with(Arc::new(StaticToken::new("tok")), transport)
}

fn retrieve() -> Operation {
    Operation::get("retrieve", "/folders/{id}")
        .args(&["id"])
        .accept(mime::FOLDER)
}

fn create() -> Operation {
    Operation::post("create", "/folders")
        .with_data(mime::FOLDER)
        .accept(mime::FOLDER)
        .follow_location()
}

// ============================================================================
// No-body Requests
// ============================================================================

#[tokio::test]
async fn test_request_substitutes_args_and_attaches_headers() {
    let transport = MockTransport::new();
    transport.respond(200, &[], r#"{"id": "f 1", "name": "Reading"}"#);

    let response = builder(transport.clone())
        .request(&retrieve(), &["f 1"], None)
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body["name"], "Reading");

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, Method::GET);
    assert_eq!(sent[0].url, "https://api.example.com/folders/f%201");
    assert_eq!(sent[0].header("Accept"), Some(mime::FOLDER));
    assert_eq!(sent[0].header("Authorization"), Some("Bearer tok"));
    assert_eq!(sent[0].header("Development-Token"), None);
    assert!(sent[0].body.is_empty());
}

#[tokio::test]
async fn test_request_appends_scope_query() {
    let transport = MockTransport::new();
    transport.respond(200, &[], "[]");

    let list = Operation::get("list", "/folders").accept(mime::FOLDER);
    builder(transport.clone())
        .request(&list, &[], Some(("group_id", "g 1")))
        .await
        .unwrap();

    assert_eq!(
        transport.sent()[0].url,
        "https://api.example.com/folders?group_id=g+1"
    );
}

#[tokio::test]
async fn test_request_sends_dev_token() {
    let transport = MockTransport::new();
    transport.respond(204, &[], "");

    let response = builder(transport.clone())
        .with_dev_token(Some("dev-123".to_string()))
        .request(&retrieve(), &["x"], None)
        .await
        .unwrap();

    assert_eq!(response.body, serde_json::Value::Null);
    assert_eq!(transport.sent()[0].header("Development-Token"), Some("dev-123"));
}

#[tokio::test]
async fn test_argument_count_mismatch_fails_without_io() {
    let transport = MockTransport::new();
    let builder = builder(transport.clone());

    let err = builder.request(&retrieve(), &[], None).await.unwrap_err();
    assert!(matches!(err, Error::ArgumentCount { expected: 1, got: 0, .. }));

    let err = builder
        .request(&retrieve(), &["a", "b"], None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ArgumentCount { expected: 1, got: 2, .. }));

    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_missing_credential_fails_without_io() {
    let transport = MockTransport::new();
    let builder = builder_with(Arc::new(Unauthenticated), transport.clone());

    let err = builder.request(&retrieve(), &["x"], None).await.unwrap_err();
    assert!(matches!(err, Error::Auth { .. }));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_wrong_call_shape_fails_without_io() {
    let transport = MockTransport::new();
    let builder = builder(transport.clone());

    let err = builder.request(&create(), &[], None).await.unwrap_err();
    assert!(matches!(err, Error::OperationShape { .. }));

    let err = builder
        .request_with_data(&retrieve(), &json!({}), &["x"], None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::OperationShape { .. }));

    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_http_error_carries_status_and_body() {
    let transport = MockTransport::new();
    transport.respond(404, &[], r#"{"message": "not found"}"#);

    let err = builder(transport.clone())
        .request(&retrieve(), &["missing"], None)
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("not found"));
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
    assert_eq!(transport.sent().len(), 1);
}

#[tokio::test]
async fn test_credential_rotation_applies_to_next_request() {
    let store = Arc::new(TokenStore::with_token("old"));
    let transport = MockTransport::new();
    transport.respond(200, &[], "{}");
    transport.respond(200, &[], "{}");
    let builder = builder_with(store.clone(), transport.clone());

    builder.request(&retrieve(), &["a"], None).await.unwrap();
    store.set_token("new");
    builder.request(&retrieve(), &["a"], None).await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent[0].header("Authorization"), Some("Bearer old"));
    assert_eq!(sent[1].header("Authorization"), Some("Bearer new"));
}

// ============================================================================
// Data Requests
// ============================================================================

#[tokio::test]
async fn test_request_with_data_serializes_body() {
    let transport = MockTransport::new();
    transport.respond(200, &[], r#"{"id": "f1"}"#);

    let update = Operation::patch("update", "/folders/{id}")
        .args(&["id"])
        .with_data(mime::FOLDER)
        .accept(mime::FOLDER);
    builder(transport.clone())
        .request_with_data(&update, &json!({"name": "Renamed"}), &["f1"], None)
        .await
        .unwrap();

    let sent = &transport.sent()[0];
    assert_eq!(sent.method, Method::PATCH);
    assert_eq!(sent.url, "https://api.example.com/folders/f1");
    assert_eq!(sent.header("Content-Type"), Some(mime::FOLDER));
    let body: serde_json::Value = serde_json::from_slice(&sent.body).unwrap();
    assert_eq!(body, json!({"name": "Renamed"}));
}

#[tokio::test]
async fn test_follow_location_issues_one_get() {
    let transport = MockTransport::new();
    transport.respond(201, &[("location", "/folders/new-id")], "");
    transport.respond(
        200,
        &[("location", "/folders/elsewhere")],
        r#"{"id": "new-id"}"#,
    );

    let response = builder(transport.clone())
        .request_with_data(&create(), &json!({"name": "New"}), &[], None)
        .await
        .unwrap();

    assert_eq!(response.body["id"], "new-id");

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].method, Method::GET);
    assert_eq!(sent[1].url, "https://api.example.com/folders/new-id");
    assert_eq!(sent[1].header("Accept"), Some(mime::FOLDER));
    assert_eq!(sent[1].header("Authorization"), Some("Bearer tok"));
}

#[tokio::test]
async fn test_no_follow_without_location() {
    let transport = MockTransport::new();
    transport.respond(201, &[], r#"{"id": "inline"}"#);

    let response = builder(transport.clone())
        .request_with_data(&create(), &json!({}), &[], None)
        .await
        .unwrap();

    assert_eq!(response.status, 201);
    assert_eq!(transport.sent().len(), 1);
}

#[tokio::test]
async fn test_location_ignored_when_not_following() {
    let transport = MockTransport::new();
    transport.respond(201, &[("location", "/folders/f1/documents/d1")], "");

    let add = Operation::post("addDocument", "/folders/{id}/documents")
        .args(&["id"])
        .with_data(mime::DOCUMENT);
    let response = builder(transport.clone())
        .request_with_data(&add, &json!({"id": "d1"}), &["f1"], None)
        .await
        .unwrap();

    assert_eq!(response.status, 201);
    assert!(response.location().is_some());
    assert_eq!(transport.sent().len(), 1);
}

// ============================================================================
// File Uploads
// ============================================================================

#[tokio::test]
async fn test_upload_sets_file_headers_and_link() {
    let transport = MockTransport::new();
    transport.respond(201, &[], r#"{"id": "file-1"}"#);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let progress: ProgressHandler =
        Arc::new(move |p: UploadProgress| sink.lock().unwrap().push(p.loaded));

    let op = Operation::post("create", "/files")
        .accept(mime::FILE)
        .with_file(Some("document"));
    let file = FileUpload::new("my paper.pdf", b"%PDF-1.4".to_vec())
        .with_content_type("application/pdf");

    let response = builder(transport.clone())
        .request_with_file(&op, file, Some("doc-1"), Some(progress))
        .await
        .unwrap();

    assert_eq!(response.body["id"], "file-1");
    let sent = &transport.sent()[0];
    assert_eq!(sent.url, "https://api.example.com/files");
    assert_eq!(sent.header("Content-Type"), Some("application/pdf"));
    assert_eq!(
        sent.header("Content-Disposition"),
        Some("attachment; filename*=UTF-8''my%20paper.pdf")
    );
    assert_eq!(
        sent.header("Link"),
        Some("<https://api.example.com/documents/doc-1>; rel=\"document\"")
    );
    assert_eq!(sent.body, Bytes::from_static(b"%PDF-1.4"));

    let seen = seen.lock().unwrap();
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(seen.last(), Some(&8));
}

#[tokio::test]
async fn test_upload_defaults_content_type_and_skips_link() {
    let transport = MockTransport::new();
    transport.respond(201, &[], "{}");

    let op = Operation::post("createFromFile", "/documents").with_file(None);
    builder(transport.clone())
        .request_with_file(&op, FileUpload::new("notes", "hello"), Some("ignored"), None)
        .await
        .unwrap();

    let sent = &transport.sent()[0];
    assert_eq!(sent.header("Content-Type"), Some(DEFAULT_UPLOAD_TYPE));
    assert_eq!(sent.header("Link"), None);
}

#[tokio::test]
async fn test_file_upload_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paper.PDF");
    std::fs::write(&path, b"data").unwrap();

    let file = FileUpload::from_path(&path).await.unwrap();
    assert_eq!(file.name, "paper.PDF");
    assert_eq!(file.content_type.as_deref(), Some("application/pdf"));
    assert_eq!(file.data, Bytes::from_static(b"data"));

    let err = FileUpload::from_path(dir.path().join("missing.pdf"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

// ============================================================================
// Page Requests and Responses
// ============================================================================

#[tokio::test]
async fn test_request_page_gets_stored_url() {
    let transport = MockTransport::new();
    transport.respond(200, &[], "[]");

    builder(transport.clone())
        .request_page("https://api.example.com/folders?page=2", Some(mime::FOLDER))
        .await
        .unwrap();

    let sent = &transport.sent()[0];
    assert_eq!(sent.method, Method::GET);
    assert_eq!(sent.url, "https://api.example.com/folders?page=2");
    assert_eq!(sent.header("Accept"), Some(mime::FOLDER));
}

#[test]
fn test_api_response_body_parsing() {
    let json = ApiResponse::from_parts(200, HeaderMap::new(), br#"{"a": 1}"#);
    assert_eq!(json.body, json!({"a": 1}));

    let empty = ApiResponse::from_parts(204, HeaderMap::new(), b"  ");
    assert_eq!(empty.body, serde_json::Value::Null);

    let text = ApiResponse::from_parts(200, HeaderMap::new(), b"plain text");
    assert_eq!(text.body, json!("plain text"));

    let mut headers = HeaderMap::new();
    headers.insert(LOCATION, HeaderValue::from_static("/x"));
    let located = ApiResponse::from_parts(201, headers, b"");
    assert_eq!(located.location(), Some("/x"));
}

#[test]
fn test_api_response_json() {
    #[derive(serde::Deserialize)]
    struct Folder {
        id: String,
    }

    let response = ApiResponse::from_parts(200, HeaderMap::new(), br#"{"id": "f1"}"#);
    let folder: Folder = response.json().unwrap();
    assert_eq!(folder.id, "f1");
}
