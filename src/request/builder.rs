//! Generic request execution
//!
//! [`RequestBuilder`] turns an [`Operation`] plus call arguments into one HTTP
//! request. It handles the four call shapes:
//! - no body (`request`)
//! - JSON body, with optional single Location follow (`request_with_data`)
//! - file upload with progress (`request_with_file`)
//! - stored pagination URL (`request_page`)
//!
//! Arguments and credentials are validated before any I/O. Every request
//! reads the credential afresh, so token rotation applies immediately.

use super::types::{ApiResponse, FileUpload, Operation, OperationKind};
use crate::auth::Authenticator;
use crate::error::Result;
use crate::http::{HttpRequest, HttpTransport, ProgressHandler, RequestBody};
use crate::pagination::DEFAULT_COUNT_HEADER;
use crate::template::{encode_component, render_resource};
use crate::types::{Accessor, Method};
use crate::Error;
use bytes::Bytes;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Header carrying the optional developer token
pub const DEV_TOKEN_HEADER: &str = "Development-Token";

/// Shared request engine for every endpoint of one SDK instance
#[derive(Clone)]
pub struct RequestBuilder {
    authenticator: Authenticator,
    base_url: Accessor<String>,
    transport: Arc<dyn HttpTransport>,
    dev_token: Option<String>,
    count_header: String,
}

impl RequestBuilder {
    /// Create a request builder
    pub fn new(
        authenticator: Authenticator,
        base_url: Accessor<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            authenticator,
            base_url,
            transport,
            dev_token: None,
            count_header: DEFAULT_COUNT_HEADER.to_string(),
        }
    }

    /// Send a developer token with every request
    #[must_use]
    pub fn with_dev_token(mut self, token: Option<String>) -> Self {
        self.dev_token = token;
        self
    }

    /// Set the name of the total-count response header
    #[must_use]
    pub fn with_count_header(mut self, name: impl Into<String>) -> Self {
        self.count_header = name.into();
        self
    }

    /// Name of the total-count response header
    pub fn count_header(&self) -> &str {
        &self.count_header
    }

    /// The authenticator
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// Current base URL, without a trailing slash
    pub fn base_url(&self) -> String {
        (self.base_url)().trim_end_matches('/').to_string()
    }

    /// Build the absolute URL for an operation
    ///
    /// `scope` is an extra query parameter appended for scoped instances.
    pub fn build_url(
        &self,
        op: &Operation,
        args: &[&str],
        scope: Option<(&str, &str)>,
    ) -> Result<String> {
        let path = render_resource(op.name, op.resource, &op.args, args)?;
        let mut url = Url::parse(&format!("{}{}", self.base_url(), path))?;
        if let Some((key, value)) = scope {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url.into())
    }

    /// Headers shared by every request: declared types, dev token, credential
    fn headers(
        &self,
        accept: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<Vec<(String, String)>> {
        let mut headers = Vec::with_capacity(4);
        if let Some(accept) = accept {
            headers.push(("Accept".to_string(), accept.to_string()));
        }
        if let Some(content_type) = content_type {
            headers.push(("Content-Type".to_string(), content_type.to_string()));
        }
        if let Some(token) = &self.dev_token {
            headers.push((DEV_TOKEN_HEADER.to_string(), token.clone()));
        }
        headers.push(self.authenticator.credential_header()?);
        Ok(headers)
    }

    /// Issue an operation without a body
    pub async fn request(
        &self,
        op: &Operation,
        args: &[&str],
        scope: Option<(&str, &str)>,
    ) -> Result<ApiResponse> {
        op.expect_kind("call")?;
        let url = self.build_url(op, args, scope)?;
        let headers = self.headers(op.accept, None)?;

        self.execute(HttpRequest::new(op.method, url).with_headers(headers))
            .await
    }

    /// Issue an operation with a JSON body
    ///
    /// When the operation follows Location and the response carries one, a
    /// single GET to that target is made and its response returned instead.
    pub async fn request_with_data<T>(
        &self,
        op: &Operation,
        data: &T,
        args: &[&str],
        scope: Option<(&str, &str)>,
    ) -> Result<ApiResponse>
    where
        T: Serialize + ?Sized,
    {
        op.expect_kind("call_with_data")?;
        let body = serde_json::to_vec(data)?;
        let url = self.build_url(op, args, scope)?;
        let headers = self.headers(op.accept, op.content_type)?;

        let request = HttpRequest::new(op.method, url.clone())
            .with_headers(headers)
            .with_body(RequestBody::Bytes(Bytes::from(body)));
        let response = self.execute(request).await?;

        if !op.follow_location {
            return Ok(response);
        }
        match response.location() {
            Some(location) => {
                let target = Url::parse(&url)?.join(location)?;
                debug!("Following Location to {}", target);
                self.get(target.as_str(), op.accept).await
            }
            None => Ok(response),
        }
    }

    /// Upload a file, linking it to `linked_id` when the operation declares a link type
    pub async fn request_with_file(
        &self,
        op: &Operation,
        file: FileUpload,
        linked_id: Option<&str>,
        progress: Option<ProgressHandler>,
    ) -> Result<ApiResponse> {
        op.expect_kind("upload")?;
        let OperationKind::WithFile { link_type } = op.kind else {
            return Err(Error::operation_shape(op.name, "upload"));
        };

        let url = self.build_url(op, &[], None)?;
        let mut headers = self.headers(op.accept, Some(file.content_type_or_default()))?;
        headers.push((
            "Content-Disposition".to_string(),
            format!("attachment; filename*=UTF-8''{}", encode_component(&file.name)),
        ));

        match (link_type, linked_id) {
            (Some(kind), Some(id)) => headers.push((
                "Link".to_string(),
                format!(
                    "<{}/{}s/{}>; rel=\"{}\"",
                    self.base_url(),
                    kind,
                    encode_component(id),
                    kind
                ),
            )),
            (None, Some(id)) => debug!("Ignoring linked id {} for {}", id, op.name),
            _ => {}
        }

        let request = HttpRequest::new(op.method, url)
            .with_headers(headers)
            .with_body(RequestBody::Upload {
                data: file.data,
                progress,
            });
        self.execute(request).await
    }

    /// Fetch a stored pagination URL
    pub async fn request_page(&self, url: &str, accept: Option<&str>) -> Result<ApiResponse> {
        self.get(url, accept).await
    }

    async fn get(&self, url: &str, accept: Option<&str>) -> Result<ApiResponse> {
        let headers = self.headers(accept, None)?;
        self.execute(HttpRequest::new(Method::GET, url).with_headers(headers))
            .await
    }

    async fn execute(&self, request: HttpRequest) -> Result<ApiResponse> {
        debug!("{} {}", request.method, request.url);
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(Error::http_status(
                response.status,
                String::from_utf8_lossy(&response.body),
            ));
        }

        Ok(ApiResponse::from_parts(
            response.status,
            response.headers,
            &response.body,
        ))
    }
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("base_url", &self.base_url())
            .field("count_header", &self.count_header)
            .field("has_dev_token", &self.dev_token.is_some())
            .finish_non_exhaustive()
    }
}
