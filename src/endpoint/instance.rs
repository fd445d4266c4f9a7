//! Live endpoint instances and their clone registry

use super::definition::EndpointDefinition;
use crate::error::{Error, Result};
use crate::http::ProgressHandler;
use crate::mime::ResourceKind;
use crate::pagination::{PaginationLinks, PaginationState, Rel};
use crate::request::{ApiResponse, FileUpload, Operation, RequestBuilder};
use reqwest::header::HeaderMap;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use tracing::debug;

/// Scoped clones of one base endpoint, keyed by scope
#[derive(Default)]
struct CloneRegistry {
    clones: Mutex<HashMap<String, Arc<Endpoint>>>,
}

impl CloneRegistry {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Endpoint>>> {
        self.clones.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Base endpoints own their registry; clones point back at it weakly
enum RegistryLink {
    Owner(Arc<CloneRegistry>),
    Member(Weak<CloneRegistry>),
}

/// One live endpoint: the operations of a definition plus pagination state
pub struct Endpoint {
    definition: Arc<EndpointDefinition>,
    requests: Arc<RequestBuilder>,
    scope: Option<String>,
    state: RwLock<PaginationState>,
    registry: RegistryLink,
}

impl Endpoint {
    /// Create a base (unscoped) endpoint
    pub fn new(definition: Arc<EndpointDefinition>, requests: Arc<RequestBuilder>) -> Self {
        Self {
            definition,
            requests,
            scope: None,
            state: RwLock::new(PaginationState::new()),
            registry: RegistryLink::Owner(Arc::new(CloneRegistry::default())),
        }
    }

    /// Get the clone scoped to `key`, creating it on first use
    ///
    /// Repeated calls with the same key return the same instance. Calling this
    /// on a clone resolves against the base endpoint's registry, so scopes
    /// never nest.
    pub fn for_scope(&self, key: &str) -> Arc<Endpoint> {
        let registry = match &self.registry {
            RegistryLink::Owner(registry) => registry.clone(),
            RegistryLink::Member(weak) => match weak.upgrade() {
                Some(registry) => registry,
                None => {
                    debug!("Base {} endpoint dropped, detaching clone {}", self.kind(), key);
                    return Arc::new(self.scoped(key, Weak::new()));
                }
            },
        };

        let mut clones = registry.lock();
        let clone = clones.entry(key.to_string()).or_insert_with(|| {
            debug!("Registering {} clone for scope {}", self.kind(), key);
            Arc::new(self.scoped(key, Arc::downgrade(&registry)))
        });
        Arc::clone(clone)
    }

    fn scoped(&self, key: &str, registry: Weak<CloneRegistry>) -> Endpoint {
        Endpoint {
            definition: self.definition.clone(),
            requests: self.requests.clone(),
            scope: Some(key.to_string()),
            state: RwLock::new(PaginationState::new()),
            registry: RegistryLink::Member(registry),
        }
    }

    /// Number of clones registered on the base endpoint
    pub fn clone_count(&self) -> usize {
        match &self.registry {
            RegistryLink::Owner(registry) => registry.lock().len(),
            RegistryLink::Member(weak) => weak.upgrade().map_or(0, |r| r.lock().len()),
        }
    }

    /// Scope key, or `None` for the base endpoint
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Resource kind
    pub fn kind(&self) -> ResourceKind {
        self.definition.kind
    }

    /// The shared operation table
    pub fn definition(&self) -> &Arc<EndpointDefinition> {
        &self.definition
    }

    /// Operation names available on this endpoint
    pub fn operations(&self) -> Vec<&'static str> {
        self.definition.operation_names()
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Call an operation that takes only positional arguments
    pub async fn call(&self, name: &str, args: &[&str]) -> Result<ApiResponse> {
        let op = self.definition.operation(name)?;
        let response = self.requests.request(op, args, self.scope_query(op)).await?;
        self.after(op, &response);
        Ok(response)
    }

    /// Call an operation that sends a JSON body
    pub async fn call_with_data<T>(
        &self,
        name: &str,
        data: &T,
        args: &[&str],
    ) -> Result<ApiResponse>
    where
        T: Serialize + ?Sized,
    {
        let op = self.definition.operation(name)?;
        let response = self
            .requests
            .request_with_data(op, data, args, self.scope_query(op))
            .await?;
        self.after(op, &response);
        Ok(response)
    }

    /// Call an upload operation
    pub async fn upload(
        &self,
        name: &str,
        file: FileUpload,
        linked_id: Option<&str>,
        progress: Option<ProgressHandler>,
    ) -> Result<ApiResponse> {
        let op = self.definition.operation(name)?;
        self.requests
            .request_with_file(op, file, linked_id, progress)
            .await
    }

    /// Shorthand for the `list` operation
    pub async fn list(&self, args: &[&str]) -> Result<ApiResponse> {
        self.call("list", args).await
    }

    fn scope_query(&self, op: &Operation) -> Option<(&str, &str)> {
        if !op.paginated {
            return None;
        }
        self.definition.scope_param.zip(self.scope.as_deref())
    }

    fn after(&self, op: &Operation, response: &ApiResponse) {
        if op.paginated {
            self.refresh(&response.headers);
        }
    }

    // ========================================================================
    // Pagination
    // ========================================================================

    /// Fetch the next page
    pub async fn next_page(&self) -> Result<ApiResponse> {
        self.page(Rel::Next).await
    }

    /// Fetch the previous page
    pub async fn previous_page(&self) -> Result<ApiResponse> {
        self.page(Rel::Previous).await
    }

    /// Fetch the last page
    pub async fn last_page(&self) -> Result<ApiResponse> {
        self.page(Rel::Last).await
    }

    /// Fetch the page stored under `rel`
    ///
    /// Fails with [`Error::NoSuchPage`] without any I/O when the relation is
    /// absent. On success the pagination state is refreshed from the response.
    pub async fn page(&self, rel: Rel) -> Result<ApiResponse> {
        let url = self
            .read_state()
            .links
            .get(rel)
            .map(str::to_owned)
            .ok_or_else(|| Error::no_such_page(rel.as_str()))?;

        let response = self
            .requests
            .request_page(&url, Some(self.definition.page_accept()))
            .await?;
        self.refresh(&response.headers);
        Ok(response)
    }

    /// Clear every pagination link, keeping the count
    pub fn reset_pagination(&self) {
        self.write_state().reset_links();
    }

    /// Total items reported by the last list response
    pub fn count(&self) -> u64 {
        self.read_state().count
    }

    /// Snapshot of the current pagination links
    pub fn pagination_links(&self) -> PaginationLinks {
        self.read_state().links.clone()
    }

    /// Snapshot of the full pagination state
    pub fn pagination_state(&self) -> PaginationState {
        self.read_state().clone()
    }

    fn refresh(&self, headers: &HeaderMap) {
        let count_header = self.requests.count_header();
        self.write_state().update_from_headers(headers, count_header);
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, PaginationState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, PaginationState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("kind", &self.definition.kind)
            .field("scope", &self.scope)
            .field("state", &*self.read_state())
            .finish_non_exhaustive()
    }
}
