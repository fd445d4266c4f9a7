//! SDK façade
//!
//! [`Sdk`] validates its options, normalizes the auth flow and base URL into
//! accessors, builds one endpoint per resource kind against them, and
//! re-emits every event of the auth flow on its own [`EventEmitter`].
//!
//! # Example
//!
//! ```rust,ignore
//! use mendeley_sdk::{Sdk, SdkOptions, StaticToken};
//!
//! let sdk = Sdk::new(
//!     SdkOptions::builder()
//!         .auth_flow(StaticToken::new("access-token"))
//!         .build(),
//! )?;
//!
//! let folders = sdk.folders().list(&[]).await?;
//! println!("{} folders", sdk.folders().count());
//! ```

use crate::auth::{
    AuthEvent, AuthFlow, AuthFlowHandle, Authenticator, CredentialHeader, EventEmitter,
    StaticToken, DEFAULT_EVENT_CAPACITY,
};
use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClient, HttpClientConfig, HttpTransport};
use crate::legacy;
use crate::pagination::DEFAULT_COUNT_HEADER;
use crate::request::RequestBuilder;
use crate::resources::Api;
use crate::types::{Accessor, Setting};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// Production API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.mendeley.com";

// ============================================================================
// Options
// ============================================================================

/// Construction options for [`Sdk`]
pub struct SdkOptions {
    /// Credential source; required
    pub auth_flow: Option<Setting<AuthFlowHandle>>,
    /// API base URL; defaults to [`DEFAULT_BASE_URL`]
    pub base_url: Option<Setting<String>>,
    /// Sent as `Development-Token` on every request
    pub dev_token: Option<String>,
    /// Header carrying the access token
    pub credential_header: CredentialHeader,
    /// Response header holding the total item count of list calls
    pub count_header: String,
    /// Settings for the default transport
    pub http: HttpClientConfig,
    /// Transport to use instead of the default reqwest client
    pub transport: Option<Arc<dyn HttpTransport>>,
    /// Events buffered per [`Sdk::subscribe`] receiver before it lags
    pub event_capacity: usize,
}

impl Default for SdkOptions {
    fn default() -> Self {
        Self {
            auth_flow: None,
            base_url: None,
            dev_token: None,
            credential_header: CredentialHeader::default(),
            count_header: DEFAULT_COUNT_HEADER.to_string(),
            http: HttpClientConfig::default(),
            transport: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl SdkOptions {
    /// Create a new options builder
    pub fn builder() -> SdkOptionsBuilder {
        SdkOptionsBuilder::default()
    }
}

impl fmt::Debug for SdkOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkOptions")
            .field("has_auth_flow", &self.auth_flow.is_some())
            .field("base_url", &self.base_url)
            .field("has_dev_token", &self.dev_token.is_some())
            .field("credential_header", &self.credential_header)
            .field("count_header", &self.count_header)
            .field("http", &self.http)
            .field("has_transport", &self.transport.is_some())
            .field("event_capacity", &self.event_capacity)
            .finish()
    }
}

/// Builder for [`SdkOptions`]
#[derive(Default)]
pub struct SdkOptionsBuilder {
    options: SdkOptions,
}

impl SdkOptionsBuilder {
    /// Use a fixed auth flow
    pub fn auth_flow(self, flow: impl AuthFlow + 'static) -> Self {
        self.auth_flow_handle(Arc::new(flow))
    }

    /// Use a shared auth flow handle
    pub fn auth_flow_handle(mut self, flow: AuthFlowHandle) -> Self {
        self.options.auth_flow = Some(Setting::Value(flow));
        self
    }

    /// Resolve the auth flow through a function on every request
    pub fn auth_flow_fn<F>(mut self, f: F) -> Self
    where
        F: Fn() -> AuthFlowHandle + Send + Sync + 'static,
    {
        self.options.auth_flow = Some(Setting::from_fn(f));
        self
    }

    /// Shorthand for a [`StaticToken`] auth flow
    pub fn access_token(self, token: impl Into<String>) -> Self {
        self.auth_flow(StaticToken::new(token))
    }

    /// Use a fixed base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.options.base_url = Some(Setting::Value(url.into()));
        self
    }

    /// Resolve the base URL through a function on every request
    pub fn base_url_fn<F>(mut self, f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.options.base_url = Some(Setting::from_fn(f));
        self
    }

    /// Send a `Development-Token` header on every request
    pub fn dev_token(mut self, token: impl Into<String>) -> Self {
        self.options.dev_token = Some(token.into());
        self
    }

    /// Carry the access token in a custom header
    pub fn credential_header(mut self, header: CredentialHeader) -> Self {
        self.options.credential_header = header;
        self
    }

    /// Read the total item count from a different response header
    pub fn count_header(mut self, name: impl Into<String>) -> Self {
        self.options.count_header = name.into();
        self
    }

    /// Settings for the default reqwest transport
    pub fn http(mut self, config: HttpClientConfig) -> Self {
        self.options.http = config;
        self
    }

    /// Send requests through a custom transport
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.options.transport = Some(transport);
        self
    }

    /// Buffer size of the async event channel
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.options.event_capacity = capacity;
        self
    }

    /// Build the options
    pub fn build(self) -> SdkOptions {
        self.options
    }
}

// ============================================================================
// Sdk
// ============================================================================

/// A configured API client
///
/// Dereferences to [`Api`], so endpoints are reachable as `sdk.folders()`.
#[derive(Clone)]
pub struct Sdk {
    api: Api,
    auth_flow: Accessor<AuthFlowHandle>,
    base_url: Accessor<String>,
    events: EventEmitter,
    requests: Arc<RequestBuilder>,
}

impl Sdk {
    /// Create an SDK instance
    ///
    /// Fails with a configuration error when no auth flow is given.
    pub fn new(options: SdkOptions) -> Result<Self> {
        let auth_flow = options
            .auth_flow
            .ok_or_else(|| Error::missing_field("auth_flow"))?
            .into_accessor();
        let base_url = options
            .base_url
            .unwrap_or_else(|| Setting::from(DEFAULT_BASE_URL))
            .into_accessor();

        if options.count_header.trim().is_empty() {
            return Err(Error::InvalidConfigValue {
                field: "count_header".to_string(),
                message: "header name cannot be empty".to_string(),
            });
        }

        let transport: Arc<dyn HttpTransport> = match options.transport {
            Some(transport) => transport,
            None => Arc::new(
                HttpClient::with_config(options.http).context("Failed to build HTTP client")?,
            ),
        };

        let authenticator =
            Authenticator::with_header(auth_flow.clone(), options.credential_header);
        let requests = Arc::new(
            RequestBuilder::new(authenticator.clone(), base_url.clone(), transport)
                .with_dev_token(options.dev_token)
                .with_count_header(options.count_header),
        );

        let events = EventEmitter::with_capacity(options.event_capacity);
        if !authenticator.forward_events(&events) {
            debug!("Auth flow exposes no events");
        }

        legacy::mark_instance_created();
        debug!("SDK configured for {}", base_url());

        Ok(Self {
            api: Api::new(requests.clone()),
            auth_flow,
            base_url,
            events,
            requests,
        })
    }

    /// Create an SDK instance from optional options
    ///
    /// Fails with a configuration error when `options` is `None`.
    pub fn from_options(options: Option<SdkOptions>) -> Result<Self> {
        Self::new(options.ok_or_else(|| Error::config("an options object is required"))?)
    }

    /// Normalized auth flow accessor
    pub fn auth_flow(&self) -> Accessor<AuthFlowHandle> {
        self.auth_flow.clone()
    }

    /// Normalized base URL accessor
    pub fn base_url(&self) -> Accessor<String> {
        self.base_url.clone()
    }

    /// The endpoints
    pub fn api(&self) -> &Api {
        &self.api
    }

    /// The shared request engine
    pub fn requests(&self) -> &Arc<RequestBuilder> {
        &self.requests
    }

    /// Event channel carrying forwarded auth flow events
    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    /// Listen for one event name
    pub fn on<F>(&self, name: impl Into<String>, listener: F)
    where
        F: Fn(&AuthEvent) + Send + Sync + 'static,
    {
        self.events.on(name, listener);
    }

    /// Listen for every event
    pub fn on_any<F>(&self, listener: F)
    where
        F: Fn(&AuthEvent) + Send + Sync + 'static,
    {
        self.events.on_any(listener);
    }

    /// Subscribe to events asynchronously
    ///
    /// The channel buffers [`SdkOptions::event_capacity`] events. A receiver
    /// that falls further behind gets `RecvError::Lagged` and the oldest
    /// events are lost to it; synchronous listeners registered with
    /// [`Sdk::on`] never lag.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

impl Deref for Sdk {
    type Target = Api;

    fn deref(&self) -> &Api {
        &self.api
    }
}

impl fmt::Debug for Sdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sdk")
            .field("base_url", &(self.base_url)())
            .field("requests", &self.requests)
            .finish_non_exhaustive()
    }
}
