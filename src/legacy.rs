//! Process-wide default client kept for backward compatibility
//!
//! Older callers used one shared client whose auth flow and base URL were set
//! globally. It is still available through [`api`] until the first [`Sdk`]
//! is constructed; from then on [`api`] fails with [`Error::Deprecated`].
//!
//! [`Sdk`]: crate::Sdk

use crate::auth::{AuthFlow, AuthFlowHandle, Authenticator, Unauthenticated};
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpClient;
use crate::request::RequestBuilder;
use crate::resources::Api;
use crate::sdk::DEFAULT_BASE_URL;
use crate::types::Accessor;
use once_cell::sync::OnceCell;
use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::warn;

static INSTANCE_CREATED: AtomicBool = AtomicBool::new(false);
static LEGACY: OnceCell<LegacyApi> = OnceCell::new();

pub(crate) fn mark_instance_created() {
    INSTANCE_CREATED.store(true, Ordering::SeqCst);
}

/// True once any [`Sdk`](crate::Sdk) has been constructed in this process
pub fn instance_created() -> bool {
    INSTANCE_CREATED.load(Ordering::SeqCst)
}

/// The shared default client
///
/// Fails once an [`Sdk`](crate::Sdk) instance exists, since the global
/// settings would silently diverge from that instance's configuration.
#[deprecated(note = "construct an `Sdk` with `SdkOptions` instead")]
pub fn api() -> Result<&'static LegacyApi> {
    if instance_created() {
        return Err(Error::deprecated(
            "the global API is unavailable once an Sdk instance exists, use that instance instead",
        ));
    }
    warn!("Using the deprecated global API");
    LEGACY.get_or_try_init(LegacyApi::build)
}

/// Global client with settable auth flow and base URL
pub struct LegacyApi {
    api: Api,
    auth_flow: Arc<RwLock<Option<AuthFlowHandle>>>,
    base_url: Arc<RwLock<String>>,
}

impl LegacyApi {
    fn build() -> Result<Self> {
        let auth_flow = Arc::new(RwLock::new(None::<AuthFlowHandle>));
        let base_url = Arc::new(RwLock::new(DEFAULT_BASE_URL.to_string()));

        let flow_slot = auth_flow.clone();
        let flow_accessor: Accessor<AuthFlowHandle> = Arc::new(move || {
            flow_slot
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
                .unwrap_or_else(|| Arc::new(Unauthenticated) as AuthFlowHandle)
        });
        let url_slot = base_url.clone();
        let url_accessor: Accessor<String> = Arc::new(move || {
            url_slot
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        });

        let requests = RequestBuilder::new(
            Authenticator::new(flow_accessor),
            url_accessor,
            Arc::new(HttpClient::new().context("Failed to build global HTTP client")?),
        );

        Ok(Self {
            api: Api::new(Arc::new(requests)),
            auth_flow,
            base_url,
        })
    }

    /// Replace the global auth flow
    pub fn set_auth_flow(&self, flow: impl AuthFlow + 'static) {
        self.set_auth_flow_handle(Arc::new(flow));
    }

    /// Replace the global auth flow with a shared handle
    pub fn set_auth_flow_handle(&self, flow: AuthFlowHandle) {
        *self
            .auth_flow
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(flow);
    }

    /// Replace the global base URL
    pub fn set_base_url(&self, url: impl Into<String>) {
        *self.base_url.write().unwrap_or_else(PoisonError::into_inner) = url.into();
    }

    /// Current global base URL
    pub fn base_url(&self) -> String {
        self.base_url
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a global auth flow has been set
    pub fn has_auth_flow(&self) -> bool {
        self.auth_flow
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Deref for LegacyApi {
    type Target = Api;

    fn deref(&self) -> &Api {
        &self.api
    }
}

impl fmt::Debug for LegacyApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyApi")
            .field("base_url", &self.base_url())
            .field("has_auth_flow", &self.has_auth_flow())
            .finish_non_exhaustive()
    }
}
