//! Credential source types
//!
//! An auth flow is anything that can report the current access token. Token
//! acquisition and refresh happen outside this crate; the SDK only reads the
//! token on every request and, when the flow exposes an event channel,
//! forwards its events.

use super::events::EventEmitter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, RwLock};

/// Event emitted by [`TokenStore`] whenever its token changes
pub const TOKEN_CHANGED: &str = "token_changed";

/// A source of access tokens
pub trait AuthFlow: Send + Sync {
    /// The current access token, if one is available
    fn access_token(&self) -> Option<String>;

    /// Event channel for flows that announce lifecycle changes
    fn events(&self) -> Option<EventEmitter> {
        None
    }
}

/// Shared handle to an auth flow
pub type AuthFlowHandle = Arc<dyn AuthFlow>;

// ============================================================================
// Static Token
// ============================================================================

/// A fixed access token
#[derive(Clone, PartialEq, Eq)]
pub struct StaticToken(String);

impl StaticToken {
    /// Create a static token flow
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl AuthFlow for StaticToken {
    fn access_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticToken(***)")
    }
}

// ============================================================================
// Token Function
// ============================================================================

/// An access token computed by a function on every read
pub struct TokenFn<F>(F);

impl<F> TokenFn<F>
where
    F: Fn() -> Option<String> + Send + Sync,
{
    /// Wrap a token function
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> AuthFlow for TokenFn<F>
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn access_token(&self) -> Option<String> {
        (self.0)()
    }
}

// ============================================================================
// Token Store
// ============================================================================

/// A settable access token that announces changes
///
/// Every call to [`TokenStore::set_token`] or [`TokenStore::clear`] emits a
/// [`TOKEN_CHANGED`] event whose single argument is a boolean telling whether
/// a token is now present. Other code may emit arbitrary events on the same
/// channel through [`TokenStore::emitter`].
pub struct TokenStore {
    token: RwLock<Option<String>>,
    events: EventEmitter,
}

impl TokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            token: RwLock::new(None),
            events: EventEmitter::new(),
        }
    }

    /// Create a store holding `token`
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        *store.write() = Some(token.into());
        store
    }

    /// Replace the current token
    pub fn set_token(&self, token: impl Into<String>) {
        *self.write() = Some(token.into());
        self.events.emit(TOKEN_CHANGED, vec![true.into()]);
    }

    /// Drop the current token
    pub fn clear(&self) {
        *self.write() = None;
        self.events.emit(TOKEN_CHANGED, vec![false.into()]);
    }

    /// The store's event channel
    pub fn emitter(&self) -> &EventEmitter {
        &self.events
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<String>> {
        self.token
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthFlow for TokenStore {
    fn access_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn events(&self) -> Option<EventEmitter> {
        Some(self.events.clone())
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("has_token", &self.access_token().is_some())
            .finish_non_exhaustive()
    }
}

/// Flow with no credential; requests made through it fail before any I/O
#[derive(Debug, Clone, Copy, Default)]
pub struct Unauthenticated;

impl AuthFlow for Unauthenticated {
    fn access_token(&self) -> Option<String> {
        None
    }
}

// ============================================================================
// Credential Header
// ============================================================================

/// Name and value prefix of the header carrying the access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialHeader {
    /// Header name
    #[serde(default = "default_header_name")]
    pub name: String,
    /// Prefix placed before the token (e.g., "Bearer ")
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl CredentialHeader {
    /// Create a credential header
    pub fn new(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
        }
    }

    /// Header value for `token`
    pub fn value_for(&self, token: &str) -> String {
        format!("{}{}", self.prefix, token)
    }
}

impl Default for CredentialHeader {
    fn default() -> Self {
        Self {
            name: default_header_name(),
            prefix: default_prefix(),
        }
    }
}

fn default_header_name() -> String {
    "Authorization".to_string()
}

fn default_prefix() -> String {
    "Bearer ".to_string()
}
