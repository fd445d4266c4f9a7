//! Common types used throughout the SDK
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl Method {
    /// Upper-case verb as sent on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::PATCH => reqwest::Method::PATCH,
            Method::DELETE => reqwest::Method::DELETE,
        }
    }
}

// ============================================================================
// Settings and Accessors
// ============================================================================

/// Zero-argument function returning the current value of a setting
pub type Accessor<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// A setting supplied either as a fixed value or as an accessor function
///
/// Both forms are normalized into an [`Accessor`] at SDK construction:
/// fixed values are wrapped in a function returning a clone of the value,
/// accessors are used as given.
pub enum Setting<T> {
    /// Fixed value
    Value(T),
    /// Function evaluated on every read
    Accessor(Accessor<T>),
}

impl<T: Clone + Send + Sync + 'static> Setting<T> {
    /// Wrap a function as a setting
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::Accessor(Arc::new(f))
    }

    /// Normalize into a zero-argument accessor
    pub fn into_accessor(self) -> Accessor<T> {
        match self {
            Setting::Value(value) => Arc::new(move || value.clone()),
            Setting::Accessor(accessor) => accessor,
        }
    }

    /// Whether this setting was supplied as a function
    pub fn is_accessor(&self) -> bool {
        matches!(self, Setting::Accessor(_))
    }
}

impl<T: fmt::Debug> fmt::Debug for Setting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setting::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Setting::Accessor(_) => f.write_str("Accessor(..)"),
        }
    }
}

impl From<String> for Setting<String> {
    fn from(value: String) -> Self {
        Setting::Value(value)
    }
}

impl From<&str> for Setting<String> {
    fn from(value: &str) -> Self {
        Setting::Value(value.to_string())
    }
}
