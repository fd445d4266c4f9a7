// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Mendeley SDK
//!
//! A client library for the Mendeley document-management REST API.
//!
//! ## Features
//!
//! - **Pluggable auth flows**: static tokens, token functions, or live token
//!   stores whose events are re-emitted on the SDK instance
//! - **Declarative endpoints**: documents, files, folders, groups, annotations
//!   and trash, all driven by one generic request engine
//! - **Link-header pagination**: next/previous/last links and total counts
//!   tracked per endpoint instance
//! - **Scoped clones**: `endpoint.for_scope(key)` gives memoized instances
//!   with independent pagination state
//! - **Streamed uploads**: progress callbacks with cumulative byte counts
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mendeley_sdk::{Sdk, SdkOptions, StaticToken, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let sdk = Sdk::new(
//!         SdkOptions::builder()
//!             .auth_flow(StaticToken::new("access-token"))
//!             .build(),
//!     )?;
//!
//!     // First page of folders
//!     let page = sdk.folders().list(&[]).await?;
//!     println!("{} folders in total", sdk.folders().count());
//!
//!     // Walk the remaining pages
//!     while sdk.folders().pagination_links().next.is_some() {
//!         let page = sdk.folders().next_page().await?;
//!     }
//!
//!     // Same endpoint scoped to a group
//!     let group_docs = sdk.documents().for_scope("group-id");
//!     group_docs.list(&[]).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           Sdk façade                            │
//! │   options → accessors      auth events → sdk.on / subscribe     │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │  Request  │   Paginate    │ Endpoint  │    HTTP     │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Static   │ No body   │ Link header   │ Tables    │ reqwest     │
//! │ Function │ JSON body │ Count header  │ Clones    │ Streamed    │
//! │ Store    │ Upload    │ Reset         │ Registry  │  uploads    │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the SDK
pub mod error;

/// Common types and type aliases
pub mod types;

/// Content types per resource kind
pub mod mime;

/// Auth flows and event forwarding
pub mod auth;

/// HTTP transport
pub mod http;

/// Link-header pagination
pub mod pagination;

/// URL template interpolation
pub mod template;

/// Generic request execution
pub mod request;

/// Endpoint definitions and live instances
pub mod endpoint;

/// Resource operation tables
pub mod resources;

/// File and environment configuration
pub mod config;

/// The SDK façade
pub mod sdk;

/// Deprecated process-wide client
pub mod legacy;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::{AuthEvent, AuthFlow, AuthFlowHandle, StaticToken, TokenFn, TokenStore};
pub use config::SdkConfig;
pub use endpoint::Endpoint;
pub use request::{ApiResponse, FileUpload};
pub use resources::Api;
pub use sdk::{Sdk, SdkOptions, DEFAULT_BASE_URL};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
