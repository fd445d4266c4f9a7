//! HTTP transport module
//!
//! Provides the transport abstraction the request layer sends through, and a
//! reqwest-based default implementation.
//!
//! # Features
//!
//! - **Pluggable transport**: anything implementing [`HttpTransport`]
//! - **Streamed uploads**: chunked bodies with cumulative progress callbacks
//! - **Single attempt**: no retries or backoff

mod client;
mod types;
mod upload;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use types::{
    HttpRequest, HttpResponse, HttpTransport, ProgressHandler, RequestBody, UploadProgress,
};
pub use upload::{progress_stream, split_chunks, DEFAULT_CHUNK_SIZE};
