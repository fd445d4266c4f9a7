//! Request module
//!
//! Operations are plain data ([`Operation`]) consumed by one generic engine
//! ([`RequestBuilder`]), so resource definitions carry no logic of their own.

mod builder;
mod types;

pub use builder::{RequestBuilder, DEV_TOKEN_HEADER};
pub use types::{ApiResponse, FileUpload, Operation, OperationKind, DEFAULT_UPLOAD_TYPE};

#[cfg(test)]
pub(crate) mod tests;
