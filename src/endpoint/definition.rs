//! Endpoint definitions
//!
//! A definition is an immutable table of operations for one resource kind.
//! It is built once per SDK instance and shared read-only by the base
//! endpoint and every scoped clone.

use crate::error::{Error, Result};
use crate::mime::ResourceKind;
use crate::request::Operation;

/// Operation table for one resource kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDefinition {
    /// Resource kind served by this endpoint
    pub kind: ResourceKind,
    /// Operations in declaration order
    pub operations: Vec<Operation>,
    /// Query parameter carrying a clone's scope key on paginated calls
    pub scope_param: Option<&'static str>,
}

impl EndpointDefinition {
    /// Create an empty definition
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            operations: Vec::new(),
            scope_param: None,
        }
    }

    /// Add an operation
    #[must_use]
    pub fn with(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Send the scope key of clones as `param` on paginated calls
    #[must_use]
    pub fn scoped_by(mut self, param: &'static str) -> Self {
        self.scope_param = Some(param);
        self
    }

    /// Look up an operation by name
    pub fn operation(&self, name: &str) -> Result<&Operation> {
        self.operations
            .iter()
            .find(|op| op.name == name)
            .ok_or_else(|| Error::UnknownOperation {
                resource: self.kind.name().to_string(),
                operation: name.to_string(),
            })
    }

    /// Check whether an operation exists
    pub fn has_operation(&self, name: &str) -> bool {
        self.operations.iter().any(|op| op.name == name)
    }

    /// Operation names in declaration order
    pub fn operation_names(&self) -> Vec<&'static str> {
        self.operations.iter().map(|op| op.name).collect()
    }

    /// Accept header used when following pagination links
    pub fn page_accept(&self) -> &'static str {
        self.kind.mime_type()
    }
}
