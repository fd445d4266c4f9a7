//! Endpoint module
//!
//! An [`EndpointDefinition`] is the declarative operation table of one resource
//! kind. An [`Endpoint`] exposes those operations against a shared request
//! engine and tracks its own pagination state.
//!
//! Scoped clones (`endpoint.for_scope("group-id")`) share the definition and
//! engine but keep independent pagination state. Clones are memoized per key
//! on the base endpoint, with insert-if-absent semantics under concurrency.

mod definition;
mod instance;

pub use definition::EndpointDefinition;
pub use instance::Endpoint;

#[cfg(test)]
mod tests;
