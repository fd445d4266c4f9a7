//! Authentication module
//!
//! Supports: static tokens, token functions, live token stores with events
//!
//! The `Authenticator` normalizes any credential source into a zero-argument
//! accessor and produces the credential header for each request.

mod authenticator;
mod events;
mod types;

pub use authenticator::Authenticator;
pub use events::{AuthEvent, EventEmitter, DEFAULT_EVENT_CAPACITY};
pub use types::{
    AuthFlow, AuthFlowHandle, CredentialHeader, StaticToken, TokenFn, TokenStore,
    Unauthenticated, TOKEN_CHANGED,
};
