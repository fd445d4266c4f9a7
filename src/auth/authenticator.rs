//! Authenticator implementation
//!
//! Resolves the current credential from the configured auth flow and turns it
//! into the credential header attached to each request.

use super::events::EventEmitter;
use super::types::{AuthFlowHandle, CredentialHeader};
use crate::error::{Error, Result};
use crate::types::Accessor;
use std::fmt;

/// Authenticator reads credentials from an auth flow accessor
///
/// The token is read fresh on every call, so rotating it in the flow takes
/// effect on the very next request.
#[derive(Clone)]
pub struct Authenticator {
    /// Normalized auth flow accessor
    flow: Accessor<AuthFlowHandle>,
    /// Header carrying the credential
    header: CredentialHeader,
}

impl Authenticator {
    /// Create an authenticator using the default `Authorization: Bearer` header
    pub fn new(flow: Accessor<AuthFlowHandle>) -> Self {
        Self::with_header(flow, CredentialHeader::default())
    }

    /// Create an authenticator with a custom credential header
    pub fn with_header(flow: Accessor<AuthFlowHandle>, header: CredentialHeader) -> Self {
        Self { flow, header }
    }

    /// The auth flow currently returned by the accessor
    pub fn current_flow(&self) -> AuthFlowHandle {
        (self.flow)()
    }

    /// The auth flow accessor itself
    pub fn flow_accessor(&self) -> Accessor<AuthFlowHandle> {
        self.flow.clone()
    }

    /// The current credential, if the flow has one
    pub fn current_credential(&self) -> Option<String> {
        self.current_flow().access_token()
    }

    /// Header name and value to attach to the next request
    pub fn credential_header(&self) -> Result<(String, String)> {
        let token = self
            .current_credential()
            .ok_or_else(|| Error::auth("auth flow has no access token"))?;
        Ok((self.header.name.clone(), self.header.value_for(&token)))
    }

    /// Forward the flow's events onto `target`
    ///
    /// Returns false when the flow does not expose an event channel.
    pub fn forward_events(&self, target: &EventEmitter) -> bool {
        match self.current_flow().events() {
            Some(events) => {
                events.forward_to(target);
                true
            }
            None => false,
        }
    }

    /// Get the credential header configuration
    pub fn header(&self) -> &CredentialHeader {
        &self.header
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("header", &self.header.name)
            .finish_non_exhaustive()
    }
}
