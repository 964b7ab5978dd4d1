//! Static-token identity adapter.
//!
//! Stands in for the hosted identity provider in development and tests:
//! a fixed map of pre-shared bearer tokens to principals. Token issuance
//! stays out of scope either way.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::ports::{IdentityError, IdentityVerifier};
use crate::domain::Principal;

/// [`IdentityVerifier`] backed by a fixed token table.
#[derive(Debug, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, Principal>,
}

impl StaticTokenVerifier {
    /// Create an empty verifier; every token is rejected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pre-shared token for a principal.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>, principal: Principal) -> Self {
        self.tokens.insert(token.into(), principal);
        self
    }
}

#[async_trait]
impl IdentityVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Option<Principal>, IdentityError> {
        Ok(self.tokens.get(token).copied())
    }
}
