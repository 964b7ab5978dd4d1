//! Port abstraction for bearer-token verification.
//!
//! Token issuance and session management belong to the hosted identity
//! provider; the core only asks it to resolve a bearer token into a
//! principal.

use async_trait::async_trait;
use thiserror::Error as ThisError;

use crate::domain::Principal;

/// Errors raised by identity verification adapters.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum IdentityError {
    /// The provider could not be reached.
    #[error("identity provider unavailable: {message}")]
    Unavailable {
        /// Transport-level failure description.
        message: String,
    },
}

impl IdentityError {
    /// Construct an [`IdentityError::Unavailable`] error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Resolves bearer tokens into verified principals.
///
/// `Ok(None)` means the token is missing, expired, or unknown; callers map
/// that to an unauthorised response. Provider outages are a distinct,
/// possibly-retryable failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a bearer token and return the principal it belongs to.
    async fn verify(&self, token: &str) -> Result<Option<Principal>, IdentityError>;
}

impl From<IdentityError> for crate::domain::Error {
    fn from(error: IdentityError) -> Self {
        match error {
            IdentityError::Unavailable { message } => {
                Self::service_unavailable(format!("identity provider unavailable: {message}"))
            }
        }
    }
}
