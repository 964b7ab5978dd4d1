//! Authenticated caller identity.
//!
//! Token verification itself is delegated to an external identity provider
//! behind [`crate::domain::ports::IdentityVerifier`]; the domain only sees
//! the resulting principal.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Role attached to an authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Business owner: may override deposits and administer operators.
    Owner,
    /// Daily operator: deposits gate their own login eligibility.
    Operator,
}

/// Verified caller identity as asserted by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Stable account identifier.
    pub id: Uuid,
    /// Role granted at signup.
    pub role: Role,
}

impl Principal {
    /// Construct a principal from its parts.
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    /// Whether this principal holds the owner role.
    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }
}
