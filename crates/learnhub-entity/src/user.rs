//! User role as carried in JWT claims.
//!
//! Identity itself is owned by the external identity provider; this service
//! never stores users, it only reads the role from verified tokens.

use serde::{Deserialize, Serialize};

/// Role of an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Learner account.
    Student,
    /// Course author account.
    Instructor,
    /// Platform administrator.
    Admin,
}

impl UserRole {
    /// Whether this role may create notifications through the privileged
    /// REST surface.
    pub fn can_create_notifications(&self) -> bool {
        matches!(self, Self::Admin)
    }
}
