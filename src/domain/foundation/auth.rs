//! Authentication types for the domain layer.
//!
//! These types represent an authenticated caller as reported by the external
//! auth provider. Any provider can populate them via the `SessionValidator`
//! port; nothing here depends on a specific token format.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::UserId;
use crate::domain::billing::Tier;

/// Role granted to a user by the auth provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Parses a role case-insensitively. Anything other than `ADMIN` is a plain user.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

/// Authenticated caller identity: `{userId, role, tier, email}`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the auth provider.
    pub id: UserId,

    /// User's email address. Used as the correlation key in gateway notes.
    pub email: String,

    /// Role claim.
    pub role: Role,

    /// Tier as known when the session was issued. May lag behind the
    /// persisted user record until the session is refreshed.
    pub tier: Tier,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, email: impl Into<String>, role: Role, tier: Tier) -> Self {
        Self {
            id,
            email: email.into(),
            role,
            tier,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns true if the session carries a paid tier.
    pub fn has_active_tier(&self) -> bool {
        self.tier.is_active()
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
