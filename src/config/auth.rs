//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Session token configuration (HS256 JWTs issued by the web app)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared HMAC secret used to verify session tokens
    pub jwt_secret: SecretString,

    /// Expected `iss` claim, when the issuer sets one
    #[serde(default)]
    pub jwt_issuer: Option<String>,
}

impl AuthConfig {
    /// Trimmed secret, for building the validator.
    pub fn jwt_secret(&self) -> &str {
        self.jwt_secret.expose_secret().trim()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.jwt_secret().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: SecretString::new(secret.to_string()),
            jwt_issuer: None,
        }
    }

    #[test]
    fn blank_secret_is_rejected() {
        assert!(config("  ").validate().is_err());
    }

    #[test]
    fn secret_is_trimmed() {
        assert_eq!(config(" s3cret\n").jwt_secret(), "s3cret");
        assert!(config("s3cret").validate().is_ok());
    }

    #[test]
    fn debug_redacts_secret() {
        assert!(!format!("{:?}", config("s3cret")).contains("s3cret"));
    }
}
