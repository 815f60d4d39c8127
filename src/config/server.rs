//! Listener, logging and request-handling settings for the billing service.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::Deserialize;

use super::error::ValidationError;

/// Upper bound for `request_timeout_secs`. Gateway deliveries time out well before this.
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// `server.*` settings.
///
/// Every key is optional; an unparseable `host` is rejected at load time.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub environment: Environment,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,
    pub request_timeout_secs: u64,
    /// Comma-separated browser origins allowed to call the user routes.
    pub cors_origins: Option<String>,
}

/// Deployment environment. Production switches logs to JSON and requires an
/// HTTPS gateway URL.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            environment: Environment::Development,
            log_level: "info,tier_billing=debug,sqlx=warn".to_string(),
            request_timeout_secs: 30,
            cors_origins: None,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Configured origins, trimmed, blanks dropped.
    pub fn cors_origins(&self) -> impl Iterator<Item = &str> {
        self.cors_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_all_interfaces() {
        let server = ServerConfig::default();
        assert_eq!(server.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(server.request_timeout(), Duration::from_secs(30));
        assert!(!server.is_production());
        assert!(server.validate().is_ok());
    }

    #[test]
    fn host_and_port_form_the_bind_address() {
        let server = ServerConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            ..Default::default()
        };
        assert_eq!(server.socket_addr().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn cors_origins_skip_blank_entries() {
        let server = ServerConfig {
            cors_origins: Some(" https://app.example.com, ,https://admin.example.com ".to_string()),
            ..Default::default()
        };
        let origins: Vec<&str> = server.cors_origins().collect();
        assert_eq!(origins, ["https://app.example.com", "https://admin.example.com"]);
        assert_eq!(ServerConfig::default().cors_origins().count(), 0);
    }

    #[test]
    fn zero_port_is_rejected() {
        let server = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert!(matches!(server.validate(), Err(ValidationError::InvalidPort)));
    }

    #[test]
    fn timeout_must_be_within_bounds() {
        for secs in [0, MAX_REQUEST_TIMEOUT_SECS + 1] {
            let server = ServerConfig {
                request_timeout_secs: secs,
                ..Default::default()
            };
            assert!(matches!(server.validate(), Err(ValidationError::InvalidTimeout)));
        }
        let server = ServerConfig {
            request_timeout_secs: MAX_REQUEST_TIMEOUT_SECS,
            ..Default::default()
        };
        assert!(server.validate().is_ok());
    }
}
