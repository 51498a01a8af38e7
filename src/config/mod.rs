//! Application configuration management

use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};

/// Secret used to sign and verify bearer tokens (HS256).
///
/// `Debug` is redacted so the whole [`Config`] can be logged.
#[derive(Clone, PartialEq, Eq)]
pub struct AppSecret(String);

impl AppSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for AppSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AppSecret(<redacted>)")
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// SQLite URL (`sqlite:` prefix added to bare paths)
    pub database_url: String,

    /// Maximum pooled connections
    pub database_max_connections: u32,

    /// Token signing secret
    pub app_secret: AppSecret,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // No fallback secret; startup fails instead. A blank value counts as
        // missing, anything else is the key byte for byte.
        let app_secret = lookup("APP_SECRET")
            .or_else(|| lookup("REACT_APP_SECRET"))
            .filter(|s| !s.trim().is_empty())
            .context("APP_SECRET is required to verify bearer tokens")?;

        let host = match lookup("HOST") {
            Some(host) => host.parse().context("Invalid HOST")?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = lookup("PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse()
            .context("Invalid PORT")?;

        let database_url = lookup("DATABASE_URL")
            .or_else(|| lookup("DATABASE_PATH"))
            .map(|url| {
                if url.starts_with("sqlite:") {
                    url
                } else {
                    format!("sqlite:{}", url)
                }
            })
            .unwrap_or_else(|| "sqlite:linkfeed.db".to_string());

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .context("Invalid DATABASE_MAX_CONNECTIONS")?;

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            app_secret: AppSecret::new(app_secret),
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("APP_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.database_url, "sqlite:linkfeed.db");
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8000");
        assert_eq!(config.app_secret, AppSecret::new("s3cret"));
    }

    #[test]
    fn test_missing_secret_fails() {
        let err = load(&[]).unwrap_err();
        assert!(err.to_string().contains("APP_SECRET"));

        assert!(load(&[("APP_SECRET", "   ")]).is_err());
    }

    #[test]
    fn test_legacy_secret_name() {
        let config = load(&[("REACT_APP_SECRET", "legacy")]).unwrap();
        assert_eq!(config.app_secret, AppSecret::new("legacy"));
    }

    #[test]
    fn test_secret_whitespace_is_kept() {
        let config = load(&[("APP_SECRET", " padded secret\n")]).unwrap();
        assert_eq!(config.app_secret, AppSecret::new(" padded secret\n"));
        assert_eq!(config.app_secret.as_bytes(), b" padded secret\n");
    }

    #[test]
    fn test_database_path_gets_prefix() {
        let config = load(&[("APP_SECRET", "x"), ("DATABASE_PATH", "/tmp/feed.db")]).unwrap();
        assert_eq!(config.database_url, "sqlite:/tmp/feed.db");
    }

    #[test]
    fn test_invalid_port() {
        assert!(load(&[("APP_SECRET", "x"), ("PORT", "http")]).is_err());
    }

    #[test]
    fn test_secret_is_redacted() {
        let config = load(&[("APP_SECRET", "hunter2")]).unwrap();
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
