//! Configuration for autodiscover-rs

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use crate::error::{AutodiscoverError, Result};

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Default listen address
pub const DEFAULT_LISTEN_ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Mail domain settings advertised to clients
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AutodiscoverConfig {
    /// Mail domain (e.g., "example.com")
    pub domain: String,
    /// IMAP server hostname
    #[serde(rename = "imap-host")]
    pub imap_host: String,
    /// SMTP server hostname
    #[serde(rename = "smtp-host")]
    pub smtp_host: String,
}

impl AutodiscoverConfig {
    /// Load configuration from a file; the format follows the file extension
    /// (`.yaml`/`.yml` or `.toml`)
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()
            .map_err(|e| AutodiscoverError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| AutodiscoverError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("domain", &self.domain),
            ("imap-host", &self.imap_host),
            ("smtp-host", &self.smtp_host),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(AutodiscoverError::Config(format!("'{}' must not be empty", name)));
            }
        }

        Ok(())
    }
}

/// Listen socket settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerSettings {
    /// IP address to bind to
    pub address: IpAddr,
    /// HTTP port
    pub http_port: u16,
}

impl ServerSettings {
    /// Socket address to bind the HTTP listener to
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.http_port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: DEFAULT_LISTEN_ADDRESS,
            http_port: DEFAULT_HTTP_PORT,
        }
    }
}
