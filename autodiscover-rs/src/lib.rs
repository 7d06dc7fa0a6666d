//! autodiscover-rs: mail client autodiscovery service
//!
//! Answers the two requests mail clients send to find the IMAP and SMTP
//! servers of a domain.
//!
//! # Features
//!
//! - Thunderbird autoconfig (`/mail/config-v1.1.xml`, any method)
//! - Outlook Autodiscover (`/Autodiscover/Autodiscover.xml`, POST only)
//! - Single-domain configuration from a YAML or TOML file
//!
//! # Example Configuration
//!
//! ```yaml
//! domain: example.com
//! imap-host: imap.example.com
//! smtp-host: smtp.example.com
//! ```

pub mod config;
pub mod error;
pub mod render;
pub mod request;
pub mod server;

pub use config::{AutodiscoverConfig, ServerSettings};
pub use error::{AutodiscoverError, Result};
pub use server::AutodiscoverServer;
