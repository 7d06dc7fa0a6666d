//! autodiscover-rs: mail client autodiscovery server
//!
//! # Usage
//!
//! ```bash
//! autodiscover-rs --config autodiscover.yaml --address 0.0.0.0 --http-port 8080 --verbose
//! ```

use autodiscover_rs::config::{DEFAULT_HTTP_PORT, DEFAULT_LISTEN_ADDRESS};
use autodiscover_rs::{AutodiscoverConfig, AutodiscoverServer, ServerSettings};
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "autodiscover-rs")]
#[command(about = "Serve mail client autodiscovery documents", long_about = None)]
struct Cli {
    /// HTTP port
    #[arg(long, default_value_t = DEFAULT_HTTP_PORT)]
    http_port: u16,

    /// IP to bind to
    #[arg(long, default_value_t = DEFAULT_LISTEN_ADDRESS)]
    address: IpAddr,

    /// Config file (YAML or TOML)
    #[arg(long)]
    config: PathBuf,

    /// Enable verbose logs
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose {
        "autodiscover_rs=debug,tower_http=debug"
    } else {
        "autodiscover_rs=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting autodiscover-rs v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    info!("Loading configuration from {}", cli.config.display());
    let config = match AutodiscoverConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return Err(e.into());
        }
    };

    info!(
        domain = %config.domain,
        imap_host = %config.imap_host,
        smtp_host = %config.smtp_host,
        "Running with configuration"
    );

    let settings = ServerSettings {
        address: cli.address,
        http_port: cli.http_port,
    };

    let server = AutodiscoverServer::new(Arc::new(config));
    server.run(settings.socket_addr()).await?;

    Ok(())
}
