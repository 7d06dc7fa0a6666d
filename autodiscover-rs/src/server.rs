//! HTTP server for autodiscovery requests

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Request},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::config::AutodiscoverConfig;
use crate::error::{AutodiscoverError, Result};
use crate::render::{render_account_descriptor, render_provider_descriptor};
use crate::request::{DiscoveryRequest, RequestContext};

/// Thunderbird autoconfig path
pub const PROVIDER_DESCRIPTOR_PATH: &str = "/mail/config-v1.1.xml";

/// Outlook Autodiscover path
pub const AUTODISCOVER_PATH: &str = "/Autodiscover/Autodiscover.xml";

/// Upper bound on Autodiscover request bodies (axum's default extractor limit)
pub const MAX_REQUEST_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Shared server state
pub struct AppState {
    /// Read-only configuration
    pub config: Arc<AutodiscoverConfig>,
}

/// Autodiscover server
pub struct AutodiscoverServer {
    state: Arc<AppState>,
}

impl AutodiscoverServer {
    /// Create a new server for the given configuration
    pub fn new(config: Arc<AutodiscoverConfig>) -> Self {
        Self {
            state: Arc::new(AppState { config }),
        }
    }

    /// Build the Axum router
    ///
    /// Paths other than the two discovery documents get axum's default 404.
    pub fn router(&self) -> Router {
        Router::new()
            .route(PROVIDER_DESCRIPTOR_PATH, any(provider_descriptor))
            .route(AUTODISCOVER_PATH, any(autodiscover))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serve requests on `addr` until Ctrl-C
    pub async fn run(&self, addr: SocketAddr) -> Result<()> {
        let listener = TcpListener::bind(addr).await?;
        info!("Starting autodiscover server on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}

/// Any method /mail/config-v1.1.xml - Thunderbird provider descriptor
async fn provider_descriptor(State(state): State<Arc<AppState>>) -> Result<Response> {
    debug!("Thunderbird config request");

    let xml = render_provider_descriptor(&state.config)?;
    Ok(Body::from(xml).into_response())
}

/// POST /Autodiscover/Autodiscover.xml - Outlook account descriptor
async fn autodiscover(State(state): State<Arc<AppState>>, req: Request<Body>) -> Result<Response> {
    debug!("Outlook config request");

    if req.method() != Method::POST {
        return Err(AutodiscoverError::UnsupportedMethod(req.method().to_string()));
    }

    let body = axum::body::to_bytes(req.into_body(), MAX_REQUEST_BODY_BYTES)
        .await
        .map_err(|e| AutodiscoverError::BodyRead(e.to_string()))?;

    let request = DiscoveryRequest::parse(&body)?;
    debug!(schema = %request.acceptable_response_schema, "Got response schema");

    let context = RequestContext::from_request(&request);
    let xml = render_account_descriptor(&state.config, &context)?;

    Ok(([(header::CONTENT_TYPE, "text/xml")], xml).into_response())
}
