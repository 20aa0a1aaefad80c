// src/cli/serve.rs
// MCP server initialization and transports

use super::{ServeArgs, Transport};
use anyhow::Result;
use axum::{Json, Router, response::IntoResponse, routing::get};
use dci_mcp::config::EnvConfig;
use dci_mcp::dci::{DciApi, DciContext, HttpDciApi};
use dci_mcp::http::create_shared_client;
use dci_mcp::mcp::DciServer;
use dci_mcp::services::DciServices;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Validate configuration and wire the services to the DCI API
pub fn setup_services(env_config: &EnvConfig) -> Result<DciServices> {
    let validation = env_config.validate();
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    if !validation.is_valid() {
        anyhow::bail!("Invalid configuration:\n{}", validation.report());
    }

    let api: Arc<dyn DciApi> = Arc::new(HttpDciApi::new(create_shared_client()));
    let ctx = Arc::new(DciContext::from_config(env_config));
    info!(
        url = %ctx.base_url(),
        auth = env_config.credentials.mode(),
        "DCI client ready"
    );
    Ok(DciServices::new(api, ctx))
}

/// Run the MCP server on the requested transport
pub async fn run_mcp_server(args: ServeArgs, config: &EnvConfig) -> Result<()> {
    let server = DciServer::new(setup_services(config)?);
    match args.transport {
        Transport::Stdio => run_stdio(server).await,
        Transport::Http => run_http(server, &args.host, args.port).await,
    }
}

async fn run_stdio(server: DciServer) -> Result<()> {
    let transport = rmcp::transport::io::stdio();
    let service = rmcp::serve_server(server, transport).await?;
    service.waiting().await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create the MCP HTTP service; every session gets a clone of `server`
fn create_mcp_service(server: DciServer) -> StreamableHttpService<DciServer, LocalSessionManager> {
    let service_factory = move || Ok(server.clone());
    let session_manager = Arc::new(LocalSessionManager::default());
    let config = StreamableHttpServerConfig {
        sse_keep_alive: Some(std::time::Duration::from_secs(15)),
        stateful_mode: true,
        ..Default::default()
    };
    StreamableHttpService::new(service_factory, session_manager, config)
}

fn create_router(server: DciServer) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest_service("/mcp", create_mcp_service(server))
        .layer(TraceLayer::new_for_http())
}

async fn run_http(server: DciServer, host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("DCI MCP server listening on http://{}/mcp", addr);

    axum::serve(listener, create_router(server))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;
    Ok(())
}
