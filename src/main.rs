//! Ruleflow API - rule governance workflow
//!
//! Suggestions come in as enhancements, get promoted into proposals, and
//! approved proposals become rules that clients can query by category, tag
//! and project. Proposals can also be sent back as fresh enhancements.
//!
//! State lives in memory; every transition is atomic per entity.

mod audit;
mod bug_report;
mod config;
mod error;
mod models;
mod routes;
mod state;
mod workflow;

use crate::config::{LogFormat, Settings};
use crate::routes::{create_router, ENDPOINTS};
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first so the log format is known
    let settings = Settings::load()?;

    init_tracing(settings.log_format);

    info!("🚀 Starting Ruleflow - rule governance workflow...");
    info!("📋 Configuration loaded successfully");

    let state = Arc::new(AppState::new());

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    for (method, path, summary) in ENDPOINTS {
        info!("   {:<4} {:<36} - {}", method, path, summary);
    }
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");

    Ok(())
}

/// Initialize the tracing subscriber for structured logging
fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ruleflow_api=debug,tower_http=debug"));

    let (json, compact) = match format {
        LogFormat::Json => (Some(fmt::layer().json().with_current_span(true)), None),
        LogFormat::Compact => (
            None,
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .compact(),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json)
        .with(compact)
        .init();
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
