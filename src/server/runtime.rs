use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::health::handlers::{liveness_handler, readiness_handler};
use crate::health::HealthState;
use crate::middleware::log_requests;
use crate::sanitize::Sanitizer;

/// Start the Axum HTTP server with health endpoints and graceful shutdown
///
/// Binds to the configured address, marks the service ready once bound and
/// serves until SIGINT or SIGTERM.
pub async fn start_server(config: AppConfig, sanitizer: Arc<Sanitizer>) -> Result<()> {
    let health = HealthState::new();
    let app = create_router(health.clone(), sanitizer);

    let bind_addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await.map_err(|e| {
        AppError::Server(format!(
            "Failed to bind to {}: {}. Is another process using this port?",
            bind_addr, e
        ))
    })?;
    info!(bind = bind_addr.as_str(), "Server bound");

    health.mark_ready();

    let (stopping_tx, mut stopping_rx) = watch::channel(false);
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                let _ = stopping_tx.send(true);
            })
            .await
    });

    // In-flight requests get `shutdown_timeout` seconds to drain
    let drain_limit = Duration::from_secs(config.server.shutdown_timeout);
    tokio::select! {
        result = &mut server => {
            result
                .map_err(|e| AppError::Server(format!("server task failed: {}", e)))?
                .map_err(|e| AppError::Server(e.to_string()))?;
        }
        _ = async {
            if stopping_rx.changed().await.is_ok() {
                tokio::time::sleep(drain_limit).await;
            } else {
                std::future::pending::<()>().await;
            }
        } => {
            warn!(
                timeout_seconds = config.server.shutdown_timeout,
                "Graceful shutdown timed out, dropping open connections"
            );
            server.abort();
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Routing table: health probes behind the request-logging middleware
pub fn create_router(health: HealthState, sanitizer: Arc<Sanitizer>) -> Router {
    Router::new()
        .route("/health", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .with_state(health)
        .layer(middleware::from_fn_with_state(sanitizer, log_requests))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}

/// Wait for SIGINT (Ctrl+C) or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
