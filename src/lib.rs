pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod middleware;
pub mod sanitize;
pub mod server;

pub use config::*;
pub use error::*;
pub use sanitize::{FieldValue, Sanitizer};
pub use server::*;

use anyhow::Result;
use std::panic;
use std::sync::Arc;

/// Main server entry point for library usage
pub async fn run_server() -> Result<()> {
    let app_config = config::load_config()?;
    run_server_with(app_config).await
}

/// Composition root: the sanitizer is built once here and shared by the
/// log subscriber and the request middleware.
pub async fn run_server_with(app_config: AppConfig) -> Result<()> {
    let sanitizer = Arc::new(Sanitizer::new());

    match logging::init_logging(&app_config.logging, Arc::clone(&sanitizer)) {
        Ok(()) => {}
        // Embedding callers and tests may already own the global subscriber
        Err(LoggingError::AlreadyInitialized) => {
            ::tracing::debug!("Global subscriber already installed, keeping it");
        }
        Err(e) => return Err(AppError::from(e).into()),
    }

    // Set up panic handler (so it can use logging)
    panic::set_hook(Box::new(|panic_info| {
        ::tracing::error!(panic = %panic_info, "FATAL: Panic occurred");
    }));

    ::tracing::info!(
        environment = app_config.environment.as_str(),
        port = app_config.server.port,
        "formdesk API starting up"
    );

    server::start_server(app_config, sanitizer).await
}
