use std::sync::Arc;

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use super::{SanitizedFields, SanitizedJson};
use crate::config::LoggingConfig;
use crate::error::LoggingError;
use crate::sanitize::Sanitizer;

/// Build a subscriber that writes sanitized records to `writer`.
///
/// Supports two formats:
/// - "json": one JSON object per line, for production
/// - "pretty": human-readable single-line records, for development
///
/// Both route every event and span field through `sanitizer`.
pub fn build_subscriber<W>(
    config: &LoggingConfig,
    sanitizer: Arc<Sanitizer>,
    writer: W,
) -> Result<Box<dyn Subscriber + Send + Sync>, LoggingError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::try_new(&config.level)
        .map_err(|e| LoggingError::InvalidFilter(format!("{}: {}", config.level, e)))?;
    let fields = SanitizedFields::new(Arc::clone(&sanitizer));

    match config.format.as_str() {
        "json" => Ok(Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(writer)
                .with_ansi(false)
                .fmt_fields(fields)
                .event_format(SanitizedJson::new(sanitizer))
                .finish(),
        )),
        "pretty" => Ok(Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(writer)
                .with_ansi(config.ansi)
                .with_target(true)
                .with_thread_names(true)
                .fmt_fields(fields)
                .finish(),
        )),
        other => Err(LoggingError::UnsupportedFormat(other.to_string())),
    }
}

/// Install the sanitizing subscriber as the global default, writing to
/// stdout. `RUST_LOG` overrides the configured level when set.
pub fn init_logging(config: &LoggingConfig, sanitizer: Arc<Sanitizer>) -> Result<(), LoggingError> {
    let effective = match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.trim().is_empty() => LoggingConfig {
            level: directives,
            ..config.clone()
        },
        _ => config.clone(),
    };

    let subscriber = build_subscriber(&effective, sanitizer, std::io::stdout)?;
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    tracing::info!(
        level = effective.level.as_str(),
        format = effective.format.as_str(),
        "Structured logging initialized"
    );
    Ok(())
}
