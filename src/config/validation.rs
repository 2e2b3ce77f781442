use anyhow::Result;
use clap::Parser;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use garde::Validate;

use super::{AppConfig, Environment};
use crate::error::AppError;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "formdesk-api", about = "Forms and subscriptions API")]
pub struct Cli {
    /// Path to an extra configuration file
    #[arg(long, env = "APP_CONFIG")]
    pub config: Option<std::path::PathBuf>,

    /// Server port
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Environment name (development, staging, production)
    #[arg(long, env = "ENVIRONMENT")]
    pub environment: Option<String>,

    /// Log format (json or pretty)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Load configuration from the process arguments and environment.
pub fn load_config() -> Result<AppConfig> {
    load_config_from(Cli::parse())
}

/// Layered load, lowest priority first:
/// 1. embedded defaults (`pretty` logs for development)
/// 2. `config/default.toml`
/// 3. `config/{environment}.toml`
/// 4. the file named by `--config`
/// 5. `APP_` environment variables (`APP_SERVER__PORT=3000`)
/// 6. CLI flags
pub fn load_config_from(cli: Cli) -> Result<AppConfig> {
    let env_name = cli
        .environment
        .clone()
        .unwrap_or_else(|| Environment::default().as_str().to_string());

    let environment = env_name.parse::<Environment>().ok();

    let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

    // Human-readable logs in development unless a later layer picks a format
    if environment == Some(Environment::Development) {
        figment = figment.merge(Serialized::default("logging.format", "pretty"));
    }

    figment = figment
        .merge(Toml::file("config/default.toml"))
        .merge(Toml::file(format!("config/{}.toml", env_name)));

    if let Some(path) = &cli.config {
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed("APP_").split("__"));

    if let Some(environment) = environment {
        figment = figment.merge(Serialized::default("environment", environment));
    }
    if let Some(port) = cli.port {
        figment = figment.merge(Serialized::default("server.port", port));
    }
    if let Some(format) = &cli.log_format {
        figment = figment.merge(Serialized::default("logging.format", format));
    }
    if cli.debug {
        figment = figment.merge(Serialized::default("logging.level", "debug"));
    }

    let config: AppConfig = figment
        .extract()
        .map_err(|e| AppError::Config(e.to_string()))?;

    config
        .validate()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(config)
}
