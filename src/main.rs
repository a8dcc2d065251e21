//! Leopard Crossing - how fast can a leopard cross the Pont des Arts?
//!
//! CLI entry point: runs the crew once or serves it over HTTP.

#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod cli;
mod server;

const DEFAULT_LOG_FILTER: &str = "leopard=info,leopard_core=info,leopard_llm=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    tracing_subscriber::registry()
        .with(env_filter(log_level.as_deref()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(level) = log_level.as_deref().filter(|l| level_directive(l).is_none()) {
        warn!(value = %level, "Ignoring unknown LOG_LEVEL");
    }

    let cli = cli::Cli::parse();
    let config = server::load_config().context("Failed to load configuration")?;

    info!("Starting Leopard Crossing v{}", env!("CARGO_PKG_VERSION"));

    cli::run(cli, config).await
}

/// `RUST_LOG` wins, then `LOG_LEVEL`, then the built-in default
fn env_filter(log_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(log_level))
}

fn level_filter(log_level: Option<&str>) -> EnvFilter {
    match log_level.and_then(level_directive) {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::new(DEFAULT_LOG_FILTER),
    }
}

/// Map a level name, including the Python-style `WARNING` and `CRITICAL`,
/// to a tracing directive
fn level_directive(level: &str) -> Option<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" | "critical" | "fatal" => Some("error"),
        "off" => Some("off"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_directive_accepts_python_names() {
        assert_eq!(level_directive("WARNING"), Some("warn"));
        assert_eq!(level_directive("CRITICAL"), Some("error"));
        assert_eq!(level_directive(" Debug "), Some("debug"));
        assert_eq!(level_directive("verbose"), None);
    }

    #[test]
    fn test_level_filter_warning_is_a_level() {
        assert_eq!(level_filter(Some("WARNING")).to_string(), "warn");
        assert_eq!(level_filter(Some("info")).to_string(), "info");
    }

    #[test]
    fn test_level_filter_unknown_uses_default() {
        let filter = level_filter(Some("loud")).to_string();
        assert!(filter.contains("leopard=info"), "{filter}");
        assert!(!filter.contains("loud"), "{filter}");
    }
}
