//! CLI module for Leopard Crossing
//!
//! `leopard --mode cli` (default) runs the crew once and prints the result;
//! `leopard --mode api` starts the HTTP server.

use crate::server::AppConfig;
use clap::{Parser, ValueEnum};

pub mod crew;
pub mod format;

/// Leopard Crossing CLI
#[derive(Parser, Debug)]
#[command(name = "leopard")]
#[command(about = "How many seconds does a leopard need to cross the Pont des Arts?")]
#[command(version)]
pub struct Cli {
    /// Run mode
    #[arg(long, value_enum, default_value_t = Mode::Cli)]
    pub mode: Mode,

    /// How the CLI prints the result
    #[arg(long, value_enum, default_value_t = OutputStyle::Json)]
    pub format: OutputStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Run the crew once and print the result
    Cli,
    /// Start the HTTP server
    Api,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputStyle {
    /// Pretty-printed JSON
    Json,
    /// Key/value grid
    Table,
}

/// Run the selected mode
pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.mode {
        Mode::Api => crate::server::run(config).await,
        Mode::Cli => crew::run(config, cli.format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["leopard"]).unwrap();
        assert_eq!(cli.mode, Mode::Cli);
        assert_eq!(cli.format, OutputStyle::Json);
    }

    #[test]
    fn test_mode_api() {
        let cli = Cli::try_parse_from(["leopard", "--mode", "api"]).unwrap();
        assert_eq!(cli.mode, Mode::Api);
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["leopard", "--mode", "gui"]).is_err());
    }
}
