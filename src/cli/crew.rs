//! One-shot crew run for the terminal

use super::format::{frame, render_table};
use super::OutputStyle;
use crate::server::{AppConfig, AppState};
use anyhow::Context;
use serde_json::Value;
use tracing::{error, info};

/// Run the crew once and print the framed result
pub async fn run(config: AppConfig, style: OutputStyle) -> anyhow::Result<()> {
    info!("🐆 Starting Leopard Pont des Arts Crew...");

    let state = AppState::build(config)?;
    info!(
        provider = %state.provider.provider,
        model = %state.provider.model,
        "LLM configuration"
    );

    match state.run_crossing().await {
        Ok(result) => {
            println!("{}", frame("🏁 FINAL CREW RESULT", &render(&result, style)?));
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Crew execution failed");
            println!(
                "{}",
                frame("❌ CREW FAILED", &format!("Failed to execute crew: {}", e))
            );
            std::process::exit(1);
        }
    }
}

fn render(result: &Value, style: OutputStyle) -> anyhow::Result<String> {
    match style {
        OutputStyle::Json => {
            serde_json::to_string_pretty(result).context("Failed to serialize result")
        }
        OutputStyle::Table => Ok(render_table(result)),
    }
}
