use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use lowband_core::config::{get_default_config_file, ConfigOverrides, GatewayConfig};
use std::time::Duration;
use tracing::{debug, info};

use crate::cli::Args;
use crate::output::print_answer;

/// Builds the effective configuration: file, then `LOWBAND_*` env, then flags
pub fn resolve_config(args: &Args) -> Result<GatewayConfig> {
    let path = match &args.config {
        Some(path) => Some(path.clone()),
        None => get_default_config_file("lowband").ok(),
    };

    let config = match &path {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            GatewayConfig::load_from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => GatewayConfig::default(),
    };
    let overrides = ConfigOverrides {
        base_url: args.base_url.clone(),
        timeout_secs: args.timeout_secs,
        log_level: args.log_level.clone(),
    };
    let config = config.apply_env()?.merge(&overrides);

    Ok(config.validate()?)
}

/// Sends one prompt through the strategy chain and prints the answer
pub async fn run_single_query(config: &GatewayConfig, prompt: &str, model: &str) -> Result<()> {
    info!(base_url = %config.base_url, model, "Running single query");

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner} {msg}")
            .context("Invalid spinner template")?,
    );
    spinner.set_message("Querying gateway...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = lowband_mcp::ai_function_with_config(config, prompt, model).await;
    spinner.finish_and_clear();

    let answer = result?;
    info!(chars = answer.len(), "AI response received");
    print_answer(&answer);
    Ok(())
}
