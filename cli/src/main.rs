use clap::Parser;
use lowband_core::DatabaseConfig;
use std::process::ExitCode;
use tracing::{error, info};

mod app;
mod cli;
mod logging;
mod output;

use crate::cli::Args;
use crate::output::print_error;

/// Loads the environment, resolves configuration and asks the gateway once
#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before clap so env-backed flags see it
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = match app::resolve_config(&args) {
        Ok(config) => config,
        Err(e) => {
            print_error("Configuration error", &format!("{:#}", e));
            return ExitCode::FAILURE;
        }
    };

    logging::init(config.log_level.as_deref());
    info!("Starting lowband client against {}", config.base_url);

    if args.require_db {
        // The core does not use the database yet; only the settings are checked.
        match DatabaseConfig::from_env() {
            Ok(db) => info!(database = %db, "Database configuration resolved"),
            Err(e) => {
                print_error("Invalid database configuration", &e);
                return ExitCode::FAILURE;
            }
        }
    }

    if let Err(e) = app::run_single_query(&config, &args.prompt, &args.model).await {
        error!("{:#}", e);
        print_error("Error querying AI", &format!("{:#}", e));
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
