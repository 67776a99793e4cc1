use clap::Parser;
use std::path::PathBuf;

/// Ask an AI gateway a question, whatever API it happens to speak
#[derive(Parser, Debug)]
#[command(name = "lowband", author, version, about, long_about = None)]
pub struct Args {
    /// The prompt to send to the gateway
    #[arg(index = 1, default_value = "What is the current weather in New York?")]
    pub prompt: String,

    /// Model name passed through to the gateway
    #[arg(short, long, default_value = "mistral")]
    pub model: String,

    /// Gateway base URL (overrides config file and LOWBAND_BASE_URL)
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(short, long)]
    pub timeout_secs: Option<u64>,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOWBAND_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Check the PG_* database settings before querying
    #[arg(long, default_value_t = false)]
    pub require_db: bool,
}
