use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` (falling back to `info`).
/// Logs go to stderr so the answer on stdout stays clean.
pub fn init(level: Option<&str>) {
    let level = level.unwrap_or("info");
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}
