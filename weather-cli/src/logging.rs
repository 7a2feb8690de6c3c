use anyhow::{Context, Result, anyhow};
use std::{
    fs::{self, OpenOptions},
    io,
    path::Path,
    sync::Mutex,
};
use tracing_subscriber::EnvFilter;

/// Logs to `path`; the interactive app owns the terminal, so nothing may go to stderr.
pub fn init_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter("info"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("Failed to initialize logging: {err}"))
}

pub fn init_stderr() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter("warn"))
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow!("Failed to initialize logging: {err}"))
}

/// `RUST_LOG` wins over the default directive.
fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default))
}
