//! Tracing subscriber setup for the binary

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "voice_gate=info";

/// Install the global subscriber
///
/// With a path, log lines are appended to that file without ANSI colours.
/// If the file cannot be opened logging falls back to stderr; a broken log
/// sink never stops the interpreter. Calling this twice is a no-op.
pub fn init_logging(log_file: Option<&Path>) {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let file = log_file.map(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| (path.to_path_buf(), e))
    });

    match file {
        Some(Ok(file)) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .ok();
        }
        Some(Err((path, err))) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .try_init()
                .ok();
            tracing::warn!(path = %path.display(), error = %err, "cannot open log file, logging to stderr");
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .try_init()
                .ok();
        }
    }
}
