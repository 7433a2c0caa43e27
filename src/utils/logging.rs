//! Diagnostic logging.
//!
//! The terminal belongs to the chat screen, so `tracing` output only goes to a
//! file, and only when one is requested with `--log-file`. Verbosity follows
//! `RUST_LOG` and defaults to `info`.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install a global subscriber that appends to `path`. Does nothing without a path.
pub fn init_file_logging(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = open_log_file(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| format!("Failed to initialize logging: {err}"))?;

    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}

fn open_log_file(path: &Path) -> Result<File, Box<dyn std::error::Error>> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| format!("Cannot write to log file {}: {err}", path.display()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn no_path_installs_nothing() {
        assert!(init_file_logging(None).is_ok());
    }

    #[test]
    fn log_file_is_created_with_parent_dirs() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("logs").join("navigator.log");
        open_log_file(&path).expect("open log file");
        assert!(path.exists());
    }

    #[test]
    fn unwritable_path_reports_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        // A directory cannot be opened for appending.
        let err = open_log_file(temp_dir.path()).expect_err("should fail");
        assert!(err.to_string().starts_with("Cannot write to log file"));
    }
}
