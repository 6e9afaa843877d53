//! Typed configuration from environment variables.
//!
//! Loads once at startup. Nothing is required; every value has a default.
//! The binary layers CLI flags on top.

use crate::error::{Error, Result};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Output file used when neither `FACTQ_OUTPUT` nor `--output` is given.
pub const DEFAULT_OUTPUT: &str = "out.txt";

#[derive(Debug, Clone)]
pub struct Config {
    pub output_path: PathBuf,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        let output_path = match std::env::var("FACTQ_OUTPUT") {
            Ok(path) if path.trim().is_empty() => {
                return Err(Error::Config("FACTQ_OUTPUT is set but empty".to_string()));
            }
            Ok(path) => PathBuf::from(path),
            Err(_) => PathBuf::from(DEFAULT_OUTPUT),
        };

        Ok(Self {
            output_path,
            otel_endpoint: std::env::var("OTEL_ENDPOINT").ok(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Replace the output path if one was given explicitly.
    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        if let Some(path) = output {
            self.output_path = path;
        }
        self
    }
}

/// Validate a worker count given on the command line.
pub fn parse_worker_count(raw: i64) -> Result<NonZeroUsize> {
    usize::try_from(raw)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| Error::Config(format!("worker count must be greater than zero, got {raw}")))
}
