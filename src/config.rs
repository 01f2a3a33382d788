//! Configuration management for ytmb.
//!
//! Configuration comes from environment variables, optionally seeded from a
//! `.env` file in the local data directory. Everything the library needs at
//! runtime is collected once into a [`Settings`] value that `main` builds and
//! passes by reference to every entry point, so nothing reads process-wide
//! state after startup.
//!
//! The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf, time::Duration};

use thiserror::Error;

pub const DATA_DIR_ENV: &str = "YTMB_DATA_DIR";
pub const FETCH_TIMEOUT_ENV: &str = "YTMB_FETCH_TIMEOUT_SECS";
pub const DEBUG_ENV: &str = "YTMB_DEBUG";

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a whole number of seconds, got '{value}'")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the data directory if needed. A missing `.env` file is fine: every
/// setting has a default.
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/ytmb/.env`
/// - macOS: `~/Library/Application Support/ytmb/.env`
/// - Windows: `%LOCALAPPDATA%/ytmb/.env`
pub async fn load_env() -> Result<(), String> {
    let mut path = default_data_dir();
    path.push(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Runtime settings threaded through the engine and the programs.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root of users, routines and logs.
    pub data_dir: PathBuf,
    /// Upper bound for every single music service call.
    pub fetch_timeout: Duration,
    /// Verbose console logging and full ledger output.
    pub debug: bool,
}

impl Settings {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            debug: false,
        }
    }

    /// Builds settings from `YTMB_DATA_DIR`, `YTMB_FETCH_TIMEOUT_SECS` and
    /// `YTMB_DEBUG`, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        let fetch_timeout = match env::var(FETCH_TIMEOUT_ENV) {
            Ok(value) => {
                let secs = value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidTimeout {
                        var: FETCH_TIMEOUT_ENV,
                        value: value.clone(),
                    })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        };

        let debug = env::var(DEBUG_ENV)
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            data_dir,
            fetch_timeout,
            debug,
        })
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = self.debug || debug;
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn users_dir(&self) -> PathBuf {
        self.data_dir.join("users")
    }

    pub fn routines_path(&self) -> PathBuf {
        self.data_dir.join("routines.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("debug.log")
    }
}

/// Platform data directory for ytmb, e.g. `~/.local/share/ytmb`.
pub fn default_data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("ytmb");
    path
}
