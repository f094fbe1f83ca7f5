//! # Configuration
//!
//! Settings come from environment variables:
//! - `BIND_ADDRESS`, `PORT`: where the web server listens (`0.0.0.0:8080`).
//! - `LEADERBOARD_DATA_URL`: endpoint serving the `{columns, data}` document.
//! - `LEADERBOARD_REFERENCE`: (Optional) JSON file replacing the builtin best energies.
//! - `LEADERBOARD_REFRESH_SECS`: background refresh period, `0` to disable (60).
//! - `STATIC_DIR`: directory served under `/static` (`/www`).

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    pub data_url: Option<String>,
    pub reference_path: Option<PathBuf>,
    pub refresh_interval: Option<Duration>,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Builds the configuration from `lookup`, which returns the value of a variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset.
        let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());

        let port: u16 = match get("PORT") {
            Some(p) => p
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got {:?}", p))?,
            None => 8080,
        };
        let refresh_secs: u64 = match get("LEADERBOARD_REFRESH_SECS") {
            Some(s) => s.trim().parse().with_context(|| {
                format!("LEADERBOARD_REFRESH_SECS must be a number of seconds, got {:?}", s)
            })?,
            None => 60,
        };
        Ok(Config {
            bind_address: get("BIND_ADDRESS").unwrap_or_else(|| String::from("0.0.0.0")),
            port,
            data_url: get("LEADERBOARD_DATA_URL"),
            reference_path: get("LEADERBOARD_REFERENCE").map(PathBuf::from),
            refresh_interval: (refresh_secs > 0).then(|| Duration::from_secs(refresh_secs)),
            static_dir: get("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/www")),
        })
    }

    pub fn bind(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// The data URL, which the server cannot run without.
    pub fn require_data_url(&self) -> Result<&str> {
        self.data_url
            .as_deref()
            .context("LEADERBOARD_DATA_URL not set")
    }
}
