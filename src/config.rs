//! Configuration for the transitdesk client.
//!
//! Resolution order, highest first:
//! 1. Environment variables (`TRANSITDESK_API_URL`, `TRANSITDESK_DATA_DIR`)
//! 2. `config.toml` in the platform config directory
//! 3. Built-in defaults

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default API base when nothing is configured (local dev server).
const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the complaint service API.
    pub api_url: String,
    /// Directory holding the session database.
    pub data_dir: PathBuf,
}

/// On-disk shape; every field optional so a partial file is fine.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    api_url: Option<String>,
    data_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the environment and config file.
    pub fn load() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "transitdesk")
            .context("Could not determine a home directory for this platform")?;

        let file = Self::read_config_file(&dirs.config_dir().join("config.toml"))?;

        let api_url = std::env::var("TRANSITDESK_API_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let data_dir = std::env::var("TRANSITDESK_DATA_DIR")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or(file.data_dir)
            .unwrap_or_else(|| dirs.data_dir().to_path_buf());

        Ok(Self { api_url, data_dir })
    }

    fn read_config_file(path: &std::path::Path) -> Result<ConfigFile> {
        if !path.exists() {
            return Ok(ConfigFile::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Path of the session database inside the data directory.
    pub fn session_db_path(&self) -> PathBuf {
        self.data_dir.join("session.db")
    }
}

// ── Tests ───────────────────────────────────────────────────────────
