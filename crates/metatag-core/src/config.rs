//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 3004;
pub const DEFAULT_FRONT_PAGE: &str = "/";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Paths to the metatag data directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// SQLite database directory (`data/db/`).
    pub db: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            db: root.join("db"),
            root,
        };
        std::fs::create_dir_all(&paths.db)?;
        Ok(paths)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetatagConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Site base address without a trailing slash, e.g. `https://example.com`.
    pub base_url: String,
    /// Path of the site home page; requests for it also match `<front>` rules.
    pub front_page: String,
    /// Language assumed when a request does not name one.
    pub default_language: String,
}

impl MetatagConfig {
    /// Create configuration with defaults for everything but the data dir and base URL.
    pub fn new(data_dir: impl AsRef<Path>, base_url: &str) -> std::io::Result<Self> {
        Ok(Self {
            port: DEFAULT_PORT,
            data_paths: DataPaths::new(data_dir)?,
            base_url: normalize_base_url(base_url),
            front_page: DEFAULT_FRONT_PAGE.to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
        })
    }

    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let base_url = std::env::var("SITE_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port));

        let mut config = Self::new(data_dir, &base_url)?;
        config.port = port;
        if let Ok(front) = std::env::var("SITE_FRONT_PAGE") {
            if !front.trim().is_empty() {
                config.front_page = front.trim().to_string();
            }
        }
        if let Ok(lang) = std::env::var("SITE_DEFAULT_LANGUAGE") {
            if !lang.trim().is_empty() {
                config.default_language = lang.trim().to_string();
            }
        }
        Ok(config)
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}
