//! Server configuration
//!
//! Layered as defaults, then an optional YAML file, then `PLANNER_`-prefixed
//! environment variables (`__` separates nested keys, e.g.
//! `PLANNER_PLANNER__SEED_SAMPLE_DATA=false`).

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Legacy override for the SQLite database file location
pub const DB_PATH_ENV: &str = "SERVICEPLANNER_DB_PATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Socket address the HTTP server listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default)]
    pub planner: service_planner::Config,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database_url: default_database_url(),
            log_format: LogFormat::default(),
            planner: service_planner::Config::default(),
        }
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:8087".to_string()
}

fn default_database_url() -> String {
    sqlite_url("./data/serviceplanner.db")
}

fn sqlite_url(path: &str) -> String {
    format!("sqlite://{path}?mode=rwc")
}

impl AppConfig {
    /// Load configuration from defaults, an optional YAML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed("PLANNER_").split("__"));

        let mut config: AppConfig = figment
            .extract()
            .context("Failed to load server configuration")?;

        if let Ok(db_path) = std::env::var(DB_PATH_ENV) {
            if !db_path.trim().is_empty() {
                config.database_url = sqlite_url(db_path.trim());
            }
        }
        Ok(config)
    }
}

/// Directory holding the SQLite file named by `database_url`, if any
pub fn sqlite_data_dir(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let file = rest.split('?').next().unwrap_or_default();
    if file.is_empty() || file.starts_with(":memory:") {
        return None;
    }
    Path::new(file)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

/// Create the SQLite data directory if it does not exist yet
pub fn ensure_data_dir(database_url: &str) -> Result<()> {
    if let Some(dir) = sqlite_data_dir(database_url) {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
    }
    Ok(())
}
