//! Endpoint resolution and the optional `~/.site-chat/config.yaml` file.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Endpoint used when nothing overrides it.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8787/ask";

/// Process-wide override: an environment variable natively, a page global in
/// the browser.
pub const ENDPOINT_OVERRIDE: &str = "SITE_CHAT_API";

/// API section (endpoint).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ApiSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Widget section (page context sent with each question).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WidgetSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_context: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub widget: WidgetSection,
}

/// Pick the endpoint: the override if present and non-blank, else `fallback`,
/// else [`DEFAULT_ENDPOINT`].
pub fn resolve_endpoint(override_value: Option<&str>, fallback: Option<&str>) -> String {
    override_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or(fallback)
        .unwrap_or(DEFAULT_ENDPOINT)
        .to_string()
}

/// Returns the default config file path: `~/.site-chat/config.yaml` (platform-specific).
pub fn default_config_path() -> Option<PathBuf> {
    let home = home_dir()?;
    Some(home.join(".site-chat").join("config.yaml"))
}

#[cfg(unix)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(windows)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE").map(PathBuf::from)
}

#[cfg(not(any(unix, windows)))]
fn home_dir() -> Option<PathBuf> {
    None
}

/// Load config from a YAML file.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

/// Save config to a YAML file. Creates parent directory if missing.
pub fn save(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let contents = serde_yaml::to_string(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Config load/save error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
