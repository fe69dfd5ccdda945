//! User configuration.
//!
//! Settings come from three layers, highest priority first: command-line flags,
//! `CRITIC_*` environment variables (both handled by clap in `main.rs`), and
//! `$XDG_CONFIG_HOME/critic/config.toml`. Every key in the file is optional.
//!
//! ```toml
//! server_url = "http://localhost:5000"
//! api_key = "secret"
//! timeout_secs = 30
//! theme = "catppuccin-mocha"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use critic_core::client::{DEFAULT_SERVER_URL, DEFAULT_TIMEOUT};
use critic_core::ClientOptions;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Raw contents of `config.toml`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub server_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub theme: Option<String>,
}

/// Values that override the file, already merged from flags and environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub server_url: Option<String>,
    pub api_key: Option<String>,
    pub theme: Option<String>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub theme: String,
}

impl Config {
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Self {
        Self {
            server_url: overrides
                .server_url
                .or(file.server_url)
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_owned()),
            api_key: overrides.api_key.or(file.api_key).filter(|k| !k.is_empty()),
            timeout: file
                .timeout_secs
                .map_or(DEFAULT_TIMEOUT, Duration::from_secs),
            theme: overrides
                .theme
                .or(file.theme)
                .unwrap_or_else(|| "dark".to_owned()),
        }
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.server_url.clone(),
            api_key: self.api_key.clone(),
            timeout: self.timeout,
        }
    }
}

/// `$XDG_CONFIG_HOME/critic/config.toml`, falling back to `~/.config/critic/config.toml`.
pub fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config").join("critic").join("config.toml")
}

/// Resolves an XDG base directory, falling back to `$HOME/<fallback>`.
pub fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(fallback)))
        .unwrap_or_else(|| PathBuf::from(fallback))
}

/// Reads `path`. A missing file is not an error and yields the defaults.
pub fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(FileConfig::default()),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_owned(),
                source,
            })
        }
    };
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })
}
