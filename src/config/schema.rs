//! Configuration schema for repolens
//!
//! Configuration is stored at `~/.config/repolens/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// GitHub endpoints and credentials
    pub github: GithubConfig,

    /// Network timeouts
    pub network: NetworkConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,

    /// Override for the data directory holding cached repositories
    pub data_dir: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            data_dir: None,
        }
    }
}

/// GitHub configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Personal access token (raises rate limits, enables private repos)
    pub token: Option<String>,

    /// REST API base URL
    pub api_url: String,

    /// Snapshot download base URL
    pub archive_url: String,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: "https://api.github.com".to_string(),
            archive_url: "https://codeload.github.com".to_string(),
            user_agent: format!("repolens/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Network timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// TCP/TLS connect timeout
    pub connect_timeout_secs: u64,

    /// Whole-request timeout for API calls
    pub request_timeout_secs: u64,

    /// Maximum silence between two download chunks
    pub stall_timeout_secs: u64,

    /// Upper bound for a whole snapshot download
    pub download_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            stall_timeout_secs: 60,
            download_timeout_secs: 900,
        }
    }
}

impl NetworkConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn stall_timeout(&self) -> Duration {
        Duration::from_secs(self.stall_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}
