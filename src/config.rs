use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server listens on
    pub bind: String,
    /// Preferred caption and recognition language
    pub lang: String,
    /// Path to a whisper ggml model file; downloaded into the cache dir when unset
    pub model_path: Option<PathBuf>,
    /// Per-request timeout for caption fetches, in seconds
    pub fetch_timeout_secs: u64,
    /// Overall budget for the yt-dlp audio download, in seconds
    pub download_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            lang: "en".to_string(),
            model_path: None,
            fetch_timeout_secs: 30,
            download_timeout_secs: 600,
        }
    }
}

impl Config {
    /// Load config from ~/.config/askvid/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("askvid")
        .join("config.toml")
}
