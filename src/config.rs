use crate::constants::{DEFAULT_CHUNK_SIZE, PROGRESS_EVERY, RESPONSE_TIMEOUT};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub working_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub storage_root: String,
    pub extensions: Vec<String>,
    pub chunk_size: usize,
    pub response_timeout_secs: u64,
    pub progress_every: u32,
}

/// Files ending in `from` are sent with the `to` extension instead.
#[derive(Debug, Clone, Deserialize)]
pub struct RemapConfig {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub ftp: FtpConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    pub remap: Option<RemapConfig>,
}

impl Default for FtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 21,
            user: String::from("anonymous"),
            pass: String::new(),
            working_dir: String::from("/"),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            storage_root: String::from("/sdcard"),
            extensions: vec![String::from("mjpeg")],
            chunk_size: DEFAULT_CHUNK_SIZE,
            response_timeout_secs: RESPONSE_TIMEOUT.as_secs(),
            progress_every: PROGRESS_EVERY,
        }
    }
}

impl UploadConfig {
    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(config_str)?;

        // A zero chunk would never make progress
        if config.upload.chunk_size == 0 {
            config.upload.chunk_size = DEFAULT_CHUNK_SIZE;
        }
        Ok(config)
    }
}
