use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::collaborator::Collaborator;

pub const DEFAULT_VIDEO_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 3;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopping_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Reach every service through one path-prefix proxy
    /// (`<proxy_base>/api/intent`, ...) instead of its own URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_poll_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the config file (defaults if it doesn't exist), then apply env overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::get_config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("COOKBOT_INTENT_URL") {
            self.intent_url = Some(url);
        }
        if let Some(url) = var("COOKBOT_SHOPPING_URL") {
            self.shopping_url = Some(url);
        }
        if let Some(url) = var("COOKBOT_VIDEO_URL") {
            self.video_url = Some(url);
        }
        if let Some(base) = var("COOKBOT_PROXY_BASE") {
            self.proxy_base = Some(base);
        }
        if let Some(raw) = var("COOKBOT_VIDEO_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.video_timeout_secs = Some(secs),
                Err(_) => tracing::warn!("Ignoring invalid COOKBOT_VIDEO_TIMEOUT_SECS: {}", raw),
            }
        }
    }

    pub fn base_url(&self, collaborator: Collaborator) -> String {
        if let Some(base) = &self.proxy_base {
            return format!("{}{}", base.trim_end_matches('/'), collaborator.proxy_prefix());
        }

        let configured = match collaborator {
            Collaborator::Intent => self.intent_url.as_deref(),
            Collaborator::Shopping => self.shopping_url.as_deref(),
            Collaborator::Video => self.video_url.as_deref(),
        };
        configured
            .unwrap_or(collaborator.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn video_timeout(&self) -> Duration {
        let secs = self
            .video_timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_VIDEO_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Health checks are always bounded, even when other requests are not.
    pub fn health_timeout(&self) -> Duration {
        self.request_timeout()
            .unwrap_or(Duration::from_secs(DEFAULT_HEALTH_TIMEOUT_SECS))
    }

    pub fn health_poll_interval(&self) -> Option<Duration> {
        self.health_poll_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("cookbot.log")),
        }
    }

    fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("cookbot"))
    }

    fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }
}
