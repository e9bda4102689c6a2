//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag, must exist)
//! 2. `~/.whatflower/config.toml` (user)
//! 3. `/etc/whatflower/config.toml` (system)
//!
//! When none of these exist the built-in defaults are used: the English
//! Wikipedia endpoint and no local classifier.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::{Device, Normalization};
use crate::providers::wikipedia::DEFAULT_BASE_URL;
use crate::{Result, WhatFlowerError};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Local image classifier. Required for `identify`.
    #[serde(default)]
    pub classifier: Option<ClassifierConfig>,
    #[serde(default)]
    pub encyclopedia: EncyclopediaConfig,
}

/// Local ONNX image classifier configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Path to the ONNX model file.
    pub model_path: PathBuf,
    /// Path to the labels file, one label per line in logit order.
    pub labels_path: PathBuf,
    /// Square input edge in pixels (default: 224).
    #[serde(default = "default_input_size")]
    pub input_size: u32,
    /// Name of the model's image input tensor (default: "input").
    #[serde(default = "default_input_name")]
    pub input_name: String,
    /// Per-channel normalization mean (default: ImageNet).
    #[serde(default = "default_mean")]
    pub mean: [f32; 3],
    /// Per-channel normalization standard deviation (default: ImageNet).
    #[serde(default = "default_std")]
    pub std: [f32; 3],
    /// Device to use: "cpu", "cuda" or "cuda:<id>" (default: "cpu").
    #[serde(default = "default_device")]
    pub device: String,
    /// Number of classifications to keep (default: 5).
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl ClassifierConfig {
    /// Config for a model and labels file with every other field defaulted.
    pub fn new(model_path: impl Into<PathBuf>, labels_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            labels_path: labels_path.into(),
            input_size: default_input_size(),
            input_name: default_input_name(),
            mean: default_mean(),
            std: default_std(),
            device: default_device(),
            top_k: default_top_k(),
        }
    }

    /// Parse the configured device string.
    pub fn device(&self) -> Result<Device> {
        self.device.parse()
    }

    pub fn normalization(&self) -> Normalization {
        Normalization {
            mean: self.mean,
            std: self.std,
        }
    }
}

fn default_input_size() -> u32 {
    224
}

fn default_input_name() -> String {
    "input".to_string()
}

fn default_mean() -> [f32; 3] {
    Normalization::default().mean
}

fn default_std() -> [f32; 3] {
    Normalization::default().std
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_top_k() -> usize {
    5
}

/// Encyclopedia (Wikipedia API) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EncyclopediaConfig {
    /// API endpoint (default: English Wikipedia).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Requested thumbnail edge in pixels (default: 500).
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,
    /// `User-Agent` header (default: `whatflower/<version>`).
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for EncyclopediaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            thumbnail_size: default_thumbnail_size(),
            user_agent: None,
        }
    }
}

impl EncyclopediaConfig {
    /// Configured user agent, falling back to the crate's own.
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(crate::version::default_user_agent)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_thumbnail_size() -> u32 {
    500
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided; a missing file is an error)
    /// 2. `~/.whatflower/config.toml`
    /// 3. `/etc/whatflower/config.toml`
    /// 4. Built-in defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            WhatFlowerError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            WhatFlowerError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path, if any.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(WhatFlowerError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".whatflower").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/whatflower/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}
