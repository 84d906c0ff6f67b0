use chrono::Offset;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::cli::Args;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("request interval {0}ms is not one of the selectable intervals")]
    InvalidInterval(u64),

    #[error("jpeg quality must be between 1 and 100, got {0}")]
    InvalidJpegQuality(u8),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub frame_rate: Duration,
    pub camera_index: i32,
    pub camera_resolution: (u32, u32),
    pub base_url: String,
    pub instruction: String,
    pub request_interval: Duration,
    pub request_interval_choices: Vec<Duration>,
    pub max_tokens: u32,
    pub jpeg_quality: u8,
    pub request_timeout: Duration,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_rate: Duration::from_millis(30),
            camera_index: 0,
            camera_resolution: (1280, 720),
            base_url: "http://localhost:8080".to_string(),
            instruction: "What do you see?".to_string(),
            request_interval: Duration::from_millis(500),
            request_interval_choices: [100, 250, 500, 1000, 2000]
                .into_iter()
                .map(Duration::from_millis)
                .collect(),
            max_tokens: 100,
            jpeg_quality: 80,
            request_timeout: Duration::from_secs(60),
            logger_timezone: local_timezone(),
        }
    }
}

/// Overlay read from a TOML file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub frame_rate_ms: Option<u64>,
    pub camera_index: Option<i32>,
    pub camera_width: Option<u32>,
    pub camera_height: Option<u32>,
    pub base_url: Option<String>,
    pub instruction: Option<String>,
    pub request_interval_ms: Option<u64>,
    pub max_tokens: Option<u32>,
    pub jpeg_quality: Option<u8>,
    pub request_timeout_secs: Option<u64>,
    pub utc_offset_hours: Option<i32>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Config::default();
        config.apply_file(file);
        config.validate()?;
        Ok(config)
    }

    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(base_url) = &args.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(instruction) = &args.instruction {
            config.instruction = instruction.clone();
        }
        if let Some(interval_ms) = args.interval_ms {
            config.request_interval = Duration::from_millis(interval_ms);
        }
        if let Some(camera_index) = args.camera_index {
            config.camera_index = camera_index;
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(ms) = file.frame_rate_ms {
            self.frame_rate = Duration::from_millis(ms);
        }
        if let Some(index) = file.camera_index {
            self.camera_index = index;
        }
        if let Some(width) = file.camera_width {
            self.camera_resolution.0 = width;
        }
        if let Some(height) = file.camera_height {
            self.camera_resolution.1 = height;
        }
        if let Some(base_url) = file.base_url {
            self.base_url = base_url;
        }
        if let Some(instruction) = file.instruction {
            self.instruction = instruction;
        }
        if let Some(ms) = file.request_interval_ms {
            self.request_interval = Duration::from_millis(ms);
        }
        if let Some(max_tokens) = file.max_tokens {
            self.max_tokens = max_tokens;
        }
        if let Some(quality) = file.jpeg_quality {
            self.jpeg_quality = quality;
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(offset) = file
            .utc_offset_hours
            .and_then(|hours| chrono::FixedOffset::east_opt(hours * 3600))
        {
            self.logger_timezone = offset;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.request_interval_choices.contains(&self.request_interval) {
            return Err(ConfigError::InvalidInterval(
                self.request_interval.as_millis() as u64,
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::InvalidJpegQuality(self.jpeg_quality));
        }
        Ok(())
    }
}

fn local_timezone() -> chrono::FixedOffset {
    chrono::Local::now().offset().fix()
}
