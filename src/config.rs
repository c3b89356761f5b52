use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, TattooError};
use crate::logger::{LogLevel, LoggerConfig};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub output_dir: Option<PathBuf>,
    pub max_upload_mb: Option<usize>,
    pub gemini: GeminiConfig,
    pub logger: LoggerConfig,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model: None,
            api_base: None,
            timeout_secs: None,
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let model = env::var("GEMINI_MODEL").ok();
        let api_base = env::var("GEMINI_API_BASE").ok();
        let timeout_secs = env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok());

        GeminiConfig {
            api_key,
            model,
            api_base,
            timeout_secs,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// The key is mandatory; the server refuses to start without it.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| TattooError::ConfigError("GEMINI_API_KEY is not set".into()))
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn api_base(&self) -> &str {
        self.api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(120))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: None,
            port: None,
            output_dir: None,
            max_upload_mb: None,
            gemini: GeminiConfig::default(),
            logger: LoggerConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let host = env::var("HOST").ok();
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());
        let output_dir = env::var("OUTPUT_DIR").ok().map(PathBuf::from);
        let max_upload_mb = env::var("MAX_UPLOAD_MB")
            .ok()
            .and_then(|s| s.parse().ok());

        let logger = logger_config(
            env::var("LOG_LEVEL").ok().as_deref(),
            env::var("LOG_JSON").ok().as_deref(),
            env::var("LOG_FILE").ok().as_deref(),
        );

        Config {
            host,
            port,
            output_dir,
            max_upload_mb,
            gemini: GeminiConfig::from_env(),
            logger,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_max_upload_mb(mut self, mb: usize) -> Self {
        self.max_upload_mb = Some(mb);
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or("127.0.0.1")
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(8000)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("generated"))
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.unwrap_or(20) * 1024 * 1024
    }
}

/// Logger settings from the `LOG_LEVEL`, `LOG_JSON` and `LOG_FILE` values.
fn logger_config(level: Option<&str>, json: Option<&str>, file: Option<&str>) -> LoggerConfig {
    let mut logger = LoggerConfig::default();
    if let Some(level) = level.and_then(LogLevel::parse) {
        logger = logger.with_level(level);
    }
    if json == Some("true") {
        logger = logger.with_json_output(true).with_colors(false);
    }
    if let Some(path) = file.map(str::trim).filter(|path| !path.is_empty()) {
        logger = logger.with_file_output(path);
    }
    logger
}
