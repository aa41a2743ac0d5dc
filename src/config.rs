use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::retry::RetryPolicy;
use crate::service::DEFAULT_MAX_QUESTION_LENGTH;

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;

/// Main configuration structure for the study assistant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub simulated: SimulatedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Generation endpoint receiving `{prompt, timestamp}`
    pub endpoint: String,
    pub request_timeout_ms: u64,
    pub max_attempts: u32,
    /// Base delay for exponential backoff
    pub retry_delay_ms: u64,
    pub max_question_length: usize,
}

/// Offline response generator, selected once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatedConfig {
    pub enabled: bool,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "study-assistant".to_string(),
            bind: "127.0.0.1:8787".to_string(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000/api/generate".to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            max_attempts: 3,
            retry_delay_ms: 1000,
            max_question_length: DEFAULT_MAX_QUESTION_LENGTH,
        }
    }
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_delay_ms: 500,
            max_delay_ms: 1500,
        }
    }
}

impl BackendConfig {
    /// A zero timeout would fail every attempt, so it falls back to the default.
    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_ms {
            0 => Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            ms => Duration::from_millis(ms),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(self.max_attempts, Duration::from_millis(self.retry_delay_ms))
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides
    /// ALWAYS returns a valid config - never fails
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::info!("Loaded .env from: {}", path.display()),
            Err(_) => tracing::debug!("No .env file found - continuing with env vars only"),
        }

        let config_path =
            env::var("STUDY_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
        let mut config = Self::from_file(&config_path);

        config.apply_env_overrides(|key| env::var(key).ok());

        if let Err(e) = config.validate() {
            tracing::warn!("Config validation warnings: {} - continuing anyway", e);
        }

        config
    }

    fn from_file(config_path: &str) -> Self {
        if !Path::new(config_path).exists() {
            tracing::info!("Config file not found at {} - using defaults", config_path);
            return Self::default();
        }

        match fs::read_to_string(config_path) {
            Ok(contents) => Self::from_yaml(&contents).unwrap_or_else(|e| {
                tracing::error!(
                    "Failed to parse config file {}: {} - using defaults",
                    config_path,
                    e
                );
                Self::default()
            }),
            Err(e) => {
                tracing::error!(
                    "Failed to read config file {}: {} - using defaults",
                    config_path,
                    e
                );
                Self::default()
            }
        }
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        let config = serde_yaml::from_str::<Config>(contents)?;
        tracing::info!("Loaded configuration from YAML");
        Ok(config)
    }

    /// Apply environment variable overrides. `lookup` is `env::var` outside tests.
    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("STUDY_HTTP_BIND") {
            self.server.bind = bind;
        }

        if let Some(endpoint) = lookup("STUDY_BACKEND_URL") {
            self.backend.endpoint = endpoint;
        }
        if let Some(v) = lookup("STUDY_REQUEST_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.backend.request_timeout_ms = v;
        }
        if let Some(v) = lookup("STUDY_MAX_ATTEMPTS").and_then(|v| v.parse().ok()) {
            self.backend.max_attempts = v;
        }
        if let Some(v) = lookup("STUDY_RETRY_DELAY_MS").and_then(|v| v.parse().ok()) {
            self.backend.retry_delay_ms = v;
        }
        if let Some(v) = lookup("STUDY_MAX_QUESTION_LENGTH").and_then(|v| v.parse().ok()) {
            self.backend.max_question_length = v;
        }

        if let Some(flag) = lookup("STUDY_USE_SIMULATED") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.simulated.enabled = true,
                "0" | "false" | "no" | "off" => self.simulated.enabled = false,
                other => tracing::warn!("Ignoring invalid STUDY_USE_SIMULATED value: {}", other),
            }
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.backend.endpoint.is_empty() {
            return Err("Backend endpoint cannot be empty".into());
        }
        if self.backend.request_timeout_ms == 0 {
            return Err("Request timeout cannot be 0 (default timeout will be used)".into());
        }
        if self.backend.max_attempts == 0 {
            return Err("max_attempts cannot be 0 (one attempt will still be made)".into());
        }
        if self.backend.max_question_length == 0 {
            return Err("max_question_length cannot be 0".into());
        }
        if self.simulated.min_delay_ms > self.simulated.max_delay_ms {
            return Err("Simulated min_delay_ms must not exceed max_delay_ms".into());
        }

        Ok(())
    }
}
