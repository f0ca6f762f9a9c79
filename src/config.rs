use anyhow::{Result, anyhow};
use humantime::parse_duration;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const DEFAULT_TRAINING_ENDPOINT: &str = "https://southcentralus.api.cognitive.microsoft.com";
pub const DEFAULT_API_VERSION: &str = "v2.0";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

// TOML configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_training_endpoint")]
    pub training_endpoint: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

#[derive(Debug, Deserialize)]
pub struct TrainingConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default values
fn default_training_endpoint() -> String {
    DEFAULT_TRAINING_ENDPOINT.to_string()
}
fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}
fn default_poll_interval() -> String {
    "1s".to_string()
}
fn default_log_format() -> String {
    "term".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            training_endpoint: default_training_endpoint(),
            api_version: default_api_version(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

static CONFIG: Lazy<Config> = Lazy::new(|| {
    load_config().unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config files: {}. Using defaults.",
            e
        );
        Config::default()
    })
});

static CONFIG_STORE: Lazy<Arc<Mutex<HashMap<String, String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(HashMap::new())));

pub fn get(name: &str) -> Result<String> {
    // Priority 1: CONFIG_STORE (runtime overrides)
    if let Some(value) = get_from_store(name) {
        if value.is_empty() {
            return Err(anyhow!("{} is empty", name));
        }
        return Ok(value);
    }

    // Priority 2: Environment variables
    if let Ok(val) = std::env::var(name)
        && !val.is_empty()
    {
        return Ok(val);
    }

    // Priority 3: TOML config
    let toml_value = toml_value(&CONFIG, name);
    if let Some(value) = toml_value
        && !value.is_empty()
    {
        return Ok(value);
    }

    Err(anyhow!("Configuration key not found: {}", name))
}

fn toml_value(config: &Config, name: &str) -> Option<String> {
    match name {
        "CUSTOM_VISION_ENDPOINT" => Some(config.service.training_endpoint.clone()),
        "CUSTOM_VISION_API_VERSION" => Some(config.service.api_version.clone()),
        "TRAINING_POLL_INTERVAL" => Some(config.training.poll_interval.clone()),
        "LOG_FORMAT" => Some(config.logging.format.clone()),
        _ => None,
    }
}

pub fn set(name: &str, value: &str) {
    if let Ok(mut store) = CONFIG_STORE.lock() {
        store.insert(name.to_string(), value.to_string());
    }
}

pub fn unset(name: &str) {
    if let Ok(mut store) = CONFIG_STORE.lock() {
        store.remove(name);
    }
}

fn get_from_store(name: &str) -> Option<String> {
    if let Ok(store) = CONFIG_STORE.lock() {
        store.get(name).cloned()
    } else {
        None
    }
}

pub fn training_endpoint() -> String {
    get("CUSTOM_VISION_ENDPOINT").unwrap_or_else(|_| default_training_endpoint())
}

pub fn api_version() -> String {
    get("CUSTOM_VISION_API_VERSION").unwrap_or_else(|_| default_api_version())
}

pub fn poll_interval() -> Duration {
    get("TRAINING_POLL_INTERVAL")
        .and_then(|v| Ok(parse_duration(&v)?))
        .unwrap_or(DEFAULT_POLL_INTERVAL)
}

/// Load configuration from TOML files with priority:
/// 1. config/config.local.toml (git-ignored, for local overrides)
/// 2. config/config.toml (git-managed template)
/// 3. Default values
fn load_config() -> Result<Config> {
    load_config_from(Path::new("config"))
}

fn load_config_from(dir: &Path) -> Result<Config> {
    let mut config = Config::default();

    let base_path = dir.join("config.toml");
    if base_path.exists() {
        let content = fs::read_to_string(&base_path)?;
        config = toml::from_str(&content)?;
    }

    let local_path = dir.join("config.local.toml");
    if local_path.exists() {
        let content = fs::read_to_string(&local_path)?;
        let local_config: toml::Table = toml::from_str(&content)?;
        merge_config(&mut config, &local_config);
    }

    Ok(config)
}

/// Only keys present in the local file override the base file.
fn merge_config(base: &mut Config, local: &toml::Table) {
    let section = |name: &str| local.get(name).and_then(|v| v.as_table());
    let string = |table: &toml::Table, key: &str| {
        table
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    };

    if let Some(service) = section("service") {
        if let Some(v) = string(service, "training_endpoint") {
            base.service.training_endpoint = v;
        }
        if let Some(v) = string(service, "api_version") {
            base.service.api_version = v;
        }
    }
    if let Some(training) = section("training")
        && let Some(v) = string(training, "poll_interval")
    {
        base.training.poll_interval = v;
    }
    if let Some(logging) = section("logging")
        && let Some(v) = string(logging, "format")
    {
        base.logging.format = v;
    }
}
