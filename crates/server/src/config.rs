//! # Application Configuration
//!
//! This module defines the configuration structure for the `geomind-server` and
//! provides the logic for loading it from an optional `config.yml` file and
//! environment variables.

use config::{
    Config as ConfigBuilder, Environment, File, FileFormat, Value as ConfigValue,
    ValueKind as ConfigValueKind,
};
use geomind::{
    constants::{DEFAULT_TEXT_MODEL, DEFAULT_VISION_MODEL},
    prompts::tasks::*,
    providers::db::postgis::PostgisSettings,
    registry::{
        COMPARATIVE_SUMMARY, PHOTO_ANALYSIS, QUERY_INTERPRETATION, SATELLITE_ANALYSIS,
        SENTIMENT_ANALYSIS, SQL_GENERATION, STREET_VIEW_ANALYSIS,
    },
};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use tracing::info;

/// The provider key used by the text tasks in the default configuration.
pub const TEXT_PROVIDER: &str = "gemini_text";
/// The provider key used by the imagery tasks in the default configuration.
pub const VISION_PROVIDER: &str = "gemini_vision";

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates an explicitly requested configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// PostGIS connection settings. Overridden with `GEOMIND_DB__HOST` and friends.
    #[serde(default)]
    pub db: PostgisSettings,
    /// Google Maps Platform access.
    #[serde(default)]
    pub maps: MapsConfig,
    /// The key shared by every Gemini provider that has none of its own.
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    /// Largest request body accepted by the photo upload endpoint, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// A map of named, reusable AI provider configurations.
    pub providers: HashMap<String, ProviderConfig>,
    /// A map of tasks, each specifying a provider and prompts.
    pub tasks: HashMap<String, TaskConfig>,
}

fn default_port() -> u16 {
    8000
}

/// Uploaded photos arrive base64-encoded inside JSON.
fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MapsConfig {
    pub api_key: Option<String>,
    /// Replaces `https://maps.googleapis.com/maps/api`, mainly for tests.
    pub base_url: Option<String>,
}

/// A reusable configuration for a specific AI provider instance.
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// The type of provider (e.g., "gemini", "local").
    pub provider: String,
    /// The API URL. Optional for providers like Gemini where it can be derived.
    pub api_url: Option<String>,
    /// The API key, which can be null for local providers.
    pub api_key: Option<String>,
    pub model_name: String,
}

/// Defines the prompts and provider for a specific application task.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TaskConfig {
    /// The key of the provider to use from the `providers` map.
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub user_prompt: Option<String>,
}

fn table(entries: Vec<(&str, ConfigValue)>) -> ConfigValue {
    let map = entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
    ConfigValue::new(None, ConfigValueKind::Table(map))
}

/// Constructs a `config::Value` map of the default Gemini providers.
fn build_default_providers() -> HashMap<String, ConfigValue> {
    [
        (TEXT_PROVIDER, DEFAULT_TEXT_MODEL),
        (VISION_PROVIDER, DEFAULT_VISION_MODEL),
    ]
    .into_iter()
    .map(|(name, model)| {
        (
            name.to_string(),
            table(vec![
                ("provider", ConfigValue::from("gemini")),
                ("model_name", ConfigValue::from(model)),
            ]),
        )
    })
    .collect()
}

/// Constructs a `config::Value` map of the default, hardcoded tasks from the library.
/// This serves as the base layer of configuration.
fn build_default_tasks() -> HashMap<String, ConfigValue> {
    let tasks = vec![
        (
            QUERY_INTERPRETATION,
            (
                TEXT_PROVIDER,
                QUERY_INTERPRETATION_SYSTEM_PROMPT,
                QUERY_INTERPRETATION_USER_PROMPT,
            ),
        ),
        (
            SQL_GENERATION,
            (
                TEXT_PROVIDER,
                SQL_GENERATION_SYSTEM_PROMPT,
                SQL_GENERATION_USER_PROMPT,
            ),
        ),
        (
            SATELLITE_ANALYSIS,
            (
                VISION_PROVIDER,
                SATELLITE_ANALYSIS_SYSTEM_PROMPT,
                VISION_ANALYSIS_USER_PROMPT,
            ),
        ),
        (
            STREET_VIEW_ANALYSIS,
            (
                VISION_PROVIDER,
                STREET_VIEW_ANALYSIS_SYSTEM_PROMPT,
                VISION_ANALYSIS_USER_PROMPT,
            ),
        ),
        (
            PHOTO_ANALYSIS,
            (
                VISION_PROVIDER,
                PHOTO_ANALYSIS_SYSTEM_PROMPT,
                VISION_ANALYSIS_USER_PROMPT,
            ),
        ),
        (
            COMPARATIVE_SUMMARY,
            (
                VISION_PROVIDER,
                COMPARATIVE_SUMMARY_SYSTEM_PROMPT,
                COMPARATIVE_SUMMARY_USER_PROMPT,
            ),
        ),
        (
            SENTIMENT_ANALYSIS,
            (
                VISION_PROVIDER,
                SENTIMENT_ANALYSIS_SYSTEM_PROMPT,
                SENTIMENT_ANALYSIS_USER_PROMPT,
            ),
        ),
    ];

    tasks
        .into_iter()
        .map(|(name, (provider, sys, user))| {
            (
                name.to_string(),
                table(vec![
                    ("provider", ConfigValue::from(provider)),
                    ("system_prompt", ConfigValue::from(sys)),
                    ("user_prompt", ConfigValue::from(user)),
                ]),
            )
        })
        .collect()
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(format!("Invalid substitution pattern: {e}")))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_else(|_| "".to_string())
    });

    Ok(Some(expanded_content.to_string()))
}

/// Reads a credential from the environment, treating an empty value as unset.
fn env_credential(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Loads the application configuration from a file and environment variables.
///
/// - Top-level keys like `port` are overridden by `PORT`.
/// - Nested keys are overridden by `GEOMIND_...` variables (e.g., `GEOMIND_DB__HOST`).
/// - `GEMINI_API_KEY` and `GOOGLE_MAPS_API_KEY` fill in credentials the file left
///   empty. Gemini providers without a key of their own inherit `gemini_api_key`.
///
/// A missing `config.yml` is not an error; a missing explicit override path is.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder()
        // Layer 1: Programmatic defaults from the library.
        .set_default("providers", build_default_providers())?
        .set_default("tasks", build_default_tasks())?;

    // Layer 2: Optional config file.
    match config_path_override {
        Some(path) => {
            let content = read_and_substitute(path)?.ok_or_else(|| {
                ConfigError::NotFound(format!("Config file not found at '{path}'."))
            })?;
            info!("Loading configuration from '{path}'.");
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None => {
            let user_config_path = format!("{base_path}/config.yml");
            if let Some(content) = read_and_substitute(&user_config_path)? {
                info!("Loading user-defined configuration from '{user_config_path}'.");
                builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
            } else {
                info!("'{user_config_path}' not found. Using built-in defaults.");
            }
        }
    }

    let settings = builder
        // Layer 3: Load environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Layer 4: Load prefixed environment variables for deeper overrides.
        .add_source(
            Environment::with_prefix("GEOMIND")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    // Credentials: file values win, then the conventional environment variables.
    config.gemini_api_key =
        non_empty(config.gemini_api_key.take()).or_else(|| env_credential("GEMINI_API_KEY"));
    config.maps.api_key =
        non_empty(config.maps.api_key.take()).or_else(|| env_credential("GOOGLE_MAPS_API_KEY"));

    for provider in config.providers.values_mut() {
        provider.api_key = non_empty(provider.api_key.take());
        if provider.provider == "gemini" && provider.api_key.is_none() {
            provider.api_key = config.gemini_api_key.clone();
        }
    }

    Ok(config)
}
