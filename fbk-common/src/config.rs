//! Configuration resolution for the feedback review service
//!
//! Provides two-tier resolution with ENV -> TOML priority. Every knob has a
//! compiled default except the completion credential, which must come from
//! one of the two sources.

use crate::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5780";
const DEFAULT_DATABASE_PATH: &str = "./feedback.db";
const DEFAULT_COMPLETION_ENDPOINT: &str = "https://api.openai.com";
const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";
const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_COMPLETION_MAX_TOKENS: u32 = 300;
const DEFAULT_RATE_LIMIT_WINDOW_MINUTES: i64 = 60;
const DEFAULT_RATE_LIMIT_MAX_SUBMISSIONS: i64 = 10;
const DEFAULT_CONFIG_FILE: &str = "./fbk.toml";

/// Runtime configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file path
    pub database_path: PathBuf,
    /// HTTP listen address
    pub bind_addr: SocketAddr,
    /// CORS allow-list; origins not on it get no allow-origin header
    pub allowed_origins: Vec<String>,
    /// AI provider credential
    pub completion_api_key: String,
    /// AI provider base URL
    pub completion_endpoint: String,
    /// Model name sent with each completion request
    pub completion_model: String,
    /// Per-request timeout for completion calls
    pub completion_timeout_secs: u64,
    /// Output-length bound for completion calls
    pub completion_max_tokens: u32,
    /// Sliding rate-limit window length
    pub rate_limit_window_minutes: i64,
    /// Maximum submissions per origin per window
    pub rate_limit_max_submissions: i64,
}

/// Optional TOML fallback file
///
/// Only the keys an operator would rather keep out of the process
/// environment are supported here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub completion_api_key: Option<String>,
    pub allowed_origins: Option<String>,
}

impl Config {
    /// Resolve configuration from the environment with TOML fallback
    ///
    /// The TOML file path comes from `FBK_CONFIG` (default `./fbk.toml`);
    /// a missing file is not an error.
    pub fn load() -> Result<Config> {
        let toml_path =
            std::env::var("FBK_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let toml_config = load_toml_config(Path::new(&toml_path))?;

        let completion_api_key = resolve_api_key(
            std::env::var("FBK_COMPLETION_API_KEY").ok(),
            toml_config.completion_api_key.as_ref(),
        )?;

        let allowed_origins = std::env::var("FBK_ALLOWED_ORIGINS")
            .ok()
            .or(toml_config.allowed_origins)
            .map(|s| parse_origins(&s))
            .unwrap_or_default();

        let bind_addr_raw =
            std::env::var("FBK_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr_raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid FBK_BIND_ADDR '{}': {}", bind_addr_raw, e)))?;

        Ok(Config {
            database_path: PathBuf::from(
                std::env::var("FBK_DATABASE_PATH")
                    .unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string()),
            ),
            bind_addr,
            allowed_origins,
            completion_api_key,
            completion_endpoint: std::env::var("FBK_COMPLETION_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_COMPLETION_ENDPOINT.to_string()),
            completion_model: std::env::var("FBK_COMPLETION_MODEL")
                .unwrap_or_else(|_| DEFAULT_COMPLETION_MODEL.to_string()),
            completion_timeout_secs: env_number(
                "FBK_COMPLETION_TIMEOUT_SECS",
                DEFAULT_COMPLETION_TIMEOUT_SECS,
            ),
            completion_max_tokens: env_number(
                "FBK_COMPLETION_MAX_TOKENS",
                DEFAULT_COMPLETION_MAX_TOKENS,
            ),
            rate_limit_window_minutes: env_number(
                "FBK_RATE_LIMIT_WINDOW_MINUTES",
                DEFAULT_RATE_LIMIT_WINDOW_MINUTES,
            ),
            rate_limit_max_submissions: env_number(
                "FBK_RATE_LIMIT_MAX_SUBMISSIONS",
                DEFAULT_RATE_LIMIT_MAX_SUBMISSIONS,
            ),
        })
    }
}

/// Resolve the completion credential from ENV -> TOML priority
///
/// Warns if the key is present in both sources (potential misconfiguration).
pub fn resolve_api_key(env_key: Option<String>, toml_key: Option<&String>) -> Result<String> {
    let env_valid = env_key.as_deref().is_some_and(is_valid_key);
    let toml_valid = toml_key.map(|k| is_valid_key(k)).unwrap_or(false);

    if env_valid && toml_valid {
        warn!("Completion API key found in both environment and TOML config. Using environment (highest priority).");
    }

    if env_valid {
        info!("Completion API key loaded from environment variable");
        return Ok(env_key.unwrap());
    }

    if toml_valid {
        info!("Completion API key loaded from TOML config");
        return Ok(toml_key.unwrap().clone());
    }

    Err(Error::Config(
        "Completion API key not configured. Please configure using one of:\n\
         1. Environment: FBK_COMPLETION_API_KEY=your-key-here\n\
         2. TOML config: fbk.toml (completion_api_key = \"your-key\")"
            .to_string(),
    ))
}

/// Validate an API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Parse a comma-separated origin allow-list
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read the optional TOML fallback file
fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Read a numeric environment variable, falling back to a default on
/// absence or parse failure (parse failure is logged, not fatal)
fn env_number<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Invalid {} '{}', using default {}", name, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}
