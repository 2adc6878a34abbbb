//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.airq/config.json`) and environment.
//! API keys in the environment (`WAQI_TOKEN`, `GEMINI_API_KEY`) win over the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Gateway server settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Upstream services used by the AQI agent.
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Gateway bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Port for HTTP and WebSocket (default 8000).
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
}

fn default_gateway_port() -> u16 {
    8000
}

fn default_gateway_bind() -> String {
    "127.0.0.1".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
        }
    }
}

/// AQI and language-model settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    /// waqi.info API token. Overridden by WAQI_TOKEN env.
    pub waqi_token: Option<String>,
    /// Override the WAQI API base (default https://api.waqi.info).
    pub waqi_base_url: Option<String>,
    /// Gemini API key. Overridden by GEMINI_API_KEY env. Without a key, locations come from the message text only.
    pub gemini_api_key: Option<String>,
    /// Gemini model id (default "gemini-2.5-flash").
    pub gemini_model: Option<String>,
    /// Override the Gemini API base (default https://generativelanguage.googleapis.com/v1beta).
    pub gemini_base_url: Option<String>,
}

/// Non-empty trimmed env var, else the non-empty trimmed config value.
fn env_or(var: &str, configured: Option<&String>) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            configured
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// Resolve the WAQI token: env WAQI_TOKEN overrides config.
pub fn resolve_waqi_token(config: &Config) -> Option<String> {
    env_or("WAQI_TOKEN", config.agent.waqi_token.as_ref())
}

/// Resolve the Gemini API key: env GEMINI_API_KEY overrides config.
pub fn resolve_gemini_api_key(config: &Config) -> Option<String> {
    env_or("GEMINI_API_KEY", config.agent.gemini_api_key.as_ref())
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("AIRQ_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".airq").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Load config from the given path, else the default path (or AIRQ_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}
