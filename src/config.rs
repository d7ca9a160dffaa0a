// src/config.rs
//! Runtime configuration, read from the process environment (and `.env` via dotenvy).

use std::time::Duration;

use crate::transcript::source::{ProxyConfig, ProxyScope};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

/// Settings for the chat-completions backend behind the generation gateway
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

/// Settings for transcript retrieval
#[derive(Debug, Clone)]
pub struct TranscriptConfig {
    pub youtube_base_url: String,
    pub proxies: Vec<ProxyConfig>,
    pub languages: Vec<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub session_idle: Duration,
    pub generation: GenerationConfig,
    pub transcript: TranscriptConfig,
}

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

/// Language hints tried once every proxy configuration has failed
pub const DEFAULT_LANGUAGES: [&str; 4] = ["en", "en-US", "en-GB", "auto"];

pub fn default_proxies() -> Vec<ProxyConfig> {
    vec![
        ProxyConfig::new(ProxyScope::Http, "http://proxy.scrapingbee.com:8080"),
        ProxyConfig::new(ProxyScope::Http, "http://proxy.scrapeops.io:8080"),
        ProxyConfig::new(ProxyScope::Https, "https://proxy.webshare.io:80"),
    ]
}

impl AppConfig {
    /// Build the configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but with an injectable variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let proxies = match var("TRANSCRIPT_PROXIES") {
            Some(raw) => parse_proxy_list(&raw)?,
            None => default_proxies(),
        };

        let languages = match var("TRANSCRIPT_LANGUAGES") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect(),
        };

        let idle_minutes = parse_or("SESSION_IDLE_MINUTES", var("SESSION_IDLE_MINUTES"), 120u64)?;
        let session_idle = idle_minutes
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| ConfigError::InvalidValue {
                var: "SESSION_IDLE_MINUTES",
                reason: format!("{} minutes is out of range", idle_minutes),
            })?;

        Ok(Self {
            bind_addr: var("STUDY_HUB_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            session_idle,
            generation: GenerationConfig {
                api_key: var("LLM_API_KEY"),
                base_url: var("LLM_BASE_URL")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
                model: var("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
                max_tokens: parse_or("LLM_MAX_TOKENS", var("LLM_MAX_TOKENS"), 2048u32)?,
                temperature: parse_or("LLM_TEMPERATURE", var("LLM_TEMPERATURE"), 0.7f32)?,
                timeout: Duration::from_secs(parse_or(
                    "LLM_TIMEOUT_SECS",
                    var("LLM_TIMEOUT_SECS"),
                    120u64,
                )?),
            },
            transcript: TranscriptConfig {
                youtube_base_url: var("YOUTUBE_BASE_URL")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_YOUTUBE_BASE_URL.to_string()),
                proxies,
                languages,
                timeout: Duration::from_secs(parse_or(
                    "TRANSCRIPT_TIMEOUT_SECS",
                    var("TRANSCRIPT_TIMEOUT_SECS"),
                    30u64,
                )?),
            },
        })
    }
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            var: name,
            reason: format!("'{}': {}", value, e),
        }),
        None => Ok(default),
    }
}

/// Parse `scheme=url` pairs separated by commas, e.g.
/// `http=http://proxy-a:8080,https=https://proxy-b:80`.
/// A bare URL applies to all traffic.
pub fn parse_proxy_list(raw: &str) -> Result<Vec<ProxyConfig>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let (scope, url) = match item.split_once('=') {
                Some((scheme, url)) => {
                    let scope = match scheme.trim().to_ascii_lowercase().as_str() {
                        "http" => ProxyScope::Http,
                        "https" => ProxyScope::Https,
                        "all" => ProxyScope::All,
                        other => {
                            return Err(ConfigError::InvalidValue {
                                var: "TRANSCRIPT_PROXIES",
                                reason: format!("unknown proxy scheme '{}'", other),
                            })
                        }
                    };
                    (scope, url.trim())
                }
                None => (ProxyScope::All, item),
            };

            reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidValue {
                var: "TRANSCRIPT_PROXIES",
                reason: format!("'{}': {}", url, e),
            })?;

            Ok(ProxyConfig::new(scope, url))
        })
        .collect()
}
