//! Process configuration.
//!
//! Everything is read from the environment once at startup, after loading an
//! optional `.env` file. Missing upstream settings fail startup instead of
//! surfacing later as confusing login errors.

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use crate::auth::Credentials;

/// Default inbound port
const DEFAULT_PORT: u16 = 8080;

/// Default timeout for every outbound call to the node service.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),

    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Settings for the upstream node client.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub base_url: String,
    pub credentials: Credentials,
    pub timeout: Duration,
    /// Refuse tokenless login responses that did not set a cookie.
    pub require_session_cookie: bool,
}

impl NodeConfig {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            require_session_cookie: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub node: NodeConfig,
    pub log_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup so tests don't have to
    /// touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let port = match lookup("PORT") {
            Some(v) => v.trim().parse::<u16>().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => DEFAULT_PORT,
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let base_url = required("NODE_BASE_URL")?;
        let parsed = Url::parse(&base_url).map_err(|_| ConfigError::Invalid("NODE_BASE_URL"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid("NODE_BASE_URL"));
        }

        let credentials = Credentials::new(required("LOGIN_EMAIL")?, required("LOGIN_PASSWORD")?);

        let timeout_secs = match lookup("NODE_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid("NODE_TIMEOUT_SECS"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let require_session_cookie = match lookup("NODE_REQUIRE_SESSION_COOKIE") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid("NODE_REQUIRE_SESSION_COOKIE"))?,
            None => true,
        };

        let log_dir = lookup("LOG_DIR").filter(|v| !v.trim().is_empty());

        Ok(Self {
            addr,
            node: NodeConfig {
                base_url,
                credentials,
                timeout: Duration::from_secs(timeout_secs),
                require_session_cookie,
            },
            log_dir,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
