//! Service configuration
//!
//! Loaded once at startup and shared read-only (`Arc<Config>`) with the web
//! server, the Telegram client and the deployer. Sources, later ones
//! overriding earlier ones:
//!
//! 1. built-in defaults
//! 2. `sitedrop.toml` in the working directory (optional)
//! 3. environment variables (`BOT_TOKEN`, `PUBLIC_BASE_URL`, `PORT`, ...)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::core::error::{AppError, AppResult};
use crate::core::validation::validate_public_base_url;

/// Optional configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "sitedrop.toml";

/// Environment variables read by [`Config::load`]
const ENV_KEYS: &[&str] = &[
    "BOT_TOKEN",
    "PUBLIC_BASE_URL",
    "PORT",
    "HOST",
    "DEPLOY_ROOT",
    "BOT_API_URL",
    "REQUEST_TIMEOUT_SECS",
    "MAX_EXTRACT_BYTES",
];

/// Default values
pub mod defaults {
    /// Listen port
    pub const PORT: u16 = 3000;

    /// Deployment storage root, relative to the working directory
    pub const DEPLOY_ROOT: &str = "deployments";

    /// Official Telegram Bot API endpoint
    pub const BOT_API_URL: &str = "https://api.telegram.org";

    /// Cap on the uncompressed size of an uploaded archive (200 MiB)
    pub const MAX_EXTRACT_BYTES: u64 = 200 * 1024 * 1024;
}

/// Raw shape of the configuration sources
#[derive(Debug, Deserialize)]
struct RawConfig {
    bot_token: Option<String>,
    public_base_url: Option<String>,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_host")]
    host: IpAddr,
    #[serde(default = "default_deploy_root")]
    deploy_root: PathBuf,
    #[serde(default = "default_bot_api_url")]
    bot_api_url: String,
    #[serde(default)]
    request_timeout_secs: Option<u64>,
    #[serde(default = "default_max_extract_bytes")]
    max_extract_bytes: u64,
}

fn default_port() -> u16 {
    defaults::PORT
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_deploy_root() -> PathBuf {
    PathBuf::from(defaults::DEPLOY_ROOT)
}

fn default_bot_api_url() -> String {
    defaults::BOT_API_URL.to_string()
}

fn default_max_extract_bytes() -> u64 {
    defaults::MAX_EXTRACT_BYTES
}

/// Immutable service configuration
#[derive(Debug)]
pub struct Config {
    bot_token: SecretString,
    /// Base for returned links, without trailing slash
    pub public_base_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub deploy_root: PathBuf,
    /// Telegram Bot API base URL (official or local Bot API server)
    pub bot_api_url: String,
    pub request_timeout: Option<Duration>,
    pub max_extract_bytes: u64,
}

impl Config {
    /// Loads configuration from `sitedrop.toml` and the environment.
    ///
    /// `TELEGRAM_BOT_TOKEN` is accepted as an alias for `BOT_TOKEN`; the
    /// latter wins when both are set.
    pub fn load() -> AppResult<Self> {
        let figment = Figment::new()
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::raw().only(&["TELEGRAM_BOT_TOKEN"]).map(|_| "bot_token".into()))
            .merge(Env::raw().only(ENV_KEYS));

        Self::from_figment(figment)
    }

    /// Builds the configuration from an arbitrary figment.
    ///
    /// Fails when the token or base URL is missing, or when the base URL is
    /// not an http(s) URL.
    pub fn from_figment(figment: Figment) -> AppResult<Self> {
        let raw: RawConfig = figment.extract()?;

        let bot_token = raw
            .bot_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Validation("BOT_TOKEN is not set".to_string()))?;

        let public_base_url = raw
            .public_base_url
            .ok_or_else(|| AppError::Validation("PUBLIC_BASE_URL is not set".to_string()))?;
        let public_base_url = validate_public_base_url(&public_base_url)?;

        Ok(Self {
            bot_token: SecretString::from(bot_token),
            public_base_url,
            host: raw.host,
            port: raw.port,
            deploy_root: raw.deploy_root,
            bot_api_url: raw.bot_api_url,
            request_timeout: raw.request_timeout_secs.map(Duration::from_secs),
            max_extract_bytes: raw.max_extract_bytes,
        })
    }

    pub fn bot_token(&self) -> &SecretString {
        &self.bot_token
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Webhook route; the token makes the path unguessable
    pub fn webhook_path(&self) -> String {
        format!("/webhook/{}", self.bot_token.expose_secret())
    }

    /// Absolute webhook URL to register with Telegram
    pub fn webhook_url(&self) -> String {
        format!("{}{}", self.public_base_url, self.webhook_path())
    }

    /// Webhook URL with the token masked, for logs
    pub fn webhook_url_redacted(&self) -> String {
        format!("{}/webhook/{}", self.public_base_url, mask_token(self.bot_token.expose_secret()))
    }

    /// Returns true if `candidate` equals the bot token
    pub fn token_matches(&self, candidate: &str) -> bool {
        self.bot_token.expose_secret() == candidate
    }
}

/// Keeps the bot id part of a token (`123456:`) and hides the secret part
fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((bot_id, _)) => format!("{}:***", bot_id),
        None => "***".to_string(),
    }
}
