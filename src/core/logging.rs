//! Logging initialization and startup diagnostics

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;

/// Default filter when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "info,teloxide=warn,hyper=warn";

/// Initialize the global tracing subscriber (console output).
///
/// Honors `RUST_LOG`; `log` records emitted by dependencies are bridged
/// into tracing by the subscriber.
///
/// # Returns
/// * `Ok(())` - Subscriber installed
/// * `Err(anyhow::Error)` - A global subscriber was already installed
pub fn init_logger() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective configuration at application startup.
///
/// The bot token never appears in the output.
pub fn log_startup_configuration(config: &Config) {
    tracing::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    tracing::info!("Listening on:      {}", config.listen_addr());
    tracing::info!("Public base URL:   {}", config.public_base_url);
    tracing::info!("Deployment root:   {}", config.deploy_root.display());
    tracing::info!("Bot API:           {}", config.bot_api_url);
    tracing::info!("Webhook URL:       {}", config.webhook_url_redacted());
    match config.request_timeout {
        Some(timeout) => tracing::info!("Request timeout:   {:?}", timeout),
        None => tracing::info!("Request timeout:   transport default"),
    }
    tracing::info!("Run `sitedrop set-webhook` to register the webhook with Telegram");
    tracing::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
