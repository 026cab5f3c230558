//! Bot setup: webhook registration and the command menu

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::config::Config;
use crate::core::error::AppResult;

/// Commands shown in the Telegram command menu
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Send a zip archive or an HTML file to deploy it.")]
pub enum Command {
    #[command(description = "how to deploy a site")]
    Start,
    #[command(description = "how to deploy a site")]
    Help,
}

/// Sets up bot commands in Telegram UI
///
/// # Returns
/// * `Ok(())` - Commands set successfully
/// * `Err(RequestError)` - Failed to set commands
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}

/// Points Telegram at this service's webhook route and publishes the
/// command menu.
pub async fn register_webhook(bot: &Bot, config: &Config) -> AppResult<()> {
    let url = url::Url::parse(&config.webhook_url())?;

    tracing::info!("Registering webhook {}", config.webhook_url_redacted());
    bot.set_webhook(url).await?;
    setup_bot_commands(bot).await?;
    tracing::info!("Webhook registered");

    Ok(())
}
