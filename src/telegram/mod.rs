//! Telegram bot integration: update model, Bot API client, handler

pub mod api;
pub mod bot;
pub mod handler;
pub mod messages;
pub mod types;

// Re-exports for convenience
pub use api::{BotApi, TelegramApi};
pub use bot::{Command, register_webhook, setup_bot_commands};
pub use handler::{UpdateContext, UpdateOutcome, handle_update};
pub use types::IncomingUpdate;
