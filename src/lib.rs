//! sitedrop - Telegram bot that deploys static sites
//!
//! Users send the bot a zip archive or a single HTML file; the service
//! stores it under a random identifier and replies with a public link.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging, validation and the web server
//! - `deploy`: Upload classification, safe extraction, entry point resolution
//! - `telegram`: Webhook update model, Bot API client and update handling

pub mod cli;
pub mod core;
pub mod deploy;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{AppError, AppResult, Config};
pub use deploy::{DeployOutcome, Deployer, Deployment, Upload};
pub use telegram::{BotApi, TelegramApi, UpdateContext, UpdateOutcome, handle_update};
