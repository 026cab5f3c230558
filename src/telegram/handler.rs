//! Per-update processing
//!
//! `received → acknowledged → {ignored | help | prompted | rejected |
//! deployed | aborted}`. Acknowledgement happens in the web layer before this
//! runs; every update is handled once and independently of the others.

use std::sync::Arc;

use lazy_regex::regex_is_match;

use crate::core::error::AppError;
use crate::deploy::{DeployOutcome, Deployer, Deployment, Rejection, Upload};
use crate::telegram::api::BotApi;
use crate::telegram::messages;
use crate::telegram::types::{Document, IncomingUpdate};

/// File name assumed when Telegram does not report one
pub const DEFAULT_FILE_NAME: &str = "upload";

/// Dependencies shared by all update handlers
#[derive(Clone)]
pub struct UpdateContext {
    pub bot: Arc<dyn BotApi>,
    pub deployer: Arc<Deployer>,
}

impl UpdateContext {
    pub fn new(bot: Arc<dyn BotApi>, deployer: Arc<Deployer>) -> Self {
        Self { bot, deployer }
    }
}

/// Terminal state of one update
#[derive(Debug)]
pub enum UpdateOutcome {
    /// No message in the update
    Ignored,
    /// Start/help command answered
    Help,
    /// Message without attachment answered with a prompt
    Prompted,
    /// Upload refused, user told why
    Rejected(Rejection),
    /// Site deployed, link sent
    Deployed(Deployment),
    /// Transport or storage failure; no reply is sent
    Aborted(AppError),
}

/// True for `/start` and `/help`, with or without `@botname` and arguments
pub fn is_greeting(text: &str) -> bool {
    regex_is_match!(r"^/(start|help)\b", text)
}

/// Processes one update to completion.
///
/// Reply failures are logged and never change the outcome.
pub async fn handle_update(ctx: &UpdateContext, update: IncomingUpdate) -> UpdateOutcome {
    let Some(message) = update.into_message() else {
        return UpdateOutcome::Ignored;
    };
    let chat_id = message.chat_id();

    if message.text.as_deref().is_some_and(is_greeting) {
        notify(ctx, chat_id, messages::HELP).await;
        return UpdateOutcome::Help;
    }

    let Some(document) = message.document else {
        notify(ctx, chat_id, messages::SEND_FILE_PROMPT).await;
        return UpdateOutcome::Prompted;
    };

    let upload = match fetch_upload(ctx, document).await {
        Ok(upload) => upload,
        Err(e) => {
            tracing::error!("Failed to fetch attachment for chat {:?}: {}", chat_id, e);
            return UpdateOutcome::Aborted(e);
        }
    };

    match ctx.deployer.deploy(upload).await {
        DeployOutcome::Deployed(deployment) => {
            notify(ctx, chat_id, &messages::deployed(&deployment)).await;
            UpdateOutcome::Deployed(deployment)
        }
        DeployOutcome::Rejected(rejection) => {
            tracing::info!("Upload from chat {:?} rejected: {:?}", chat_id, rejection);
            notify(ctx, chat_id, messages::rejection(&rejection)).await;
            UpdateOutcome::Rejected(rejection)
        }
        DeployOutcome::Aborted(e) => {
            tracing::error!("Deployment for chat {:?} aborted: {}", chat_id, e);
            UpdateOutcome::Aborted(e)
        }
    }
}

/// Resolves and downloads an attachment; both calls must succeed
async fn fetch_upload(ctx: &UpdateContext, document: Document) -> Result<Upload, AppError> {
    let file_path = ctx.bot.get_file_path(&document.file_id).await?;
    let bytes = ctx.bot.download_file(&file_path).await?;

    Ok(Upload {
        file_name: document.file_name.unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
        mime_type: document.mime_type,
        bytes,
    })
}

/// Best-effort reply
async fn notify(ctx: &UpdateContext, chat_id: Option<i64>, text: &str) {
    let Some(chat_id) = chat_id else {
        tracing::debug!("No chat id, reply dropped");
        return;
    };
    if let Err(e) = ctx.bot.send_text(chat_id, text).await {
        tracing::warn!("sendMessage to chat {} failed: {}", chat_id, e);
    }
}
