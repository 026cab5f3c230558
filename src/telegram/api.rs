//! Outbound Telegram Bot API: file metadata, file bytes, text replies
//!
//! [`BotApi`] is the seam between update handling and the network, so the
//! handler can be driven by a recording double in tests.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use teloxide::prelude::*;
use teloxide::types::FileId;
use url::Url;

use crate::core::config::Config;
use crate::core::error::{AppError, AppResult};

/// File-transfer and messaging operations the update handler needs
#[async_trait]
pub trait BotApi: Send + Sync {
    /// Resolves a file id to its storage path (`getFile`)
    async fn get_file_path(&self, file_id: &str) -> AppResult<String>;

    /// Downloads the bytes stored at a path returned by [`get_file_path`]
    ///
    /// [`get_file_path`]: BotApi::get_file_path
    async fn download_file(&self, file_path: &str) -> AppResult<Vec<u8>>;

    /// Sends a plain text message
    async fn send_text(&self, chat_id: i64, text: &str) -> AppResult<()>;
}

/// [`BotApi`] backed by teloxide for API calls and reqwest for file bytes
#[derive(Clone)]
pub struct TelegramApi {
    bot: Bot,
    http: Client,
    api_url: Url,
    token: SecretString,
}

impl TelegramApi {
    /// Creates the client from the service configuration.
    ///
    /// `bot_api_url` may point at a local Bot API server. No timeout is set
    /// unless `request_timeout` is configured.
    pub fn new(config: &Config) -> AppResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        let api_url = Url::parse(&config.bot_api_url)?;
        let token = config.bot_token().clone();

        if !config.bot_api_url.contains("api.telegram.org") {
            tracing::info!("Using custom Bot API URL: {}", api_url);
        }

        let bot = Bot::with_client(token.expose_secret(), http.clone()).set_api_url(api_url.clone());

        Ok(Self {
            bot,
            http,
            api_url,
            token,
        })
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl BotApi for TelegramApi {
    async fn get_file_path(&self, file_id: &str) -> AppResult<String> {
        let file = self.bot.get_file(FileId(file_id.to_string())).await?;
        tracing::info!("File info retrieved: path = {}, size = {} bytes", file.path, file.size);
        Ok(file.path)
    }

    async fn download_file(&self, file_path: &str) -> AppResult<Vec<u8>> {
        let url = build_file_url(&self.api_url, self.token.expose_secret(), file_path)?;

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus(status));
        }

        let bytes = resp.bytes().await?;
        tracing::info!("Downloaded {} ({} bytes)", file_path, bytes.len());
        Ok(bytes.to_vec())
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> AppResult<()> {
        self.bot.send_message(ChatId(chat_id), text.to_string()).await?;
        Ok(())
    }
}

/// Builds `<base>/file/bot<token>/<file_path>`.
///
/// A local Bot API server reports absolute paths inside its container; the
/// container prefix is stripped so the path becomes relative again.
pub fn build_file_url(base: &Url, token: &str, file_path: &str) -> AppResult<Url> {
    const CONTAINER_PREFIX: &str = "/var/lib/telegram-bot-api/";

    let normalized_path = file_path.strip_prefix(CONTAINER_PREFIX).unwrap_or(file_path);

    let mut url = base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| AppError::Validation("BOT_API_URL cannot be a base URL".to_string()))?;
        segments.pop_if_empty();
        segments.push("file");
        segments.push(&format!("bot{token}"));
        for seg in normalized_path.split('/') {
            if !seg.is_empty() {
                segments.push(seg);
            }
        }
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_file_url_official() {
        let base = Url::parse("https://api.telegram.org").unwrap();
        let url = build_file_url(&base, "123:abc", "documents/file_1.zip").unwrap();
        assert_eq!(url.as_str(), "https://api.telegram.org/file/bot123:abc/documents/file_1.zip");
    }

    #[test]
    fn test_build_file_url_local_server() {
        let base = Url::parse("http://bot-api:8081/").unwrap();
        let url = build_file_url(&base, "123:abc", "/var/lib/telegram-bot-api/123:abc/documents/file_1.zip").unwrap();
        assert_eq!(url.as_str(), "http://bot-api:8081/file/bot123:abc/123:abc/documents/file_1.zip");
    }

    #[test]
    fn test_build_file_url_rejects_non_base() {
        let base = Url::parse("mailto:bot@example.com").unwrap();
        assert!(build_file_url(&base, "t", "x").is_err());
    }
}
