//! Incoming webhook update model
//!
//! Only the fields the deployer reads. Everything is optional and unknown
//! fields are ignored, so any update Telegram sends deserializes.

use serde::Deserialize;

/// One bot-platform update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomingUpdate {
    #[serde(default)]
    pub update_id: Option<i64>,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
    #[serde(default)]
    pub edited_message: Option<IncomingMessage>,
}

impl IncomingUpdate {
    /// `message`, or `edited_message` when there is no `message`
    pub fn into_message(self) -> Option<IncomingMessage> {
        self.message.or(self.edited_message)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub document: Option<Document>,
    #[serde(default)]
    pub chat: Option<Chat>,
}

impl IncomingMessage {
    pub fn chat_id(&self) -> Option<i64> {
        self.chat.as_ref().map(|c| c.id)
    }
}

/// Attached file reference
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub file_id: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parses_document_message() {
        let update: IncomingUpdate = serde_json::from_value(json!({
            "update_id": 7,
            "message": {
                "message_id": 1,
                "date": 1700000000,
                "chat": {"id": 42, "type": "private"},
                "document": {
                    "file_id": "BQACAgIAAx",
                    "file_unique_id": "AgAD",
                    "file_name": "site.zip",
                    "mime_type": "application/zip",
                    "file_size": 1234
                }
            }
        }))
        .unwrap();

        let message = update.into_message().unwrap();
        let document = message.document.clone().unwrap();
        assert_eq!(message.chat_id(), Some(42));
        assert_eq!(document.file_id, "BQACAgIAAx");
        assert_eq!(document.file_name.as_deref(), Some("site.zip"));
        assert_eq!(document.mime_type.as_deref(), Some("application/zip"));
    }

    #[test]
    fn test_edited_message_fallback() {
        let update: IncomingUpdate = serde_json::from_value(json!({
            "edited_message": {"text": "/start", "chat": {"id": 1}}
        }))
        .unwrap();

        assert_eq!(update.into_message().unwrap().text.as_deref(), Some("/start"));
    }

    #[test]
    fn test_message_preferred_over_edit() {
        let update: IncomingUpdate = serde_json::from_value(json!({
            "message": {"text": "new"},
            "edited_message": {"text": "old"}
        }))
        .unwrap();

        assert_eq!(update.into_message().unwrap().text.as_deref(), Some("new"));
    }

    #[test]
    fn test_update_without_message() {
        let update: IncomingUpdate =
            serde_json::from_value(json!({"update_id": 1, "callback_query": {"id": "x"}})).unwrap();

        assert!(update.into_message().is_none());
    }
}
