//! Test fixtures
//!
//! Provides TestEnvironment that sets up everything needed to drive the
//! update handler and the router without touching the network:
//! - Temporary deployment root
//! - Recording Bot API double
//! - Configuration pointing at both

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use figment::Figment;
use serde_json::json;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

use sitedrop::core::Config;
use sitedrop::deploy::Deployer;
use sitedrop::telegram::{IncomingUpdate, UpdateContext};

use crate::mocks::MockBotApi;

pub const TEST_TOKEN: &str = "123456:test-token";
pub const TEST_BASE_URL: &str = "https://sites.example.com";
pub const TEST_CHAT_ID: i64 = 4242;

/// Complete test environment
pub struct TestEnvironment {
    /// Owns the deployment root; dropped with the environment
    pub tmp: TempDir,
    pub config: Arc<Config>,
    pub bot: Arc<MockBotApi>,
    pub ctx: UpdateContext,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self::with_bot(MockBotApi::new())
    }

    pub fn with_bot(bot: MockBotApi) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("deployments");
        let config = Arc::new(
            Config::from_figment(
                Figment::new()
                    .merge(("bot_token", TEST_TOKEN))
                    .merge(("public_base_url", TEST_BASE_URL))
                    .merge(("deploy_root", root.to_string_lossy().into_owned()))
                    .merge(("max_extract_bytes", 1024 * 1024)),
            )
            .unwrap(),
        );
        let bot = Arc::new(bot);
        let ctx = UpdateContext::new(bot.clone(), Arc::new(Deployer::from_config(&config)));

        Self { tmp, config, bot, ctx }
    }

    pub fn root(&self) -> &Path {
        &self.config.deploy_root
    }

    /// Deployment directories currently on disk
    pub fn deployment_dirs(&self) -> Vec<PathBuf> {
        match std::fs::read_dir(self.root()) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Builds an in-memory zip. Names ending with `/` become directories.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Update carrying a text message
pub fn text_update(text: &str) -> IncomingUpdate {
    serde_json::from_value(json!({
        "update_id": 1,
        "message": {
            "message_id": 10,
            "date": 1700000000,
            "chat": {"id": TEST_CHAT_ID, "type": "private"},
            "text": text
        }
    }))
    .unwrap()
}

/// Update carrying a document
pub fn document_update(file_id: &str, file_name: Option<&str>, mime_type: Option<&str>) -> IncomingUpdate {
    serde_json::from_value(json!({
        "update_id": 2,
        "message": {
            "message_id": 11,
            "date": 1700000000,
            "chat": {"id": TEST_CHAT_ID, "type": "private"},
            "document": {
                "file_id": file_id,
                "file_unique_id": "unique",
                "file_name": file_name,
                "mime_type": mime_type
            }
        }
    }))
    .unwrap()
}
