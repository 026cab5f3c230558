//! Recording Bot API double
//!
//! Serves registered files from memory and records every outgoing message,
//! with switches to simulate transport failures.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use sitedrop::core::{AppError, AppResult};
use sitedrop::telegram::BotApi;

#[derive(Default)]
pub struct MockBotApi {
    /// file_id -> (file_path, bytes)
    files: HashMap<String, (String, Vec<u8>)>,
    sent: Mutex<Vec<(i64, String)>>,
    get_file_calls: AtomicUsize,
    download_calls: AtomicUsize,
    fail_get_file: AtomicBool,
    fail_download: AtomicBool,
    fail_send: AtomicBool,
}

impl MockBotApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a downloadable file
    pub fn with_file(mut self, file_id: &str, bytes: Vec<u8>) -> Self {
        let path = format!("documents/{}", file_id);
        self.files.insert(file_id.to_string(), (path, bytes));
        self
    }

    pub fn failing_get_file(self) -> Self {
        self.fail_get_file.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_download(self) -> Self {
        self.fail_download.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_send(self) -> Self {
        self.fail_send.store(true, Ordering::SeqCst);
        self
    }

    /// Messages sent so far, in order
    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, text)| text).collect()
    }

    pub fn get_file_calls(&self) -> usize {
        self.get_file_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BotApi for MockBotApi {
    async fn get_file_path(&self, file_id: &str) -> AppResult<String> {
        self.get_file_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_get_file.load(Ordering::SeqCst) {
            return Err(AppError::HttpStatus(reqwest::StatusCode::BAD_GATEWAY));
        }
        self.files
            .get(file_id)
            .map(|(path, _)| path.clone())
            .ok_or_else(|| AppError::Validation(format!("unknown file id {}", file_id)))
    }

    async fn download_file(&self, file_path: &str) -> AppResult<Vec<u8>> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_download.load(Ordering::SeqCst) {
            return Err(AppError::HttpStatus(reqwest::StatusCode::NOT_FOUND));
        }
        self.files
            .values()
            .find(|(path, _)| path == file_path)
            .map(|(_, bytes)| bytes.clone())
            .ok_or(AppError::HttpStatus(reqwest::StatusCode::NOT_FOUND))
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(AppError::HttpStatus(reqwest::StatusCode::FORBIDDEN));
        }
        Ok(())
    }
}
