//! In-memory [`FileApi`] used by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::api::client::{ApiFuture, Content, FileApi};
use crate::api::entry::FileEntry;
use crate::error::AppError;

#[derive(Default)]
pub struct MockApi {
    pub listings: HashMap<String, FileEntry>,
    pub texts: HashMap<String, String>,
    /// `file_name`s whose upload answers 500.
    pub failing_uploads: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, path: &str, entry: FileEntry) -> Self {
        self.listings.insert(path.to_string(), entry);
        self
    }

    pub fn with_text(mut self, url: &str, text: &str) -> Self {
        self.texts.insert(url.to_string(), text.to_string());
        self
    }

    pub fn failing_upload(mut self, file_name: &str) -> Self {
        self.failing_uploads.insert(file_name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

fn not_found() -> AppError {
    AppError::Http {
        status: 404,
        reason: "Not Found".into(),
    }
}

impl FileApi for MockApi {
    fn info<'a>(&'a self, path: &'a str) -> ApiFuture<'a, FileEntry> {
        Box::pin(async move {
            self.record(format!("info {}", path));
            self.listings.get(path).cloned().ok_or_else(not_found)
        })
    }

    fn read<'a>(&'a self, path: &'a str) -> ApiFuture<'a, Content> {
        Box::pin(async move {
            self.record(format!("read {}", path));
            self.texts
                .get(path)
                .map(|t| Content::Text(t.clone()))
                .ok_or_else(not_found)
        })
    }

    fn read_url<'a>(&'a self, url: &'a str) -> ApiFuture<'a, Content> {
        Box::pin(async move {
            self.record(format!("read_url {}", url));
            self.texts
                .get(url)
                .map(|t| Content::Bytes(t.clone().into_bytes()))
                .ok_or_else(not_found)
        })
    }

    fn create<'a>(&'a self, path: &'a str) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            self.record(format!("create {}", path));
            Ok(())
        })
    }

    fn delete<'a>(&'a self, path: &'a str) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            self.record(format!("delete {}", path));
            Ok(())
        })
    }

    fn upload<'a>(
        &'a self,
        dir: &'a str,
        file_name: &'a str,
        bytes: Vec<u8>,
    ) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            self.record(format!("upload start {}/{} {}", dir, file_name, bytes.len()));
            tokio::task::yield_now().await;
            self.record(format!("upload end {}", file_name));
            if self.failing_uploads.contains(file_name) {
                return Err(AppError::Http {
                    status: 500,
                    reason: "Internal Server Error".into(),
                });
            }
            Ok(())
        })
    }
}
