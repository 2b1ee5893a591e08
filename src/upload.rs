//! Upload queue and the sequential upload loop.
//!
//! Files upload strictly one after another in list order. A failure marks only
//! that file as [`UploadStatus::Error`]; the batch carries on.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::api::client::FileApi;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Pending,
    Uploading,
    Success,
    Error,
}

impl UploadStatus {
    pub fn label(self) -> &'static str {
        match self {
            UploadStatus::Pending => "pending",
            UploadStatus::Uploading => "uploading",
            UploadStatus::Success => "done",
            UploadStatus::Error => "failed",
        }
    }

    pub fn is_finished(self) -> bool {
        matches!(self, UploadStatus::Success | UploadStatus::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadItem {
    pub source: PathBuf,
    pub status: UploadStatus,
    pub message: Option<String>,
}

impl UploadItem {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            status: UploadStatus::Pending,
            message: None,
        }
    }

    /// Name the file is stored under on the server.
    pub fn file_name(&self) -> String {
        upload_name(&self.source)
    }
}

fn upload_name(source: &Path) -> String {
    source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Pending uploads for the current directory.
#[derive(Debug, Default)]
pub struct UploadQueue {
    items: Vec<UploadItem>,
    running: bool,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[UploadItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Add a file at the front of the list. Ignored while a batch runs.
    pub fn add(&mut self, source: impl Into<PathBuf>) -> bool {
        if self.running {
            return false;
        }
        self.items.insert(0, UploadItem::new(source));
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<UploadItem> {
        if self.running || index >= self.items.len() {
            return None;
        }
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        if !self.running {
            self.items.clear();
        }
    }

    /// Reset every item to pending, mark the batch running, and return the
    /// sources in upload order.
    pub fn start(&mut self) -> Option<Vec<PathBuf>> {
        if self.running || self.items.is_empty() {
            return None;
        }
        self.running = true;
        for item in &mut self.items {
            item.status = UploadStatus::Pending;
            item.message = None;
        }
        Some(self.items.iter().map(|i| i.source.clone()).collect())
    }

    pub fn set_status(&mut self, index: usize, status: UploadStatus, message: Option<String>) {
        if let Some(item) = self.items.get_mut(index) {
            item.status = status;
            item.message = message;
        }
    }

    pub fn finish(&mut self) {
        self.running = false;
    }

    /// `(succeeded, failed)` counts.
    pub fn summary(&self) -> (usize, usize) {
        self.items.iter().fold((0, 0), |(ok, err), item| match item.status {
            UploadStatus::Success => (ok + 1, err),
            UploadStatus::Error => (ok, err + 1),
            _ => (ok, err),
        })
    }
}

async fn upload_one(api: &dyn FileApi, dir: &str, source: &Path) -> Result<()> {
    let file_name = upload_name(source);
    if file_name.is_empty() {
        return Err(AppError::InvalidPath(source.display().to_string()));
    }
    let bytes = tokio::fs::read(source).await?;
    api.upload(dir, &file_name, bytes).await
}

/// Upload `sources` into `dir` one at a time, reporting each status change as
/// `(index, status, error message)`.
pub async fn upload_sequentially<F>(
    api: &dyn FileApi,
    dir: &str,
    sources: &[PathBuf],
    mut on_status: F,
) where
    F: FnMut(usize, UploadStatus, Option<String>),
{
    for (index, source) in sources.iter().enumerate() {
        on_status(index, UploadStatus::Uploading, None);
        match upload_one(api, dir, source).await {
            Ok(()) => {
                info!(dir, file = %source.display(), "uploaded");
                on_status(index, UploadStatus::Success, None);
            }
            Err(e) => {
                warn!(dir, file = %source.display(), error = %e, "upload failed");
                on_status(index, UploadStatus::Error, Some(e.to_string()));
            }
        }
    }
}
