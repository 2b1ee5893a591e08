//! Runs network commands off the UI loop and reports back as [`Event`]s.
//!
//! A new listing request aborts the one still in flight; likewise per text
//! slot. Stale results that slip through are dropped by ticket on the `App`
//! side.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::client::FileApi;
use crate::error::Result;
use crate::event::{Event, OperationResult, TextTarget};
use crate::nav::NavTicket;
use crate::upload::upload_sequentially;

/// Side effects requested by the `App`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LoadListing {
        ticket: NavTicket,
        path: String,
    },
    LoadText {
        ticket: NavTicket,
        target: TextTarget,
        url: String,
    },
    /// Drop any pending fetch for `target`.
    CancelText(TextTarget),
    CreateDir {
        path: String,
    },
    Delete {
        path: String,
    },
    Upload {
        dir: String,
        sources: Vec<PathBuf>,
    },
    Download {
        path: String,
        file_name: String,
    },
}

pub struct Worker {
    api: Arc<dyn FileApi>,
    tx: UnboundedSender<Event>,
    download_dir: PathBuf,
    listing_task: Option<JoinHandle<()>>,
    text_tasks: HashMap<TextTarget, JoinHandle<()>>,
}

impl Worker {
    pub fn new(api: Arc<dyn FileApi>, tx: UnboundedSender<Event>, download_dir: PathBuf) -> Self {
        Self {
            api,
            tx,
            download_dir,
            listing_task: None,
            text_tasks: HashMap::new(),
        }
    }

    pub fn dispatch_all(&mut self, commands: Vec<Command>) {
        for command in commands {
            self.dispatch(command);
        }
    }

    pub fn dispatch(&mut self, command: Command) {
        debug!(?command, "dispatch");
        match command {
            Command::LoadListing { ticket, path } => {
                if let Some(task) = self.listing_task.take() {
                    task.abort();
                }
                let api = Arc::clone(&self.api);
                let tx = self.tx.clone();
                self.listing_task = Some(tokio::spawn(async move {
                    let result = api.info(&path).await.map_err(|e| e.to_string());
                    let _ = tx.send(Event::ListingLoaded {
                        ticket,
                        path,
                        result,
                    });
                }));
            }
            Command::LoadText {
                ticket,
                target,
                url,
            } => {
                self.cancel_text(target);
                let api = Arc::clone(&self.api);
                let tx = self.tx.clone();
                let task = tokio::spawn(async move {
                    let result = api
                        .read_url(&url)
                        .await
                        .map(|c| c.into_text())
                        .map_err(|e| e.to_string());
                    let _ = tx.send(Event::TextLoaded {
                        ticket,
                        target,
                        result,
                    });
                });
                self.text_tasks.insert(target, task);
            }
            Command::CancelText(target) => self.cancel_text(target),
            Command::CreateDir { path } => self.spawn_operation(Operation::Create, path),
            Command::Delete { path } => self.spawn_operation(Operation::Delete, path),
            Command::Upload { dir, sources } => {
                let api = Arc::clone(&self.api);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    info!(%dir, count = sources.len(), "upload batch started");
                    upload_sequentially(api.as_ref(), &dir, &sources, |index, status, message| {
                        let _ = tx.send(Event::UploadProgress {
                            index,
                            status,
                            message,
                        });
                    })
                    .await;
                    let _ = tx.send(Event::UploadFinished);
                });
            }
            Command::Download { path, file_name } => {
                let api = Arc::clone(&self.api);
                let tx = self.tx.clone();
                let target = self.download_dir.join(&file_name);
                tokio::spawn(async move {
                    let result = download(api.as_ref(), &path, &target).await;
                    let op = match result {
                        Ok(bytes) => {
                            info!(%path, target = %target.display(), bytes, "downloaded");
                            OperationResult {
                                summary: format!("Saved {}", target.display()),
                                error: None,
                                refresh: false,
                            }
                        }
                        Err(e) => {
                            warn!(%path, error = %e, "download failed");
                            OperationResult {
                                summary: format!("Download of {}", file_name),
                                error: Some(e.to_string()),
                                refresh: false,
                            }
                        }
                    };
                    let _ = tx.send(Event::OperationComplete(op));
                });
            }
        }
    }

    fn cancel_text(&mut self, target: TextTarget) {
        if let Some(task) = self.text_tasks.remove(&target) {
            task.abort();
        }
    }

    /// Run a create/delete call and report it as an [`OperationResult`]
    /// that refreshes the listing.
    fn spawn_operation(&self, op: Operation, path: String) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = match op {
                Operation::Create => api.create(&path).await,
                Operation::Delete => api.delete(&path).await,
            };
            let summary = format!("{} {}", op.past_tense(), path);
            let error = match result {
                Ok(()) => {
                    info!(%summary, "operation complete");
                    None
                }
                Err(e) => {
                    warn!(%summary, error = %e, "operation failed");
                    Some(e.to_string())
                }
            };
            let _ = tx.send(Event::OperationComplete(OperationResult {
                summary,
                error,
                refresh: true,
            }));
        });
    }
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Create,
    Delete,
}

impl Operation {
    fn past_tense(self) -> &'static str {
        match self {
            Operation::Create => "Created",
            Operation::Delete => "Deleted",
        }
    }
}

async fn download(api: &dyn FileApi, path: &str, target: &std::path::Path) -> Result<usize> {
    let bytes = api.read(path).await?.into_bytes();
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(target, &bytes).await?;
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::entry::FileEntry;
    use crate::nav::Navigator;
    use crate::test_support::MockApi;
    use crate::upload::UploadStatus;
    use tokio::sync::mpsc;

    fn listing(name: &str) -> FileEntry {
        FileEntry {
            name: name.into(),
            path: name.into(),
            is_dir: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn superseded_listing_is_aborted() {
        let api = MockApi::new()
            .with_listing("a", listing("a"))
            .with_listing("b", listing("b"));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut worker = Worker::new(Arc::new(api), tx, PathBuf::from("."));
        let nav = Navigator::new();

        worker.dispatch(Command::LoadListing {
            ticket: nav.begin(),
            path: "a".into(),
        });
        let second = nav.begin();
        worker.dispatch(Command::LoadListing {
            ticket: second,
            path: "b".into(),
        });

        match rx.recv().await {
            Some(Event::ListingLoaded {
                ticket,
                path,
                result,
            }) => {
                assert_eq!(ticket, second);
                assert_eq!(path, "b");
                assert_eq!(result.unwrap().name, "b");
            }
            other => panic!("unexpected event {:?}", other),
        }
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn listing_error_is_reported_as_text() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut worker = Worker::new(Arc::new(MockApi::new()), tx, PathBuf::from("."));
        worker.dispatch(Command::LoadListing {
            ticket: Navigator::new().begin(),
            path: "missing".into(),
        });
        match rx.recv().await {
            Some(Event::ListingLoaded { result, .. }) => {
                assert_eq!(result.unwrap_err(), "Error: 404 Not Found");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn text_is_fetched_by_url() {
        let api = MockApi::new().with_text("http://h/-/a.txt?mtime=1", "hello");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut worker = Worker::new(Arc::new(api), tx, PathBuf::from("."));
        let ticket = Navigator::new().begin();
        worker.dispatch(Command::LoadText {
            ticket,
            target: TextTarget::Caption,
            url: "http://h/-/a.txt?mtime=1".into(),
        });
        match rx.recv().await {
            Some(Event::TextLoaded {
                target, result, ..
            }) => {
                assert_eq!(target, TextTarget::Caption);
                assert_eq!(result.unwrap(), "hello");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn create_reports_refresh() {
        let api = Arc::new(MockApi::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut worker = Worker::new(api.clone(), tx, PathBuf::from("."));
        worker.dispatch(Command::CreateDir {
            path: "docs/new".into(),
        });
        match rx.recv().await {
            Some(Event::OperationComplete(op)) => {
                assert!(op.refresh);
                assert!(op.error.is_none());
                assert_eq!(op.summary, "Created docs/new");
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(api.calls(), vec!["create docs/new"]);
    }

    #[tokio::test]
    async fn download_writes_into_download_dir() {
        let dir = tempfile::tempdir().unwrap();
        let api = MockApi::new().with_text("docs/a.txt", "payload");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut worker = Worker::new(Arc::new(api), tx, dir.path().to_path_buf());
        worker.dispatch(Command::Download {
            path: "docs/a.txt".into(),
            file_name: "a.txt".into(),
        });
        match rx.recv().await {
            Some(Event::OperationComplete(op)) => assert!(op.error.is_none()),
            other => panic!("unexpected event {:?}", other),
        }
        let saved = std::fs::read_to_string(dir.path().join("a.txt")).unwrap();
        assert_eq!(saved, "payload");
    }

    #[tokio::test]
    async fn upload_batch_reports_progress_then_finish() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pic.png");
        std::fs::write(&file, [1u8, 2, 3]).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut worker = Worker::new(Arc::new(MockApi::new()), tx, PathBuf::from("."));
        worker.dispatch(Command::Upload {
            dir: "photos".into(),
            sources: vec![file],
        });

        let mut statuses = Vec::new();
        loop {
            match rx.recv().await {
                Some(Event::UploadProgress { status, .. }) => statuses.push(status),
                Some(Event::UploadFinished) => break,
                other => panic!("unexpected event {:?}", other),
            }
        }
        assert_eq!(statuses, vec![UploadStatus::Uploading, UploadStatus::Success]);
    }
}
