use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

use crate::api::entry::FileEntry;
use crate::nav::NavTicket;
use crate::upload::UploadStatus;

/// Which text slot a fetched body belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextTarget {
    /// Body of the selected text file.
    Preview,
    /// Description caption of the selected entry.
    Caption,
    /// Description of the directory being listed.
    DirDescription,
}

/// Result of a completed create/delete/download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    /// Human readable summary, shown in the status bar on success.
    pub summary: String,
    pub error: Option<String>,
    /// Whether the current listing should be reloaded.
    pub refresh: bool,
}

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// A key press event.
    Key(KeyEvent),
    /// A periodic tick for rendering.
    Tick,
    /// Terminal resize event.
    Resize(u16, u16),
    /// A directory listing arrived (or failed).
    ListingLoaded {
        ticket: NavTicket,
        path: String,
        result: std::result::Result<FileEntry, String>,
    },
    /// A text body arrived (or failed).
    TextLoaded {
        ticket: NavTicket,
        target: TextTarget,
        result: std::result::Result<String, String>,
    },
    /// One file of the running upload batch changed status.
    UploadProgress {
        index: usize,
        status: UploadStatus,
        message: Option<String>,
    },
    /// The upload batch is done.
    UploadFinished,
    /// A create/delete/download finished.
    OperationComplete(OperationResult),
}

/// Async event handler that polls crossterm events and forwards them via a channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new EventHandler with the given tick rate.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        tokio::task::spawn_blocking(move || loop {
            let sent = if event::poll(tick_rate).unwrap_or(false) {
                match event::read() {
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        event_tx.send(Event::Key(key))
                    }
                    Ok(CrosstermEvent::Resize(w, h)) => event_tx.send(Event::Resize(w, h)),
                    _ => Ok(()),
                }
            } else {
                event_tx.send(Event::Tick)
            };
            if sent.is_err() {
                break;
            }
        });

        Self { rx, tx }
    }

    /// Sender for background tasks to report results.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Receive the next event (waits until available).
    pub async fn next(&mut self) -> crate::error::Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| crate::error::AppError::Terminal("Event channel closed".into()))
    }
}
