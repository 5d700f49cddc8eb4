// Output regions and the shared modal overlay
use crate::domain::render::RenderResult;
use crate::domain::saved::SavedListKind;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub struct Modal {
    pub title: String,
    pub list: SavedListKind,
    pub content: RenderResult,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoardUpdate {
    Region { region: String, content: RenderResult },
    ModalOpened(Modal),
    ModalClosed,
}

#[derive(Debug, Default)]
struct BoardState {
    regions: HashMap<String, RenderResult>,
    modal: Option<Modal>,
}

/// One slot per panel plus at most one modal. Writes overwrite, the last
/// writer wins. Each change is also pushed to the optional update channel.
#[derive(Clone, Default)]
pub struct OutputBoard {
    state: Arc<Mutex<BoardState>>,
    updates: Option<mpsc::UnboundedSender<BoardUpdate>>,
}

impl OutputBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_updates() -> (Self, mpsc::UnboundedReceiver<BoardUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let board = Self {
            state: Arc::default(),
            updates: Some(tx),
        };
        (board, rx)
    }

    pub fn write(&self, region: &str, content: RenderResult) {
        self.lock().regions.insert(region.to_string(), content.clone());
        self.notify(BoardUpdate::Region {
            region: region.to_string(),
            content,
        });
    }

    pub fn read(&self, region: &str) -> Option<RenderResult> {
        self.lock().regions.get(region).cloned()
    }

    /// Replaces any modal already open
    pub fn open_modal(&self, modal: Modal) {
        self.lock().modal = Some(modal.clone());
        self.notify(BoardUpdate::ModalOpened(modal));
    }

    pub fn close_modal(&self) -> bool {
        let was_open = self.lock().modal.take().is_some();
        if was_open {
            self.notify(BoardUpdate::ModalClosed);
        }
        was_open
    }

    pub fn modal(&self) -> Option<Modal> {
        self.lock().modal.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, update: BoardUpdate) {
        if let Some(tx) = &self.updates {
            // Receiver gone just means nobody is watching anymore
            let _ = tx.send(update);
        }
    }
}
