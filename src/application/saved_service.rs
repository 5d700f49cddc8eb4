// Saved lists - save the current result, show the list in the modal, reset
use crate::application::output_board::{Modal, OutputBoard};
use crate::application::state_store::{StoreError, TypedStore};
use crate::domain::render::{Card, RenderResult};
use crate::domain::saved::{SavedItemList, SavedListKind};

#[derive(Clone)]
pub struct SavedListService {
    store: TypedStore,
    board: OutputBoard,
}

impl SavedListService {
    pub fn new(store: TypedStore, board: OutputBoard) -> Self {
        Self { store, board }
    }

    /// Append the artifact currently shown in `region`. Returns the saved
    /// item, or None when there was nothing saveable on screen.
    pub fn save_from(&self, kind: SavedListKind, region: &str) -> Result<Option<String>, StoreError> {
        let Some(artifact) = self.board.read(region).and_then(|r| r.artifact()) else {
            tracing::debug!("Nothing to save from {}", region);
            return Ok(None);
        };
        let mut list = self.store.saved_list(kind);
        list.push(artifact.clone());
        self.store.set_saved_list(kind, &list)?;
        tracing::debug!("Saved item #{} to {}", list.len(), kind.storage_key());
        Ok(Some(artifact))
    }

    pub fn list(&self, kind: SavedListKind) -> SavedItemList {
        self.store.saved_list(kind)
    }

    /// Open the modal with the full list, replacing any open modal
    pub fn show(&self, kind: SavedListKind) {
        let list = self.store.saved_list(kind);
        self.board.open_modal(Self::modal_for(kind, &list));
    }

    pub fn reset(&self, kind: SavedListKind) -> Result<(), StoreError> {
        self.store.clear_saved_list(kind)?;
        self.board.open_modal(Self::modal_for(kind, &SavedItemList::default()));
        Ok(())
    }

    pub fn close(&self) -> bool {
        self.board.close_modal()
    }

    fn modal_for(kind: SavedListKind, list: &SavedItemList) -> Modal {
        let content = if list.is_empty() {
            RenderResult::message(kind.empty_message())
        } else {
            RenderResult::Cards(
                list.items()
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        let card = Card::new(format!("#{}", i + 1));
                        if kind.holds_images() {
                            card.with_image(item.clone())
                        } else {
                            item.lines().fold(card, |card, line| card.with_line(line))
                        }
                    })
                    .collect(),
            )
        };
        Modal {
            title: kind.title().to_string(),
            list: kind,
            content,
        }
    }
}
