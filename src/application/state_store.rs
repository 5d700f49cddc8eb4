// Persisted key-value state and its typed accessors
use crate::domain::panel::PanelId;
use crate::domain::saved::{SavedItemList, SavedListKind};
use crate::domain::theme::Theme;
use std::sync::Arc;

pub const THEME_KEY: &str = "theme";
pub const PANEL_ORDER_KEY: &str = "dashboardOrder";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write state file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Text values keyed by name. Writes replace the whole value.
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Typed view over a `StateStore`. Every reader falls back to a default
/// when the key is missing or does not decode:
/// - theme: light
/// - panel order: none (keep default order)
/// - saved lists: empty
#[derive(Clone)]
pub struct TypedStore {
    inner: Arc<dyn StateStore>,
}

impl TypedStore {
    pub fn new(inner: Arc<dyn StateStore>) -> Self {
        Self { inner }
    }

    pub fn theme(&self) -> Theme {
        match self.inner.get(THEME_KEY) {
            Some(raw) => Theme::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("Ignoring unknown theme value {:?}", raw);
                Theme::default()
            }),
            None => Theme::default(),
        }
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), StoreError> {
        self.inner.set(THEME_KEY, theme.as_str())
    }

    pub fn panel_order(&self) -> Option<Vec<String>> {
        let raw = self.inner.get(PANEL_ORDER_KEY)?;
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(order) => Some(order),
            Err(e) => {
                tracing::warn!("Ignoring malformed panel order: {}", e);
                None
            }
        }
    }

    pub fn set_panel_order(&self, order: &[PanelId]) -> Result<(), StoreError> {
        let ids: Vec<&str> = order.iter().map(PanelId::as_str).collect();
        self.inner.set(PANEL_ORDER_KEY, &serde_json::to_string(&ids)?)
    }

    pub fn saved_list(&self, kind: SavedListKind) -> SavedItemList {
        let Some(raw) = self.inner.get(kind.storage_key()) else {
            return SavedItemList::default();
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(items) => SavedItemList::new(items),
            Err(e) => {
                tracing::warn!("Ignoring malformed {}: {}", kind.storage_key(), e);
                SavedItemList::default()
            }
        }
    }

    pub fn set_saved_list(&self, kind: SavedListKind, list: &SavedItemList) -> Result<(), StoreError> {
        self.inner
            .set(kind.storage_key(), &serde_json::to_string(list.items())?)
    }

    /// Drop the stored list; a missing key reads back as empty
    pub fn clear_saved_list(&self, kind: SavedListKind) -> Result<(), StoreError> {
        self.inner.remove(kind.storage_key())
    }
}
