// Theme preference
use crate::application::state_store::{StoreError, TypedStore};
use crate::domain::theme::Theme;

#[derive(Clone)]
pub struct ThemeService {
    store: TypedStore,
}

impl ThemeService {
    pub fn new(store: TypedStore) -> Self {
        Self { store }
    }

    pub fn current(&self) -> Theme {
        self.store.theme()
    }

    /// Flip light/dark and persist; returns the new theme
    pub fn toggle(&self) -> Result<Theme, StoreError> {
        let next = self.current().toggled();
        self.store.set_theme(next)?;
        tracing::debug!("Theme set to {}", next);
        Ok(next)
    }
}
