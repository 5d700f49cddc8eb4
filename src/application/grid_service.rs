// Grid service - drag interactions over the panel grid, with durable order
use crate::application::state_store::TypedStore;
use crate::domain::panel::{DragState, Panel, PanelGrid, PanelId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone)]
pub struct GridService {
    grid: Arc<Mutex<PanelGrid>>,
    store: TypedStore,
}

impl GridService {
    pub fn new(panels: Vec<Panel>, store: TypedStore) -> Self {
        Self {
            grid: Arc::new(Mutex::new(PanelGrid::new(panels))),
            store,
        }
    }

    /// Apply the persisted order, if any. Called once at startup.
    pub fn restore(&self) {
        match self.store.panel_order() {
            Some(order) => {
                self.lock().restore_order(&order);
                tracing::debug!("Restored panel order ({} entries)", order.len());
            }
            None => tracing::debug!("No saved panel order, keeping defaults"),
        }
    }

    pub fn panels(&self) -> Vec<Panel> {
        self.lock().panels().to_vec()
    }

    pub fn drag_state(&self) -> DragState {
        self.lock().drag_state().clone()
    }

    pub fn begin_drag(&self, id: &PanelId) -> bool {
        self.lock().begin_drag(id)
    }

    pub fn drag_over(&self, candidate: &PanelId) {
        self.lock().drag_over(candidate);
    }

    pub fn drag_leave(&self, candidate: &PanelId) {
        self.lock().drag_leave(candidate);
    }

    pub fn cancel_drag(&self) {
        self.lock().cancel_drag();
    }

    /// Drop onto `target`; a successful move is persisted right away
    pub fn drop_on(&self, target: &PanelId) -> bool {
        let order = {
            let mut grid = self.lock();
            if !grid.drop_on(target) {
                return false;
            }
            grid.order()
        };

        if let Err(e) = self.store.set_panel_order(&order) {
            tracing::warn!("Failed to persist panel order: {}", e);
        }
        true
    }

    fn lock(&self) -> MutexGuard<'_, PanelGrid> {
        self.grid.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::state_store::{StateStore, PANEL_ORDER_KEY};
    use crate::infrastructure::memory_store::MemoryStore;

    fn panels() -> Vec<Panel> {
        ["dog", "cat", "weather", "trivia"]
            .iter()
            .map(|id| Panel::new(id, id))
            .collect()
    }

    fn order(service: &GridService) -> Vec<String> {
        service.panels().iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_drop_persists_and_restores_in_next_session() {
        let raw = Arc::new(MemoryStore::new());
        let service = GridService::new(panels(), TypedStore::new(raw.clone()));
        service.restore();

        service.begin_drag(&PanelId::new("trivia"));
        service.drag_over(&PanelId::new("dog"));
        assert!(service.drop_on(&PanelId::new("dog")));
        assert_eq!(
            raw.get(PANEL_ORDER_KEY).as_deref(),
            Some(r#"["trivia","dog","cat","weather"]"#)
        );

        let next_session = GridService::new(panels(), TypedStore::new(raw));
        next_session.restore();
        assert_eq!(order(&next_session), vec!["trivia", "dog", "cat", "weather"]);
    }

    #[test]
    fn test_noop_drop_does_not_write() {
        let raw = Arc::new(MemoryStore::new());
        let service = GridService::new(panels(), TypedStore::new(raw.clone()));

        service.begin_drag(&PanelId::new("cat"));
        assert!(!service.drop_on(&PanelId::new("cat")));
        service.begin_drag(&PanelId::new("cat"));
        service.cancel_drag();

        assert_eq!(raw.get(PANEL_ORDER_KEY), None);
        assert_eq!(service.drag_state(), DragState::Idle);
    }

    #[test]
    fn test_malformed_saved_order_keeps_defaults() {
        let raw = Arc::new(MemoryStore::new());
        raw.set(PANEL_ORDER_KEY, "[1, 2").unwrap();
        let service = GridService::new(panels(), TypedStore::new(raw));
        service.restore();
        assert_eq!(order(&service), vec!["dog", "cat", "weather", "trivia"]);
    }

    #[test]
    fn test_restore_ignores_unknown_ids() {
        let raw = Arc::new(MemoryStore::new());
        raw.set(PANEL_ORDER_KEY, r#"["retired","weather","dog"]"#).unwrap();
        let service = GridService::new(panels(), TypedStore::new(raw));
        service.restore();
        assert_eq!(order(&service), vec!["cat", "trivia", "weather", "dog"]);
    }
}
