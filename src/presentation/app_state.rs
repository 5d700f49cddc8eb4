// Application state shared by the shell and its command handlers
use crate::application::dispatcher::FetchDispatcher;
use crate::application::features::{panel_catalog, FeatureRegistry};
use crate::application::grid_service::GridService;
use crate::application::http_source::HttpSource;
use crate::application::options_service::{BreedOptions, OptionsService};
use crate::application::output_board::OutputBoard;
use crate::application::saved_service::SavedListService;
use crate::application::state_store::{StateStore, TypedStore};
use crate::application::theme_service::ThemeService;
use crate::infrastructure::config::ApiKeys;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<FeatureRegistry>,
    pub dispatcher: FetchDispatcher,
    pub grid: GridService,
    pub saved: SavedListService,
    pub themes: ThemeService,
    pub options: Arc<BreedOptions>,
    movie_page: Arc<AtomicU32>,
}

impl AppState {
    /// Wire services, restore the saved panel order and load the breed
    /// pickers. Startup never fails on upstream or storage problems.
    pub async fn build(
        keys: &ApiKeys,
        store: Arc<dyn StateStore>,
        http: Arc<dyn HttpSource>,
        board: OutputBoard,
    ) -> Self {
        let typed = TypedStore::new(store);

        let grid = GridService::new(panel_catalog(), typed.clone());
        grid.restore();

        let options = OptionsService::load(http.as_ref()).await;

        Self {
            registry: Arc::new(FeatureRegistry::standard(keys)),
            dispatcher: FetchDispatcher::new(http, board.clone()),
            grid,
            saved: SavedListService::new(typed.clone(), board),
            themes: ThemeService::new(typed),
            options: Arc::new(options),
            movie_page: Arc::new(AtomicU32::new(1)),
        }
    }

    pub fn board(&self) -> &OutputBoard {
        self.dispatcher.board()
    }

    pub fn movie_page(&self) -> u32 {
        self.movie_page.load(Ordering::SeqCst)
    }

    pub fn set_movie_page(&self, page: u32) {
        self.movie_page.store(page.max(1), Ordering::SeqCst);
    }

    pub fn next_movie_page(&self) -> u32 {
        self.movie_page.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// None when already on the first page
    pub fn prev_movie_page(&self) -> Option<u32> {
        self.movie_page
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |page| {
                (page > 1).then(|| page - 1)
            })
            .ok()
            .map(|previous| previous - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::http_source::testing::{status, ScriptedHttp};
    use crate::infrastructure::memory_store::MemoryStore;

    async fn state() -> AppState {
        AppState::build(
            &ApiKeys::default(),
            Arc::new(MemoryStore::new()),
            Arc::new(ScriptedHttp::always(status(500))),
            OutputBoard::new(),
        )
        .await
    }

    #[tokio::test]
    async fn test_movie_page_never_below_one() {
        let state = state().await;
        assert_eq!(state.movie_page(), 1);
        assert_eq!(state.prev_movie_page(), None);
        assert_eq!(state.next_movie_page(), 2);
        assert_eq!(state.next_movie_page(), 3);
        assert_eq!(state.prev_movie_page(), Some(2));
        assert_eq!(state.prev_movie_page(), Some(1));
        assert_eq!(state.prev_movie_page(), None);
        assert_eq!(state.movie_page(), 1);
        state.set_movie_page(7);
        assert_eq!(state.prev_movie_page(), Some(6));
        state.set_movie_page(0);
        assert_eq!(state.movie_page(), 1);
    }

    #[tokio::test]
    async fn test_startup_survives_unreachable_upstreams() {
        let state = state().await;
        assert_eq!(state.options.dogs.len(), 1);
        assert_eq!(state.options.dogs[0].label, "Failed to load breeds");
        assert_eq!(state.grid.panels().len(), 45);
    }
}
