// Shell command handlers
use crate::application::dispatcher::DispatchReport;
use crate::application::features::media;
use crate::domain::fetch::FeatureInput;
use crate::domain::panel::{DragState, PanelId};
use crate::domain::saved::SavedListKind;
use crate::presentation::app_state::AppState;
use crate::presentation::commands::Command;
use crate::presentation::render::format_region;
use tokio::task::JoinHandle;

pub enum Reply {
    Lines(Vec<String>),
    /// Dispatch running in the background; its renders arrive on the board
    Dispatched(JoinHandle<Option<DispatchReport>>),
    Quit,
}

impl Reply {
    fn line(text: impl Into<String>) -> Self {
        Self::Lines(vec![text.into()])
    }
}

pub fn handle(state: &AppState, command: Command) -> Reply {
    match command {
        Command::List => list_panels(state),
        Command::Show { panel } => match state.board().read(&panel) {
            Some(content) => Reply::line(format_region(&panel, &content)),
            None => Reply::line(format!("[{}] (nothing yet)", panel)),
        },
        Command::Run { feature, args } => run_feature(state, &feature, args),
        Command::Save { list } => with_list(&list, |kind| save(state, kind)),
        Command::Saved { list } => with_list(&list, |kind| {
            state.saved.show(kind);
            Reply::Lines(Vec::new())
        }),
        Command::Reset { list } => with_list(&list, |kind| match state.saved.reset(kind) {
            Ok(()) => Reply::line(format!("Cleared {}.", kind.title())),
            Err(e) => {
                tracing::warn!("Failed to clear {}: {}", kind.storage_key(), e);
                Reply::line(format!("Failed to clear {}.", kind.title()))
            }
        }),
        Command::Close => {
            if state.saved.close() {
                Reply::Lines(Vec::new())
            } else {
                Reply::line("No window open.")
            }
        }
        Command::Drag { panel } => {
            if state.grid.begin_drag(&PanelId::new(panel.as_str())) {
                Reply::line(describe_drag(&state.grid.drag_state()))
            } else {
                Reply::line(format!("Unknown panel: {}", panel))
            }
        }
        Command::Over { panel } => {
            state.grid.drag_over(&PanelId::new(panel));
            Reply::line(describe_drag(&state.grid.drag_state()))
        }
        Command::Leave { panel } => {
            state.grid.drag_leave(&PanelId::new(panel));
            Reply::line(describe_drag(&state.grid.drag_state()))
        }
        Command::DropOn { panel } => drop_on(state, &panel),
        Command::Cancel => {
            state.grid.cancel_drag();
            Reply::line("Drag cancelled.")
        }
        Command::Theme { toggle: false } => Reply::line(format!("Theme: {}", state.themes.current())),
        Command::Theme { toggle: true } => match state.themes.toggle() {
            Ok(theme) => Reply::line(format!("Theme: {}", theme)),
            Err(e) => {
                tracing::warn!("Failed to persist theme: {}", e);
                Reply::line("Failed to change theme.")
            }
        },
        Command::NextMovies => {
            let page = state.next_movie_page();
            run_feature(state, "movies", vec![page.to_string()])
        }
        Command::PrevMovies => match state.prev_movie_page() {
            Some(page) => run_feature(state, "movies", vec![page.to_string()]),
            None => Reply::line("Already on the first page."),
        },
        Command::Options { panel } => match state.options.for_panel(&panel) {
            Some(options) => Reply::Lines(
                options
                    .iter()
                    .map(|o| format!("  {:<24} {}", o.value, o.label))
                    .collect(),
            ),
            None => Reply::line(format!("No options for {}.", panel)),
        },
        Command::Quit => Reply::Quit,
    }
}

fn list_panels(state: &AppState) -> Reply {
    let drag = state.grid.drag_state();
    let lines = state
        .grid
        .panels()
        .iter()
        .enumerate()
        .map(|(i, panel)| {
            let features: Vec<&str> = state.registry.for_panel(panel.id.as_str()).map(|s| s.name).collect();
            let marker = match &drag {
                DragState::Dragging { source, .. } if *source == panel.id => "  <dragging>",
                DragState::Dragging { hint: Some(hint), .. } if *hint == panel.id => "  <drop here>",
                _ => "",
            };
            format!(
                "{:>2}. {:<22} {:<26} {}{}",
                i + 1,
                panel.id,
                panel.title,
                features.join(", "),
                marker
            )
        })
        .collect();
    Reply::Lines(lines)
}

fn run_feature(state: &AppState, feature: &str, args: Vec<String>) -> Reply {
    let Some(spec) = state.registry.get(feature) else {
        return Reply::line(format!("Unknown feature: {} (try `list`)", feature));
    };
    let name = spec.name;

    // A bare `run movies` fetches the page the session is on, an explicit
    // page moves the session there
    let input = if name == "movies" && args.is_empty() {
        FeatureInput::new(vec![state.movie_page().to_string()])
    } else {
        FeatureInput::new(args)
    };
    if name == "movies" {
        state.set_movie_page(media::movie_page(&input));
    }

    let registry = state.registry.clone();
    let dispatcher = state.dispatcher.clone();
    Reply::Dispatched(tokio::spawn(async move {
        let spec = registry.get(name)?;
        Some(dispatcher.dispatch(spec, &input).await)
    }))
}

fn with_list(name: &str, f: impl FnOnce(SavedListKind) -> Reply) -> Reply {
    match SavedListKind::from_name(name) {
        Some(kind) => f(kind),
        None => {
            let known: Vec<&str> = SavedListKind::ALL.iter().map(|k| k.storage_key()).collect();
            Reply::line(format!("Unknown list: {} (one of {})", name, known.join(", ")))
        }
    }
}

fn save(state: &AppState, kind: SavedListKind) -> Reply {
    let Some(saver) = state.registry.saver_for(kind) else {
        return Reply::line(format!("Nothing feeds {}.", kind.title()));
    };
    match state.saved.save_from(kind, saver.panel) {
        Ok(Some(_)) => Reply::line(format!("Added to {}.", kind.title())),
        Ok(None) => Reply::line(format!("Nothing to save yet, run {} first.", saver.name)),
        Err(e) => {
            tracing::warn!("Failed to save to {}: {}", kind.storage_key(), e);
            Reply::line(format!("Failed to save to {}.", kind.title()))
        }
    }
}

fn drop_on(state: &AppState, target: &str) -> Reply {
    let source = match state.grid.drag_state() {
        DragState::Dragging { source, .. } => source,
        DragState::Idle => return Reply::line("Not dragging anything."),
    };
    if state.grid.drop_on(&PanelId::new(target)) {
        Reply::line(format!("Moved {} before {}.", source, target))
    } else {
        Reply::line("Nothing moved.")
    }
}

fn describe_drag(drag: &DragState) -> String {
    match drag {
        DragState::Idle => "Not dragging.".to_string(),
        DragState::Dragging { source, hint: None } => format!("Dragging {}.", source),
        DragState::Dragging {
            source,
            hint: Some(hint),
        } => format!("Dragging {}, would land before {}.", source, hint),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dispatcher::DispatchOutcome;
    use crate::application::http_source::testing::{json, ScriptedHttp};
    use crate::application::http_source::{FetchError, HttpResponse};
    use crate::application::output_board::OutputBoard;
    use crate::domain::render::RenderResult;
    use crate::infrastructure::config::ApiKeys;
    use crate::infrastructure::memory_store::MemoryStore;
    use crate::presentation::commands::parse_line;
    use std::sync::Arc;

    async fn state_with(http: ScriptedHttp) -> (AppState, Arc<ScriptedHttp>) {
        let http = Arc::new(http);
        let state = AppState::build(
            &ApiKeys::default(),
            Arc::new(MemoryStore::new()),
            http.clone(),
            OutputBoard::new(),
        )
        .await;
        (state, http)
    }

    fn exec(state: &AppState, line: &str) -> Reply {
        handle(state, parse_line(line).unwrap())
    }

    fn lines(reply: Reply) -> Vec<String> {
        match reply {
            Reply::Lines(lines) => lines,
            _ => panic!("expected lines"),
        }
    }

    async fn finish(reply: Reply) -> Option<DispatchReport> {
        match reply {
            Reply::Dispatched(task) => task.await.unwrap(),
            _ => panic!("expected a dispatch"),
        }
    }

    /// Breed lookups at startup consume the first two scripted responses
    fn startup_failures() -> Vec<Result<HttpResponse, FetchError>> {
        vec![json("{}"), json("{}")]
    }

    #[tokio::test]
    async fn test_run_then_save_then_show() {
        let mut script = startup_failures();
        script.push(json(r#"{"message":"https://images.dog.ceo/husky.jpg","status":"success"}"#));
        let (state, _) = state_with(ScriptedHttp::new(script)).await;

        let report = finish(exec(&state, "run dog")).await.unwrap();
        assert_eq!(report.outcome, DispatchOutcome::Rendered);

        assert_eq!(lines(exec(&state, "save dogs")), vec!["Added to Saved Dogs."]);
        assert!(lines(exec(&state, "saved dog")).is_empty());
        let modal = state.board().modal().unwrap();
        assert_eq!(modal.title, "Saved Dogs");
        assert!(matches!(modal.content, RenderResult::Cards(ref cards) if cards.len() == 1));
    }

    #[tokio::test]
    async fn test_save_before_run() {
        let (state, _) = state_with(ScriptedHttp::new(startup_failures())).await;
        assert_eq!(
            lines(exec(&state, "save joke")),
            vec!["Nothing to save yet, run joke first."]
        );
        assert_eq!(
            lines(exec(&state, "save birds")),
            vec!["Unknown list: birds (one of savedDogs, savedCats, savedJokes)"]
        );
    }

    #[tokio::test]
    async fn test_unknown_feature_makes_no_request() {
        let (state, http) = state_with(ScriptedHttp::new(startup_failures())).await;
        assert_eq!(
            lines(exec(&state, "run teleport")),
            vec!["Unknown feature: teleport (try `list`)"]
        );
        assert_eq!(http.calls(), 2);
    }

    #[tokio::test]
    async fn test_drag_commands() {
        let (state, _) = state_with(ScriptedHttp::new(startup_failures())).await;
        assert_eq!(lines(exec(&state, "drag nowhere")), vec!["Unknown panel: nowhere"]);
        assert_eq!(lines(exec(&state, "drag planet-fact")), vec!["Dragging planet-fact."]);
        assert_eq!(
            lines(exec(&state, "over dog")),
            vec!["Dragging planet-fact, would land before dog."]
        );
        assert_eq!(lines(exec(&state, "leave dog")), vec!["Dragging planet-fact."]);
        assert_eq!(lines(exec(&state, "drop dog")), vec!["Moved planet-fact before dog."]);
        assert_eq!(state.grid.panels()[0].id.as_str(), "planet-fact");
        assert_eq!(lines(exec(&state, "drop cat")), vec!["Not dragging anything."]);
    }

    #[tokio::test]
    async fn test_prev_movies_on_first_page() {
        let (state, http) = state_with(ScriptedHttp::new(startup_failures())).await;
        assert_eq!(lines(exec(&state, "prev-movies")), vec!["Already on the first page."]);
        assert_eq!(http.calls(), 2);
    }

    #[tokio::test]
    async fn test_next_movies_requests_next_page() {
        let mut script = startup_failures();
        script.push(json(r#"{"results":[]}"#));
        let (state, http) = state_with(ScriptedHttp::new(script)).await;

        finish(exec(&state, "next-movies")).await;
        assert!(http.urls()[2].contains("page=2"));
    }

    #[tokio::test]
    async fn test_explicit_movie_page_moves_the_session() {
        let mut script = startup_failures();
        script.extend([json(r#"{"results":[]}"#), json(r#"{"results":[]}"#), json(r#"{"results":[]}"#)]);
        let (state, http) = state_with(ScriptedHttp::new(script)).await;

        finish(exec(&state, "run movies 5")).await;
        assert!(http.urls()[2].contains("page=5"));

        finish(exec(&state, "next-movies")).await;
        assert!(http.urls()[3].contains("page=6"));

        finish(exec(&state, "prev-movies")).await;
        assert!(http.urls()[4].contains("page=5"));
    }

    #[tokio::test]
    async fn test_invalid_input_renders_error() {
        let (state, http) = state_with(ScriptedHttp::new(startup_failures())).await;
        let report = finish(exec(&state, "run weather")).await.unwrap();
        assert_eq!(report.outcome, DispatchOutcome::Rejected);
        assert_eq!(
            lines(exec(&state, "show weather")),
            vec!["[weather] ! Please enter a city name."]
        );
        assert_eq!(http.calls(), 2);
    }

    #[tokio::test]
    async fn test_theme_and_options() {
        let (state, _) = state_with(ScriptedHttp::new(startup_failures())).await;
        assert_eq!(lines(exec(&state, "theme")), vec!["Theme: light"]);
        assert_eq!(lines(exec(&state, "theme --toggle")), vec!["Theme: dark"]);
        assert_eq!(
            lines(exec(&state, "options cat")),
            vec![format!("  {:<24} {}", "", "Failed to load breeds")]
        );
        assert_eq!(lines(exec(&state, "options weather")), vec!["No options for weather."]);
        assert!(matches!(exec(&state, "quit"), Reply::Quit));
    }
}
