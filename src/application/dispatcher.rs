// Fetch dispatcher - validate, show loading, run the retry policy, render once
use crate::application::features::FeatureSpec;
use crate::application::http_source::HttpSource;
use crate::application::output_board::OutputBoard;
use crate::domain::fetch::{FeatureInput, RetryPolicy};
use crate::domain::render::RenderResult;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Input failed validation, no request was made
    Rejected,
    /// An exclusive feature was already running
    Busy,
    Rendered,
    Failed,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub outcome: DispatchOutcome,
    pub attempts: u32,
}

impl DispatchReport {
    fn new(outcome: DispatchOutcome, attempts: u32) -> Self {
        Self { outcome, attempts }
    }
}

#[derive(Clone)]
pub struct FetchDispatcher {
    http: Arc<dyn HttpSource>,
    board: OutputBoard,
    in_flight: Arc<Mutex<HashSet<&'static str>>>,
}

/// Releases an exclusive feature when the dispatch ends
struct InFlightGuard {
    set: Arc<Mutex<HashSet<&'static str>>>,
    name: &'static str,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(self.name);
    }
}

impl FetchDispatcher {
    pub fn new(http: Arc<dyn HttpSource>, board: OutputBoard) -> Self {
        Self {
            http,
            board,
            in_flight: Arc::default(),
        }
    }

    pub fn board(&self) -> &OutputBoard {
        &self.board
    }

    /// Run one user action to a single terminal render in the feature's
    /// region. Never fails: every error becomes a render.
    pub async fn dispatch(&self, spec: &FeatureSpec, input: &FeatureInput) -> DispatchReport {
        if let Err(e) = spec.input.validate(input) {
            tracing::debug!("{}: input rejected: {}", spec.name, e);
            self.board.write(spec.panel, RenderResult::Error(e.0));
            return DispatchReport::new(DispatchOutcome::Rejected, 0);
        }

        let _guard = match self.claim(spec) {
            Some(guard) => guard,
            None => {
                tracing::debug!("{}: already running, ignoring dispatch", spec.name);
                return DispatchReport::new(DispatchOutcome::Busy, 0);
            }
        };

        self.board.write(spec.panel, RenderResult::Loading);

        let report = match spec.policy {
            RetryPolicy::None => self.run_once(spec, input).await,
            RetryPolicy::Bounded(retries) => self.run_bounded(spec, input, retries).await,
            RetryPolicy::UntilSuccess => self.run_until_success(spec, input).await,
        };
        tracing::debug!(
            "{}: {:?} after {} attempt(s)",
            spec.name,
            report.outcome,
            report.attempts
        );
        report
    }

    fn claim(&self, spec: &FeatureSpec) -> Option<Option<InFlightGuard>> {
        if !spec.exclusive {
            return Some(None);
        }
        let mut set = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !set.insert(spec.name) {
            return None;
        }
        Some(Some(InFlightGuard {
            set: self.in_flight.clone(),
            name: spec.name,
        }))
    }

    async fn run_once(&self, spec: &FeatureSpec, input: &FeatureInput) -> DispatchReport {
        match spec.action().attempt(self.http.as_ref(), input).await {
            Ok(result) => {
                self.board.write(spec.panel, result);
                DispatchReport::new(DispatchOutcome::Rendered, 1)
            }
            Err(e) => {
                tracing::debug!("{}: request failed: {}", spec.name, e);
                self.board.write(spec.panel, RenderResult::error(spec.error_message));
                DispatchReport::new(DispatchOutcome::Failed, 1)
            }
        }
    }

    /// Retries only not-found; anything else ends the dispatch at once
    async fn run_bounded(
        &self,
        spec: &FeatureSpec,
        input: &FeatureInput,
        retries: u32,
    ) -> DispatchReport {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match spec.action().attempt(self.http.as_ref(), input).await {
                Ok(result) => {
                    self.board.write(spec.panel, result);
                    return DispatchReport::new(DispatchOutcome::Rendered, attempts);
                }
                Err(e) if e.is_not_found() && attempts <= retries => {
                    tracing::debug!("{}: attempt {} not found, retrying", spec.name, attempts);
                }
                Err(e) if e.is_not_found() => {
                    let message = spec.exhausted_message.unwrap_or(spec.error_message);
                    self.board.write(spec.panel, RenderResult::error(message));
                    return DispatchReport::new(DispatchOutcome::Exhausted, attempts);
                }
                Err(e) => {
                    tracing::debug!("{}: attempt {} failed: {}", spec.name, attempts, e);
                    self.board.write(spec.panel, RenderResult::error(spec.error_message));
                    return DispatchReport::new(DispatchOutcome::Failed, attempts);
                }
            }
        }
    }

    /// No cap, no backoff and no error render. Spins for as long as the
    /// upstream keeps failing.
    async fn run_until_success(&self, spec: &FeatureSpec, input: &FeatureInput) -> DispatchReport {
        let mut attempts: u32 = 0;
        loop {
            attempts = attempts.saturating_add(1);
            match spec.action().attempt(self.http.as_ref(), input).await {
                Ok(result) => {
                    self.board.write(spec.panel, result);
                    return DispatchReport::new(DispatchOutcome::Rendered, attempts);
                }
                Err(e) => {
                    tracing::debug!("{}: attempt {} failed, retrying: {}", spec.name, attempts, e);
                    // Give other tasks on this thread a turn between attempts
                    tokio::task::yield_now().await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::features::{Endpoint, FeatureRegistry};
    use crate::application::http_source::testing::{json, status, ScriptedHttp};
    use crate::application::http_source::FetchError;
    use crate::domain::fetch::{InputRule, Payload};
    use crate::infrastructure::config::ApiKeys;

    const QUESTION: &str = r#"{"results":[{"question":"2+2?","correct_answer":"4"}]}"#;

    fn render_ok(_: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
        Ok(RenderResult::headline("ok"))
    }

    fn spec(policy: RetryPolicy) -> FeatureSpec {
        FeatureSpec::new(
            "sample",
            "sample",
            "Error fetching sample.",
            Endpoint::fixed("https://sample.test/", render_ok),
        )
        .with_policy(policy)
        .with_exhausted_message("Gave up.")
    }

    fn dispatcher(http: Arc<ScriptedHttp>) -> FetchDispatcher {
        FetchDispatcher::new(http, OutputBoard::new())
    }

    #[tokio::test]
    async fn test_single_attempt_success() {
        let http = Arc::new(ScriptedHttp::always(json("{}")));
        let d = dispatcher(http.clone());
        let report = d.dispatch(&spec(RetryPolicy::None), &FeatureInput::empty()).await;

        assert_eq!(report, DispatchReport::new(DispatchOutcome::Rendered, 1));
        assert_eq!(d.board().read("sample"), Some(RenderResult::headline("ok")));
    }

    #[tokio::test]
    async fn test_single_attempt_failure_renders_fixed_error() {
        for failure in [status(500), status(404), json("not json"), Err(FetchError::Transport("reset".into()))] {
            let http = Arc::new(ScriptedHttp::always(failure));
            let d = dispatcher(http.clone());
            let report = d.dispatch(&spec(RetryPolicy::None), &FeatureInput::empty()).await;

            assert_eq!(report, DispatchReport::new(DispatchOutcome::Failed, 1));
            assert_eq!(http.calls(), 1);
            assert_eq!(d.board().read("sample"), Some(RenderResult::error("Error fetching sample.")));
        }
    }

    #[tokio::test]
    async fn test_bounded_exhausts_after_n_plus_one_attempts() {
        for n in [0, 1, 4, 7] {
            let http = Arc::new(ScriptedHttp::always(status(404)));
            let d = dispatcher(http.clone());
            let report = d.dispatch(&spec(RetryPolicy::Bounded(n)), &FeatureInput::empty()).await;

            assert_eq!(report, DispatchReport::new(DispatchOutcome::Exhausted, n + 1));
            assert_eq!(http.calls(), (n + 1) as usize);
            assert_eq!(d.board().read("sample"), Some(RenderResult::error("Gave up.")));
        }
    }

    #[tokio::test]
    async fn test_bounded_stops_on_other_errors() {
        let http = Arc::new(ScriptedHttp::new(vec![status(404), status(500)]).with_fallback(json("{}")));
        let d = dispatcher(http.clone());
        let report = d.dispatch(&spec(RetryPolicy::Bounded(4)), &FeatureInput::empty()).await;

        assert_eq!(report, DispatchReport::new(DispatchOutcome::Failed, 2));
        assert_eq!(d.board().read("sample"), Some(RenderResult::error("Error fetching sample.")));
    }

    #[tokio::test]
    async fn test_bounded_recovers_after_gap() {
        let http = Arc::new(ScriptedHttp::new(vec![status(404), status(404)]).with_fallback(json("{}")));
        let d = dispatcher(http.clone());
        let report = d.dispatch(&spec(RetryPolicy::Bounded(4)), &FeatureInput::empty()).await;

        assert_eq!(report, DispatchReport::new(DispatchOutcome::Rendered, 3));
    }

    #[tokio::test]
    async fn test_until_success_takes_k_plus_one_attempts() {
        let registry = FeatureRegistry::standard(&ApiKeys::default());
        let trivia = registry.get("trivia").unwrap();

        for k in [0usize, 1, 3, 2_500] {
            // Alternate the kinds of failure: transport, status, empty set, garbage
            let failures = (0..k)
                .map(|i| match i % 4 {
                    0 => Err(FetchError::Transport("timeout".into())),
                    1 => status(502),
                    2 => json(r#"{"response_code":1,"results":[]}"#),
                    _ => json("<html>"),
                })
                .collect();
            let http = Arc::new(ScriptedHttp::new(failures).with_fallback(json(QUESTION)));
            let d = dispatcher(http.clone());
            let report = d.dispatch(trivia, &FeatureInput::empty()).await;

            assert_eq!(report, DispatchReport::new(DispatchOutcome::Rendered, k as u32 + 1));
            assert_eq!(http.calls(), k + 1);
            assert_eq!(
                d.board().read("trivia"),
                Some(RenderResult::text(Some("2+2?".into()), vec!["Answer: 4".into()]))
            );
        }
    }

    #[tokio::test]
    async fn test_until_success_never_renders_an_error() {
        let (board, mut rx) = OutputBoard::with_updates();
        let http = Arc::new(ScriptedHttp::new(vec![status(500); 20]).with_fallback(json("{}")));
        let d = FetchDispatcher::new(http, board);
        d.dispatch(&spec(RetryPolicy::UntilSuccess), &FeatureInput::empty()).await;

        let mut seen = Vec::new();
        while let Ok(update) = rx.try_recv() {
            seen.push(update);
        }
        assert_eq!(seen.len(), 2, "loading then the result, nothing else");
    }

    #[tokio::test]
    async fn test_empty_required_input_makes_no_request() {
        let registry = FeatureRegistry::standard(&ApiKeys::default());
        let weather = registry.get("weather").unwrap();
        let http = Arc::new(ScriptedHttp::always(json("{}")));
        let d = dispatcher(http.clone());

        let report = d.dispatch(weather, &FeatureInput::single("   ")).await;

        assert_eq!(report, DispatchReport::new(DispatchOutcome::Rejected, 0));
        assert_eq!(http.calls(), 0);
        assert_eq!(
            d.board().read("weather"),
            Some(RenderResult::error("Please enter a city name."))
        );
    }

    #[tokio::test]
    async fn test_punctuation_only_city_is_rejected_without_loading() {
        let registry = FeatureRegistry::standard(&ApiKeys::default());
        let weather = registry.get("weather").unwrap();
        let http = Arc::new(ScriptedHttp::always(json("{}")));
        let (board, mut rx) = OutputBoard::with_updates();
        let d = FetchDispatcher::new(http.clone(), board);

        let report = d.dispatch(weather, &FeatureInput::single("!!!")).await;

        assert_eq!(report, DispatchReport::new(DispatchOutcome::Rejected, 0));
        assert_eq!(http.calls(), 0);
        assert!(matches!(
            rx.try_recv(),
            Ok(crate::application::output_board::BoardUpdate::Region { content: RenderResult::Error(ref m), .. })
                if m == "Please enter a city name."
        ));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_star_wars_exhaustion_uses_exhausted_message() {
        let registry = FeatureRegistry::standard(&ApiKeys::default());
        let star_wars = registry.get("star-wars").unwrap();
        let http = Arc::new(ScriptedHttp::always(status(404)));
        let d = dispatcher(http.clone());

        let report = d.dispatch(star_wars, &FeatureInput::empty()).await;

        assert_eq!(report.outcome, DispatchOutcome::Exhausted);
        assert_eq!(http.calls(), 5);
        let rendered = d.board().read("star-wars").unwrap();
        assert_ne!(rendered, RenderResult::error(star_wars.error_message));
        assert_eq!(
            rendered,
            RenderResult::error(
                "Error: Could not fetch character data after multiple attempts. Please try again later."
            )
        );
    }

    #[tokio::test]
    async fn test_later_dispatch_overwrites_region() {
        let http = Arc::new(ScriptedHttp::new(vec![status(500)]).with_fallback(json("{}")));
        let d = dispatcher(http);
        let sample = spec(RetryPolicy::None);

        d.dispatch(&sample, &FeatureInput::empty()).await;
        assert!(matches!(d.board().read("sample"), Some(RenderResult::Error(_))));
        d.dispatch(&sample, &FeatureInput::empty()).await;
        assert_eq!(d.board().read("sample"), Some(RenderResult::headline("ok")));
    }

    #[tokio::test]
    async fn test_exclusive_feature_rejects_overlap() {
        let sample = spec(RetryPolicy::None).exclusive();
        let d = dispatcher(Arc::new(ScriptedHttp::always(json("{}"))));

        let held = d.claim(&sample).unwrap();
        assert!(held.is_some());
        let report = d.dispatch(&sample, &FeatureInput::empty()).await;
        assert_eq!(report, DispatchReport::new(DispatchOutcome::Busy, 0));

        drop(held);
        let report = d.dispatch(&sample, &FeatureInput::empty()).await;
        assert_eq!(report.outcome, DispatchOutcome::Rendered);
    }

    #[tokio::test]
    async fn test_validation_runs_before_loading() {
        let sample = spec(RetryPolicy::None).with_input(InputRule::Number("Enter a valid amount."));
        let (board, mut rx) = OutputBoard::with_updates();
        let d = FetchDispatcher::new(Arc::new(ScriptedHttp::always(json("{}"))), board);

        d.dispatch(&sample, &FeatureInput::single("abc")).await;

        assert!(matches!(
            rx.try_recv(),
            Ok(crate::application::output_board::BoardUpdate::Region { content: RenderResult::Error(_), .. })
        ));
        assert!(rx.try_recv().is_err());
    }
}
