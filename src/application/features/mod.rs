// Feature catalog - one declarative spec per user action
pub mod animals;
pub mod jokes;
pub mod lookups;
pub mod media;
pub mod trivia;
pub mod world;

use crate::application::http_source::{get_checked, get_json, FetchError, HttpRequest, HttpSource};
use crate::domain::fetch::{FeatureInput, InputRule, Payload, PayloadKind, RetryPolicy};
use crate::domain::panel::Panel;
use crate::domain::render::RenderResult;
use crate::domain::saved::SavedListKind;
use crate::infrastructure::config::ApiKeys;
use async_trait::async_trait;
use rand::seq::IndexedRandom;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One attempt at producing a result. Retrying is the dispatcher's job.
#[async_trait]
pub trait FeatureAction: Send + Sync {
    async fn attempt(
        &self,
        http: &dyn HttpSource,
        input: &FeatureInput,
    ) -> Result<RenderResult, FetchError>;
}

type UrlFn = Box<dyn Fn(&FeatureInput) -> String + Send + Sync>;
type RenderFn = fn(Payload, &FeatureInput) -> Result<RenderResult, FetchError>;

/// Single GET whose payload is handed to a render function. The URL is
/// rebuilt on every attempt so random ids are fresh each time.
pub struct Endpoint {
    url: UrlFn,
    payload: PayloadKind,
    accept_json: bool,
    render: RenderFn,
}

impl Endpoint {
    pub fn json<F>(url: F, render: RenderFn) -> Self
    where
        F: Fn(&FeatureInput) -> String + Send + Sync + 'static,
    {
        Self {
            url: Box::new(url),
            payload: PayloadKind::Json,
            accept_json: false,
            render,
        }
    }

    pub fn text<F>(url: F, render: RenderFn) -> Self
    where
        F: Fn(&FeatureInput) -> String + Send + Sync + 'static,
    {
        Self {
            payload: PayloadKind::Text,
            ..Self::json(url, render)
        }
    }

    /// Fixed URL, JSON payload
    pub fn fixed(url: &'static str, render: RenderFn) -> Self {
        Self::json(move |_| url.to_string(), render)
    }

    pub fn accepting_json(mut self) -> Self {
        self.accept_json = true;
        self
    }
}

#[async_trait]
impl FeatureAction for Endpoint {
    async fn attempt(
        &self,
        http: &dyn HttpSource,
        input: &FeatureInput,
    ) -> Result<RenderResult, FetchError> {
        let mut request = HttpRequest::get((self.url)(input));
        if self.accept_json {
            request = request.accepting_json();
        }

        let response = get_checked(http, &request).await?;
        let payload = match self.payload {
            PayloadKind::Json => Payload::Json(
                serde_json::from_str(&response.body).map_err(|e| FetchError::shape(e.to_string()))?,
            ),
            PayloadKind::Text => Payload::Text(response.body),
        };
        (self.render)(payload, input)
    }
}

pub struct FeatureSpec {
    pub name: &'static str,
    /// Panel whose output region this feature writes to
    pub panel: &'static str,
    pub input: InputRule,
    pub policy: RetryPolicy,
    pub error_message: &'static str,
    pub exhausted_message: Option<&'static str>,
    /// Reject a second dispatch while one is still running
    pub exclusive: bool,
    pub saves_to: Option<SavedListKind>,
    action: Arc<dyn FeatureAction>,
}

impl FeatureSpec {
    pub fn new(
        name: &'static str,
        panel: &'static str,
        error_message: &'static str,
        action: impl FeatureAction + 'static,
    ) -> Self {
        Self {
            name,
            panel,
            input: InputRule::None,
            policy: RetryPolicy::None,
            error_message,
            exhausted_message: None,
            exclusive: false,
            saves_to: None,
            action: Arc::new(action),
        }
    }

    pub fn with_input(mut self, rule: InputRule) -> Self {
        self.input = rule;
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_exhausted_message(mut self, message: &'static str) -> Self {
        self.exhausted_message = Some(message);
        self
    }

    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    pub fn saves_to(mut self, kind: SavedListKind) -> Self {
        self.saves_to = Some(kind);
        self
    }

    pub fn action(&self) -> &dyn FeatureAction {
        self.action.as_ref()
    }
}

/// Explicit feature name to spec mapping, built once at startup
pub struct FeatureRegistry {
    features: BTreeMap<&'static str, FeatureSpec>,
}

impl FeatureRegistry {
    pub fn from_specs(specs: Vec<FeatureSpec>) -> Self {
        let features = specs.into_iter().map(|s| (s.name, s)).collect();
        Self { features }
    }

    pub fn standard(keys: &ApiKeys) -> Self {
        let mut specs = Vec::new();
        specs.extend(animals::features());
        specs.extend(jokes::features());
        specs.extend(lookups::features());
        specs.extend(media::features(keys));
        specs.extend(trivia::features());
        specs.extend(world::features());
        Self::from_specs(specs)
    }

    pub fn get(&self, name: &str) -> Option<&FeatureSpec> {
        self.features.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureSpec> {
        self.features.values()
    }

    pub fn for_panel<'a>(&'a self, panel: &'a str) -> impl Iterator<Item = &'a FeatureSpec> {
        self.iter().filter(move |s| s.panel == panel)
    }

    /// The feature whose results feed the `kind` saved list
    pub fn saver_for(&self, kind: SavedListKind) -> Option<&FeatureSpec> {
        self.iter().find(|s| s.saves_to == Some(kind))
    }
}

const PANELS: &[(&str, &str)] = &[
    ("dog", "Dog Images"),
    ("cat", "Cat Images"),
    ("dad-joke", "Dad Joke"),
    ("weather", "Weather"),
    ("currency", "Currency Converter"),
    ("crypto", "Crypto Prices"),
    ("giphy", "GIPHY"),
    ("movies", "Popular Movies"),
    ("github", "GitHub User"),
    ("joke", "Jokes"),
    ("public-api", "Public APIs"),
    ("advice", "Advice"),
    ("nasa", "NASA Picture of the Day"),
    ("trivia", "Trivia"),
    ("custom-trivia", "Custom Trivia"),
    ("number", "Number Fact"),
    ("pokemon", "Pokémon"),
    ("star-wars", "Star Wars Character"),
    ("chuck", "Chuck Norris"),
    ("user", "Random User"),
    ("ip", "IP Geolocation"),
    ("fox", "Random Fox"),
    ("duck", "Random Duck"),
    ("cat-fact", "Cat Fact"),
    ("dog-fact", "Dog Fact"),
    ("food", "Random Food"),
    ("space-fact", "Science Trivia"),
    ("cocktail", "Random Cocktail"),
    ("kanye", "Kanye Quote"),
    ("age", "Age Prediction"),
    ("gender", "Gender Prediction"),
    ("nationalize", "Nationality Prediction"),
    ("superhero", "Superhero"),
    ("meme", "Random Meme"),
    ("fact", "Random Fact"),
    ("animal-fact", "Animal Fact"),
    ("country", "Random Country"),
    ("history", "On This Day"),
    ("book", "Random Book"),
    ("sports-trivia", "Sports Trivia"),
    ("movie-trivia", "Movie Trivia"),
    ("math-fact", "Math Fact"),
    ("cocktail-ingredient", "Cocktail Ingredient"),
    ("emoji", "Random Emoji"),
    ("planet-fact", "Planet Fact"),
];

/// Panels in their default display order
pub fn panel_catalog() -> Vec<Panel> {
    PANELS.iter().map(|(id, title)| Panel::new(id, title)).collect()
}

pub(crate) fn decode<T: DeserializeOwned>(payload: Payload) -> Result<T, FetchError> {
    match payload {
        Payload::Json(value) => {
            serde_json::from_value(value).map_err(|e| FetchError::shape(e.to_string()))
        }
        Payload::Text(_) => Err(FetchError::shape("expected a JSON payload")),
    }
}

pub(crate) async fn fetch_decoded<T: DeserializeOwned>(
    http: &dyn HttpSource,
    request: &HttpRequest,
) -> Result<T, FetchError> {
    decode(Payload::Json(get_json(http, request).await?))
}

pub(crate) fn text_body(payload: Payload) -> Result<String, FetchError> {
    match payload {
        Payload::Text(text) => Ok(text),
        Payload::Json(value) => Ok(value.to_string()),
    }
}

pub(crate) fn pick_random<T>(items: &[T]) -> Result<&T, FetchError> {
    items
        .choose(&mut rand::rng())
        .ok_or_else(|| FetchError::shape("empty list"))
}

pub(crate) fn first<T>(items: &[T]) -> Result<&T, FetchError> {
    items.first().ok_or_else(|| FetchError::shape("empty list"))
}

pub(crate) fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
