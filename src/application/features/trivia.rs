// Trivia family, Pokémon and Star Wars - the retrying features
use super::{decode, encode, fetch_decoded, Endpoint, FeatureAction, FeatureSpec};
use crate::application::http_source::{FetchError, HttpRequest, HttpSource};
use crate::domain::fetch::{FeatureInput, InputRule, Payload, RetryPolicy};
use crate::domain::render::RenderResult;
use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;

const OPENTDB: &str = "https://opentdb.com/api.php?amount=1";
const POKEMON_MAX_ID: u32 = 1010;
const SWAPI_MAX_ID: u32 = 83;
/// Five lookups in total: the first try plus four retries
const STAR_WARS_RETRIES: u32 = 4;

pub fn features() -> Vec<FeatureSpec> {
    vec![
        FeatureSpec::new(
            "trivia",
            "trivia",
            "Error fetching trivia.",
            Endpoint::fixed(OPENTDB, render_question),
        )
        .with_policy(RetryPolicy::UntilSuccess),
        FeatureSpec::new(
            "custom-trivia",
            "custom-trivia",
            "Error fetching trivia.",
            Endpoint::json(custom_trivia_url, render_question),
        )
        .with_input(InputRule::Optional)
        .with_policy(RetryPolicy::UntilSuccess),
        FeatureSpec::new(
            "space-fact",
            "space-fact",
            "Error fetching science trivia.",
            Endpoint::json(|_| format!("{}&category=17", OPENTDB), render_question),
        )
        .with_policy(RetryPolicy::UntilSuccess),
        FeatureSpec::new(
            "sports-trivia",
            "sports-trivia",
            "Error fetching sports trivia.",
            Endpoint::json(|_| format!("{}&category=21&type=multiple", OPENTDB), render_question),
        )
        .with_policy(RetryPolicy::UntilSuccess)
        .exclusive(),
        FeatureSpec::new(
            "movie-trivia",
            "movie-trivia",
            "Error fetching movie trivia.",
            Endpoint::json(|_| format!("{}&category=11&type=multiple", OPENTDB), render_question),
        )
        .with_policy(RetryPolicy::UntilSuccess)
        .exclusive(),
        FeatureSpec::new(
            "pokemon",
            "pokemon",
            "Error fetching Pokémon.",
            Endpoint::json(pokemon_url, render_pokemon),
        )
        .with_policy(RetryPolicy::UntilSuccess),
        FeatureSpec::new(
            "star-wars",
            "star-wars",
            "Error fetching Star Wars character.",
            StarWarsLookup,
        )
        .with_policy(RetryPolicy::Bounded(STAR_WARS_RETRIES))
        .with_exhausted_message(
            "Error: Could not fetch character data after multiple attempts. Please try again later.",
        ),
    ]
}

/// Input: optional category id, then optional difficulty
fn custom_trivia_url(input: &FeatureInput) -> String {
    let mut url = format!("{}&type=multiple", OPENTDB);
    if let Some(category) = input.first() {
        url.push_str(&format!("&category={}", encode(category)));
    }
    if let Some(difficulty) = input.get(1) {
        url.push_str(&format!("&difficulty={}", encode(&difficulty.to_lowercase())));
    }
    url
}

#[derive(Deserialize)]
struct TriviaResponse {
    #[serde(default)]
    results: Vec<TriviaQuestion>,
}

#[derive(Deserialize)]
struct TriviaQuestion {
    question: String,
    correct_answer: String,
}

/// An empty result set counts as a failed attempt
fn render_question(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let response: TriviaResponse = decode(payload)?;
    let q = response.results.into_iter().next().ok_or(FetchError::Empty)?;
    Ok(RenderResult::text(
        Some(clean_text(&q.question)),
        vec![format!("Answer: {}", clean_text(&q.correct_answer))],
    ))
}

/// Percent-decode when possible, then resolve HTML entities
fn clean_text(raw: &str) -> String {
    let decoded = urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    decode_entities(&decoded)
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let resolved = tail
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| entity(&tail[1..end]).map(|c| (c, end)));
        match resolved {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code);
    }
    let c = match name {
        "amp" => '&',
        "quot" => '"',
        "apos" => '\'',
        "lt" => '<',
        "gt" => '>',
        "nbsp" => '\u{a0}',
        "rsquo" => '\u{2019}',
        "lsquo" => '\u{2018}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "hellip" => '\u{2026}',
        "eacute" => 'é',
        "uuml" => 'ü',
        "ouml" => 'ö',
        "shy" => '\u{ad}',
        _ => return None,
    };
    Some(c)
}

fn pokemon_url(_: &FeatureInput) -> String {
    let id = rand::rng().random_range(1..=POKEMON_MAX_ID);
    format!("https://pokeapi.co/api/v2/pokemon/{}", id)
}

#[derive(Deserialize)]
struct Pokemon {
    name: Option<String>,
    sprites: Option<Sprites>,
}

#[derive(Deserialize)]
struct Sprites {
    front_default: Option<String>,
}

fn render_pokemon(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let pokemon: Pokemon = decode(payload)?;
    let name = pokemon.name.unwrap_or_else(|| "Unknown".to_string());
    match pokemon.sprites.and_then(|s| s.front_default) {
        Some(sprite) => Ok(RenderResult::Image {
            url: sprite,
            alt: name.clone(),
            heading: Some(name),
            lines: Vec::new(),
        }),
        None => Ok(RenderResult::text(Some(name), vec!["No image available.".to_string()])),
    }
}

#[derive(Deserialize)]
struct Character {
    name: Option<String>,
    height: Option<String>,
    mass: Option<String>,
    #[serde(default)]
    species: Vec<String>,
}

#[derive(Deserialize)]
struct Species {
    name: Option<String>,
}

/// Random character id; the id space has gaps, so 404s are expected and
/// retried by the dispatcher. The species lookup is best effort.
struct StarWarsLookup;

impl StarWarsLookup {
    async fn species_name(http: &dyn HttpSource, url: &str) -> String {
        let request = HttpRequest::get(url.replace("http://", "https://"));
        match fetch_decoded::<Species>(http, &request).await {
            Ok(Species { name: Some(name) }) => name,
            Ok(_) => "Unknown".to_string(),
            Err(e) => {
                tracing::warn!("Failed to fetch species data: {}", e);
                "Unknown".to_string()
            }
        }
    }
}

#[async_trait]
impl FeatureAction for StarWarsLookup {
    async fn attempt(&self, http: &dyn HttpSource, _: &FeatureInput) -> Result<RenderResult, FetchError> {
        let id = rand::rng().random_range(1..=SWAPI_MAX_ID);
        let url = format!("https://swapi.py4e.com/api/people/{}/", id);
        let character: Character = fetch_decoded(http, &HttpRequest::get(url)).await?;

        let species = match character.species.first() {
            Some(url) => Self::species_name(http, url).await,
            None => "Unknown".to_string(),
        };
        let or_unknown = |v: Option<String>| v.filter(|s| !s.is_empty()).unwrap_or_else(|| "Unknown".to_string());

        Ok(RenderResult::text(
            Some(or_unknown(character.name)),
            vec![
                format!("Height: {} cm", or_unknown(character.height)),
                format!("Mass: {} kg", or_unknown(character.mass)),
                format!("Species: {}", species),
            ],
        ))
    }
}
