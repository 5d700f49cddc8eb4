// Jokes, quotes, advice and short facts
use super::{decode, encode, pick_random, text_body, Endpoint, FeatureAction, FeatureSpec};
use crate::application::http_source::{FetchError, HttpSource};
use crate::domain::fetch::{FeatureInput, InputRule, Payload};
use crate::domain::render::RenderResult;
use crate::domain::saved::SavedListKind;
use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;

pub fn features() -> Vec<FeatureSpec> {
    vec![
        FeatureSpec::new(
            "dad-joke",
            "dad-joke",
            "Error fetching dad joke.",
            Endpoint::fixed("https://icanhazdadjoke.com/", render_dad_joke).accepting_json(),
        ),
        FeatureSpec::new(
            "joke",
            "joke",
            "Error fetching joke.",
            Endpoint::json(joke_url, render_joke),
        )
        .with_input(InputRule::Optional)
        .saves_to(SavedListKind::Jokes),
        FeatureSpec::new(
            "chuck",
            "chuck",
            "Error fetching Chuck Norris joke.",
            Endpoint::fixed("https://api.chucknorris.io/jokes/random", render_chuck),
        ),
        FeatureSpec::new(
            "kanye",
            "kanye",
            "Error fetching Kanye quote.",
            Endpoint::fixed("https://api.kanye.rest/", render_kanye),
        ),
        FeatureSpec::new(
            "advice",
            "advice",
            "Error fetching advice.",
            Endpoint::fixed("https://api.adviceslip.com/advice", render_advice),
        ),
        FeatureSpec::new(
            "fact",
            "fact",
            "Error fetching fact.",
            Endpoint::fixed("https://uselessfacts.jsph.pl/random.json?language=en", render_fact),
        ),
        FeatureSpec::new(
            "number",
            "number",
            "Error fetching number fact.",
            Endpoint::text(number_url, render_plain),
        )
        .with_input(InputRule::Optional),
        FeatureSpec::new(
            "math-fact",
            "math-fact",
            "Error fetching math fact.",
            Endpoint::text(math_url, render_plain),
        ),
        FeatureSpec::new("public-api", "public-api", "Error fetching public API.", PublicApiPick),
    ]
}

#[derive(Deserialize)]
struct DadJoke {
    joke: String,
}

fn render_dad_joke(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let joke: DadJoke = decode(payload)?;
    Ok(RenderResult::headline(joke.joke))
}

fn joke_url(input: &FeatureInput) -> String {
    let category = input.first().unwrap_or("Any");
    format!("https://v2.jokeapi.dev/joke/{}?type=single", encode(category))
}

#[derive(Deserialize)]
struct Joke {
    joke: Option<String>,
    setup: Option<String>,
    delivery: Option<String>,
}

/// Single jokes are one line, two-part jokes show setup then delivery
fn render_joke(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let joke: Joke = decode(payload)?;
    match joke {
        Joke { joke: Some(text), .. } => Ok(RenderResult::headline(text)),
        Joke {
            setup: Some(setup),
            delivery: Some(delivery),
            ..
        } => Ok(RenderResult::text(None, vec![setup, delivery])),
        _ => Err(FetchError::shape("joke has neither text nor setup/delivery")),
    }
}

#[derive(Deserialize)]
struct ChuckJoke {
    value: String,
}

fn render_chuck(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let joke: ChuckJoke = decode(payload)?;
    Ok(RenderResult::headline(joke.value))
}

#[derive(Deserialize)]
struct KanyeQuote {
    quote: String,
}

fn render_kanye(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let quote: KanyeQuote = decode(payload)?;
    Ok(RenderResult::headline(format!("\"{}\"", quote.quote)))
}

#[derive(Deserialize)]
struct AdviceSlip {
    slip: Advice,
}

#[derive(Deserialize)]
struct Advice {
    advice: String,
}

fn render_advice(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let slip: AdviceSlip = decode(payload)?;
    Ok(RenderResult::headline(slip.slip.advice))
}

#[derive(Deserialize)]
struct UselessFact {
    text: String,
}

fn render_fact(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let fact: UselessFact = decode(payload)?;
    Ok(RenderResult::headline(fact.text))
}

fn number_url(input: &FeatureInput) -> String {
    match input.first() {
        Some(number) => format!("http://numbersapi.com/{}", encode(number)),
        None => "http://numbersapi.com/random/trivia".to_string(),
    }
}

fn math_url(_: &FeatureInput) -> String {
    let number = rand::rng().random_range(1..=100);
    format!("http://numbersapi.com/{}/math", number)
}

fn render_plain(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let text = text_body(payload)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(FetchError::Empty);
    }
    Ok(RenderResult::headline(text))
}

struct PublicApi {
    name: &'static str,
    description: &'static str,
    link: &'static str,
}

const PUBLIC_APIS: &[PublicApi] = &[
    PublicApi {
        name: "JSONPlaceholder",
        description: "Fake REST API for testing",
        link: "https://jsonplaceholder.typicode.com",
    },
    PublicApi {
        name: "GitHub API",
        description: "REST API for GitHub",
        link: "https://api.github.com",
    },
    PublicApi {
        name: "OpenWeatherMap",
        description: "Weather API",
        link: "https://openweathermap.org/api",
    },
    PublicApi {
        name: "The Movie Database",
        description: "Movies and TV shows API",
        link: "https://www.themoviedb.org/documentation/api",
    },
    PublicApi {
        name: "PokéAPI",
        description: "Pokémon data API",
        link: "https://pokeapi.co",
    },
];

/// Picks from a bundled list, no network involved
struct PublicApiPick;

#[async_trait]
impl FeatureAction for PublicApiPick {
    async fn attempt(&self, _: &dyn HttpSource, _: &FeatureInput) -> Result<RenderResult, FetchError> {
        let api = pick_random(PUBLIC_APIS)?;
        Ok(RenderResult::text(
            Some(api.name.to_string()),
            vec![api.description.to_string(), api.link.to_string()],
        ))
    }
}
