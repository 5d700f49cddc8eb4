// Animal images and facts
use super::{decode, encode, first, Endpoint, FeatureSpec};
use crate::application::http_source::FetchError;
use crate::domain::fetch::{FeatureInput, InputRule, Payload};
use crate::domain::render::RenderResult;
use crate::domain::saved::SavedListKind;
use serde::Deserialize;

pub fn features() -> Vec<FeatureSpec> {
    vec![
        FeatureSpec::new(
            "dog",
            "dog",
            "Error fetching dog image.",
            Endpoint::json(dog_url, render_dog),
        )
        .with_input(InputRule::Optional)
        .saves_to(SavedListKind::Dogs),
        FeatureSpec::new(
            "cat",
            "cat",
            "Error fetching cat image.",
            Endpoint::json(cat_url, render_cat),
        )
        .with_input(InputRule::Optional)
        .saves_to(SavedListKind::Cats),
        FeatureSpec::new(
            "fox",
            "fox",
            "Error fetching fox image.",
            Endpoint::fixed("https://randomfox.ca/floof/", render_fox),
        ),
        FeatureSpec::new(
            "duck",
            "duck",
            "Error fetching duck.",
            Endpoint::fixed("https://random-d.uk/api/random", render_duck),
        ),
        FeatureSpec::new(
            "cat-fact",
            "cat-fact",
            "Error fetching cat fact.",
            Endpoint::fixed("https://catfact.ninja/fact", render_cat_fact),
        ),
        FeatureSpec::new(
            "dog-fact",
            "dog-fact",
            "Error fetching dog fact.",
            Endpoint::fixed("https://dogapi.dog/api/v2/facts", render_dog_fact),
        ),
        FeatureSpec::new(
            "animal-fact",
            "animal-fact",
            "Error fetching animal fact.",
            Endpoint::fixed("https://catfact.ninja/fact", render_cat_fact),
        ),
    ]
}

/// Breed is optional; without one any breed is fine
fn dog_url(input: &FeatureInput) -> String {
    match input.first() {
        Some(breed) => format!("https://dog.ceo/api/breed/{}/images/random", encode(breed)),
        None => "https://dog.ceo/api/breeds/image/random".to_string(),
    }
}

fn cat_url(input: &FeatureInput) -> String {
    match input.first() {
        Some(breed_id) => format!(
            "https://api.thecatapi.com/v1/images/search?breed_ids={}",
            encode(breed_id)
        ),
        None => "https://api.thecatapi.com/v1/images/search".to_string(),
    }
}

#[derive(Deserialize)]
struct DogImage {
    message: String,
}

fn render_dog(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let dog: DogImage = decode(payload)?;
    Ok(RenderResult::image(dog.message, "Dog"))
}

#[derive(Deserialize)]
struct CatImage {
    url: String,
}

fn render_cat(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let cats: Vec<CatImage> = decode(payload)?;
    Ok(RenderResult::image(first(&cats)?.url.clone(), "Cat"))
}

#[derive(Deserialize)]
struct FoxImage {
    image: String,
}

fn render_fox(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let fox: FoxImage = decode(payload)?;
    Ok(RenderResult::image(fox.image, "Fox"))
}

#[derive(Deserialize)]
struct DuckImage {
    url: String,
}

fn render_duck(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let duck: DuckImage = decode(payload)?;
    Ok(RenderResult::image(duck.url, "Duck"))
}

#[derive(Deserialize)]
struct CatFact {
    fact: String,
}

fn render_cat_fact(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let fact: CatFact = decode(payload)?;
    Ok(RenderResult::headline(fact.fact))
}

#[derive(Deserialize)]
struct DogFacts {
    data: Vec<DogFact>,
}

#[derive(Deserialize)]
struct DogFact {
    attributes: DogFactAttributes,
}

#[derive(Deserialize)]
struct DogFactAttributes {
    body: String,
}

fn render_dog_fact(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let facts: DogFacts = decode(payload)?;
    Ok(RenderResult::headline(first(&facts.data)?.attributes.body.clone()))
}
