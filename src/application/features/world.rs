// Food, drinks, places, books, history and the solar system
use super::{decode, first, pick_random, Endpoint, FeatureSpec};
use crate::application::http_source::FetchError;
use crate::domain::fetch::{FeatureInput, Payload};
use crate::domain::render::RenderResult;
use serde::Deserialize;
use serde_json::{Map, Value};

const COCKTAIL_RANDOM: &str = "https://www.thecocktaildb.com/api/json/v1/1/random.php";
const MAX_INGREDIENTS: usize = 15;

pub fn features() -> Vec<FeatureSpec> {
    vec![
        FeatureSpec::new(
            "food",
            "food",
            "Error fetching food.",
            Endpoint::fixed("https://www.themealdb.com/api/json/v1/1/random.php", render_meal),
        ),
        FeatureSpec::new(
            "cocktail",
            "cocktail",
            "Error fetching cocktail.",
            Endpoint::fixed(COCKTAIL_RANDOM, render_cocktail),
        ),
        FeatureSpec::new(
            "cocktail-ingredient",
            "cocktail-ingredient",
            "Error fetching cocktail ingredient.",
            Endpoint::fixed(COCKTAIL_RANDOM, render_ingredient),
        ),
        FeatureSpec::new(
            "country",
            "country",
            "Error fetching country.",
            Endpoint::fixed(
                "https://restcountries.com/v3.1/all?fields=name,capital,flags",
                render_country,
            ),
        ),
        FeatureSpec::new(
            "history",
            "history",
            "Error fetching historical event.",
            Endpoint::fixed("https://history.muffinlabs.com/date", render_history),
        ),
        FeatureSpec::new(
            "book",
            "book",
            "Error fetching book.",
            Endpoint::fixed(
                "https://openlibrary.org/search.json?q=subject:fiction&limit=10",
                render_book,
            ),
        ),
        FeatureSpec::new(
            "planet-fact",
            "planet-fact",
            "Error fetching Planet fact.",
            Endpoint::fixed("https://api.le-systeme-solaire.net/rest/bodies/", render_planet),
        ),
    ]
}

#[derive(Deserialize)]
struct Meals {
    meals: Vec<Meal>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Meal {
    str_meal: String,
    str_meal_thumb: String,
}

fn render_meal(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let meals: Meals = decode(payload)?;
    let meal = first(&meals.meals)?;
    Ok(RenderResult::Image {
        url: meal.str_meal_thumb.clone(),
        alt: meal.str_meal.clone(),
        heading: Some(meal.str_meal.clone()),
        lines: Vec::new(),
    })
}

/// Drinks carry numbered ingredient columns, so they stay as raw maps
#[derive(Deserialize)]
struct Drinks {
    drinks: Vec<Map<String, Value>>,
}

fn drink_field<'a>(drink: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    drink.get(key).and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty())
}

fn render_cocktail(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let drinks: Drinks = decode(payload)?;
    let drink = first(&drinks.drinks)?;
    let name = drink_field(drink, "strDrink").ok_or_else(|| FetchError::shape("drink without name"))?;
    let thumb = drink_field(drink, "strDrinkThumb").ok_or_else(|| FetchError::shape("drink without image"))?;
    Ok(RenderResult::Image {
        url: thumb.to_string(),
        alt: name.to_string(),
        heading: Some(name.to_string()),
        lines: Vec::new(),
    })
}

fn render_ingredient(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let drinks: Drinks = decode(payload)?;
    let drink = first(&drinks.drinks)?;
    let ingredients: Vec<&str> = (1..=MAX_INGREDIENTS)
        .filter_map(|i| drink_field(drink, &format!("strIngredient{}", i)))
        .collect();
    Ok(RenderResult::headline(*pick_random(&ingredients)?))
}

#[derive(Deserialize)]
struct Country {
    name: CountryName,
    #[serde(default)]
    capital: Vec<String>,
    flags: Flags,
}

#[derive(Deserialize)]
struct CountryName {
    common: String,
}

#[derive(Deserialize)]
struct Flags {
    png: String,
}

fn render_country(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let countries: Vec<Country> = decode(payload)?;
    let country = pick_random(&countries)?;
    Ok(RenderResult::Image {
        url: country.flags.png.clone(),
        alt: format!("Flag of {}", country.name.common),
        heading: Some(country.name.common.clone()),
        lines: vec![format!(
            "Capital: {}",
            country.capital.first().map(String::as_str).unwrap_or("N/A")
        )],
    })
}

#[derive(Deserialize)]
struct HistoryDay {
    data: HistoryData,
}

#[derive(Deserialize)]
struct HistoryData {
    #[serde(rename = "Events")]
    events: Vec<HistoryEvent>,
}

#[derive(Deserialize)]
struct HistoryEvent {
    year: String,
    text: String,
}

fn render_history(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let day: HistoryDay = decode(payload)?;
    let event = pick_random(&day.data.events)?;
    Ok(RenderResult::text(Some(event.year.clone()), vec![event.text.clone()]))
}

#[derive(Deserialize)]
struct BookSearch {
    docs: Vec<Book>,
}

#[derive(Deserialize)]
struct Book {
    title: String,
    #[serde(default)]
    author_name: Vec<String>,
}

fn render_book(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let search: BookSearch = decode(payload)?;
    let book = pick_random(&search.docs)?;
    Ok(RenderResult::text(
        Some(book.title.clone()),
        vec![format!(
            "Author: {}",
            book.author_name.first().map(String::as_str).unwrap_or("Unknown")
        )],
    ))
}

#[derive(Deserialize)]
struct Bodies {
    bodies: Vec<Body>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Body {
    #[serde(default)]
    english_name: String,
    body_type: Option<String>,
    gravity: Option<f64>,
    discovery_date: Option<String>,
    mass: Option<Mass>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Mass {
    mass_value: f64,
    mass_exponent: i32,
}

fn planet_lines(body: &Body) -> Vec<String> {
    let gravity = match body.gravity {
        Some(g) if g != 0.0 => format!("{:.2}", g),
        _ => "N/A".to_string(),
    };
    let discovered = body
        .discovery_date
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or("N/A");
    let mass = match &body.mass {
        Some(m) => format!("{:.2} × 10^{} kg", m.mass_value, m.mass_exponent),
        None => "N/A".to_string(),
    };
    vec![
        format!("Type: {}", body.body_type.as_deref().unwrap_or("Unknown")),
        format!("Gravity: {} m/s²", gravity),
        format!("Discovered: {}", discovered),
        format!("Mass: {}", mass),
    ]
}

fn render_planet(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let bodies: Bodies = decode(payload)?;
    let named: Vec<&Body> = bodies.bodies.iter().filter(|b| !b.english_name.is_empty()).collect();
    let body = *pick_random(&named)?;
    Ok(RenderResult::text(Some(body.english_name.clone()), planet_lines(body)))
}
