// Lookups driven by user input - weather, money, names, accounts
use super::{capitalize, decode, encode, fetch_decoded, Endpoint, FeatureAction, FeatureSpec};
use crate::application::http_source::{FetchError, HttpRequest, HttpSource};
use crate::domain::fetch::{place_name, FeatureInput, InputRule, Payload};
use crate::domain::render::RenderResult;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

const DEFAULT_CURRENCY: &str = "EUR";
const DEFAULT_COIN: &str = "bitcoin";

pub fn features() -> Vec<FeatureSpec> {
    vec![
        FeatureSpec::new("weather", "weather", "Error fetching weather data.", WeatherLookup)
            .with_input(InputRule::Place("Please enter a city name.")),
        FeatureSpec::new(
            "currency",
            "currency",
            "Error fetching exchange rates.",
            Endpoint::fixed("https://open.er-api.com/v6/latest/USD", render_currency),
        )
        .with_input(InputRule::Number("Enter a valid amount.")),
        FeatureSpec::new(
            "crypto",
            "crypto",
            "Error fetching crypto price.",
            Endpoint::json(crypto_url, render_crypto),
        )
        .with_input(InputRule::Optional),
        FeatureSpec::new(
            "github",
            "github",
            "User not found.",
            Endpoint::json(
                |input| format!("https://api.github.com/users/{}", encode(input.first().unwrap_or_default())),
                render_github,
            ),
        )
        .with_input(InputRule::Required("Enter a username.")),
        FeatureSpec::new(
            "age",
            "age",
            "Error fetching age prediction.",
            Endpoint::json(
                |input| format!("https://api.agify.io?name={}", encode(input.first().unwrap_or_default())),
                render_age,
            ),
        )
        .with_input(InputRule::Required("Enter a name.")),
        FeatureSpec::new(
            "gender",
            "gender",
            "Error fetching gender prediction.",
            Endpoint::json(
                |input| format!("https://api.genderize.io?name={}", encode(input.first().unwrap_or_default())),
                render_gender,
            ),
        )
        .with_input(InputRule::Required("Enter a name.")),
        FeatureSpec::new(
            "nationalize",
            "nationalize",
            "Error fetching nationality prediction.",
            Endpoint::json(
                |input| format!("https://api.nationalize.io?name={}", encode(input.first().unwrap_or_default())),
                render_nationalize,
            ),
        )
        .with_input(InputRule::Required("Enter a name.")),
        FeatureSpec::new(
            "ip",
            "ip",
            "Error fetching IP info.",
            Endpoint::fixed("https://ipapi.co/json/", render_ip),
        ),
    ]
}

#[derive(Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeHit>,
}

#[derive(Deserialize)]
struct GeocodeHit {
    latitude: f64,
    longitude: f64,
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Deserialize)]
struct CurrentWeather {
    temperature: f64,
    windspeed: f64,
}

/// Geocode the city, then fetch current conditions for the first hit
struct WeatherLookup;

#[async_trait]
impl FeatureAction for WeatherLookup {
    async fn attempt(
        &self,
        http: &dyn HttpSource,
        input: &FeatureInput,
    ) -> Result<RenderResult, FetchError> {
        let city = place_name(input.first().unwrap_or_default());

        let geo_url = format!(
            "https://geocoding-api.open-meteo.com/v1/search?name={}",
            encode(city)
        );
        let geo: GeocodeResponse = fetch_decoded(http, &HttpRequest::get(geo_url)).await?;
        let Some(place) = geo.results.first() else {
            return Ok(RenderResult::message(format!(
                "Hmm... I couldn't find \"{}\". Try a nearby major city or check spelling.",
                city
            )));
        };

        let forecast_url = format!(
            "https://api.open-meteo.com/v1/forecast?latitude={}&longitude={}&current_weather=true&temperature_unit=fahrenheit&windspeed_unit=mph",
            place.latitude, place.longitude
        );
        let forecast: ForecastResponse = fetch_decoded(http, &HttpRequest::get(forecast_url)).await?;
        let w = forecast.current_weather;

        Ok(RenderResult::text(
            Some(format!("{}, {}", place.name, place.country)),
            vec![
                format!("Temp: {}°F", w.temperature),
                format!("Wind: {} mph", w.windspeed),
            ],
        ))
    }
}

#[derive(Deserialize)]
struct ExchangeRates {
    rates: HashMap<String, f64>,
}

/// Input: amount, then optional target currency
fn render_currency(payload: Payload, input: &FeatureInput) -> Result<RenderResult, FetchError> {
    let rates: ExchangeRates = decode(payload)?;
    let amount: f64 = input
        .first()
        .and_then(|a| a.parse().ok())
        .ok_or_else(|| FetchError::shape("amount vanished after validation"))?;
    let target = input.get(1).unwrap_or(DEFAULT_CURRENCY).to_uppercase();
    let rate = rates
        .rates
        .get(&target)
        .ok_or_else(|| FetchError::shape(format!("no rate for {}", target)))?;

    Ok(RenderResult::text(
        None,
        vec![format!("{} USD = {:.2} {}", amount, amount * rate, target)],
    ))
}

fn crypto_url(input: &FeatureInput) -> String {
    let coin = input.first().unwrap_or(DEFAULT_COIN).to_lowercase();
    format!(
        "https://api.coingecko.com/api/v3/simple/price?ids={}&vs_currencies=usd",
        encode(&coin)
    )
}

#[derive(Deserialize)]
struct CoinPrice {
    usd: Option<f64>,
}

fn render_crypto(payload: Payload, input: &FeatureInput) -> Result<RenderResult, FetchError> {
    let prices: HashMap<String, CoinPrice> = decode(payload)?;
    let coin = input.first().unwrap_or(DEFAULT_COIN).to_lowercase();
    match prices.get(&coin).and_then(|p| p.usd) {
        Some(price) => Ok(RenderResult::text(
            Some(capitalize(&coin)),
            vec![format!("USD Price: ${}", price)],
        )),
        None => Ok(RenderResult::message("Price not available.")),
    }
}

#[derive(Deserialize)]
struct GithubUser {
    avatar_url: String,
    name: Option<String>,
    public_repos: u64,
}

fn render_github(payload: Payload, input: &FeatureInput) -> Result<RenderResult, FetchError> {
    let user: GithubUser = decode(payload)?;
    Ok(RenderResult::Image {
        url: user.avatar_url,
        alt: input.first().unwrap_or_default().to_string(),
        heading: None,
        lines: vec![
            format!("Name: {}", user.name.as_deref().unwrap_or("N/A")),
            format!("Public Repos: {}", user.public_repos),
        ],
    })
}

#[derive(Deserialize)]
struct AgePrediction {
    age: Option<u32>,
}

fn render_age(payload: Payload, input: &FeatureInput) -> Result<RenderResult, FetchError> {
    let prediction: AgePrediction = decode(payload)?;
    let age = prediction
        .age
        .map(|a| a.to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    Ok(RenderResult::text(
        input.first().map(str::to_string),
        vec![format!("Predicted Age: {}", age)],
    ))
}

#[derive(Deserialize)]
struct GenderPrediction {
    gender: Option<String>,
    probability: Option<f64>,
}

fn render_gender(payload: Payload, input: &FeatureInput) -> Result<RenderResult, FetchError> {
    let prediction: GenderPrediction = decode(payload)?;
    let probability = match prediction.probability {
        Some(p) if p > 0.0 => format!("{:.1}", p * 100.0),
        _ => "N/A".to_string(),
    };
    Ok(RenderResult::text(
        input.first().map(str::to_string),
        vec![format!(
            "Predicted Gender: {} ({}%)",
            prediction.gender.as_deref().unwrap_or("Unknown"),
            probability
        )],
    ))
}

#[derive(Deserialize)]
struct NationalityPrediction {
    #[serde(default)]
    country: Vec<CountryGuess>,
}

#[derive(Deserialize)]
struct CountryGuess {
    country_id: String,
    probability: f64,
}

fn render_nationalize(payload: Payload, input: &FeatureInput) -> Result<RenderResult, FetchError> {
    let prediction: NationalityPrediction = decode(payload)?;
    let line = match prediction.country.first() {
        Some(top) => format!(
            "Predicted Nationality: {} ({:.1}%)",
            top.country_id,
            top.probability * 100.0
        ),
        None => "Predicted Nationality: Unknown".to_string(),
    };
    Ok(RenderResult::text(input.first().map(str::to_string), vec![line]))
}

#[derive(Deserialize)]
struct IpInfo {
    ip: String,
    city: String,
    country_name: String,
}

fn render_ip(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let info: IpInfo = decode(payload)?;
    Ok(RenderResult::text(
        None,
        vec![
            format!("IP: {}", info.ip),
            format!("City: {}", info.city),
            format!("Country: {}", info.country_name),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::http_source::testing::{json, status, ScriptedHttp};
    use serde_json::json;

    #[tokio::test]
    async fn test_weather_geocodes_then_forecasts() {
        let http = ScriptedHttp::new(vec![
            json(r#"{"results":[{"latitude":48.85,"longitude":2.35,"name":"Paris","country":"France"}]}"#),
            json(r#"{"current_weather":{"temperature":61.5,"windspeed":8.0}}"#),
        ]);
        let result = WeatherLookup
            .attempt(&http, &FeatureInput::single("Paris."))
            .await
            .unwrap();

        assert_eq!(
            result,
            RenderResult::text(
                Some("Paris, France".to_string()),
                vec!["Temp: 61.5°F".to_string(), "Wind: 8 mph".to_string()]
            )
        );
        let urls = http.urls();
        assert_eq!(urls[0], "https://geocoding-api.open-meteo.com/v1/search?name=Paris");
        assert!(urls[1].contains("latitude=48.85&longitude=2.35"));
    }

    #[tokio::test]
    async fn test_weather_unknown_city_is_a_message() {
        let http = ScriptedHttp::new(vec![json(r#"{"generationtime_ms":0.1}"#)]);
        let result = WeatherLookup
            .attempt(&http, &FeatureInput::single("Atlantis"))
            .await
            .unwrap();
        assert_eq!(
            result,
            RenderResult::message(
                "Hmm... I couldn't find \"Atlantis\". Try a nearby major city or check spelling."
            )
        );
        assert_eq!(http.calls(), 1);
    }

    #[tokio::test]
    async fn test_weather_forecast_failure_is_an_error() {
        let http = ScriptedHttp::new(vec![
            json(r#"{"results":[{"latitude":1.0,"longitude":2.0,"name":"X"}]}"#),
            status(503),
        ]);
        let err = WeatherLookup
            .attempt(&http, &FeatureInput::single("X"))
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::Status(503));
    }

    #[test]
    fn test_currency_conversion() {
        let payload = Payload::Json(json!({ "result": "success", "rates": { "EUR": 0.5, "GBP": 0.25 } }));
        let input = FeatureInput::new(vec!["10".into(), "gbp".into()]);
        assert_eq!(
            render_currency(payload, &input),
            Ok(RenderResult::text(None, vec!["10 USD = 2.50 GBP".to_string()]))
        );
    }

    #[test]
    fn test_crypto_missing_price() {
        let payload = Payload::Json(json!({}));
        assert_eq!(
            render_crypto(payload, &FeatureInput::single("dogecoin")),
            Ok(RenderResult::message("Price not available."))
        );
    }

    #[test]
    fn test_gender_without_probability() {
        let payload = Payload::Json(json!({ "name": "zz", "gender": null, "probability": 0.0 }));
        assert_eq!(
            render_gender(payload, &FeatureInput::single("zz")),
            Ok(RenderResult::text(
                Some("zz".to_string()),
                vec!["Predicted Gender: Unknown (N/A%)".to_string()]
            ))
        );
    }

    #[test]
    fn test_nationalize_top_guess() {
        let payload = Payload::Json(json!({
            "name": "michael",
            "country": [{ "country_id": "US", "probability": 0.0893 }]
        }));
        assert_eq!(
            render_nationalize(payload, &FeatureInput::single("michael")),
            Ok(RenderResult::text(
                Some("michael".to_string()),
                vec!["Predicted Nationality: US (8.9%)".to_string()]
            ))
        );
    }
}
