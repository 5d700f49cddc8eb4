// Media feeds - GIFs, movies, NASA, memes, people and heroes
use super::{decode, encode, first, pick_random, Endpoint, FeatureSpec};
use crate::application::http_source::FetchError;
use crate::domain::fetch::{FeatureInput, InputRule, Payload};
use crate::domain::render::{Card, RenderResult};
use crate::infrastructure::config::{expand_template, ApiKeys};
use serde::Deserialize;
use std::collections::HashMap;

const GIPHY_TRENDING: &str =
    "https://api.giphy.com/v1/gifs/trending?api_key=${giphy}&limit=5&rating=pg";
const GIPHY_SEARCH: &str =
    "https://api.giphy.com/v1/gifs/search?api_key=${giphy}&q=${query}&limit=5&rating=pg";
const TMDB_POPULAR: &str =
    "https://api.themoviedb.org/3/movie/popular?api_key=${tmdb}&language=en-US&page=${page}";
const NASA_APOD: &str = "https://api.nasa.gov/planetary/apod?api_key=${nasa}";
const TMDB_POSTER_BASE: &str = "https://image.tmdb.org/t/p/w200";
const MOVIES_SHOWN: usize = 3;
const APOD_EXCERPT_CHARS: usize = 100;

pub fn features(keys: &ApiKeys) -> Vec<FeatureSpec> {
    let vars = keys.template_vars();

    let trending_url = expand_template(GIPHY_TRENDING, &vars);
    let search_vars = vars.clone();
    let movie_vars = vars.clone();
    let nasa_url = expand_template(NASA_APOD, &vars);

    vec![
        FeatureSpec::new(
            "giphy-trending",
            "giphy",
            "Error fetching trending GIFs.",
            Endpoint::json(move |_| trending_url.clone(), render_trending),
        ),
        FeatureSpec::new(
            "giphy-search",
            "giphy",
            "Failed to fetch GIFs.",
            Endpoint::json(
                move |input| {
                    let mut vars = search_vars.clone();
                    vars.insert("query".to_string(), encode(input.first().unwrap_or_default()));
                    expand_template(GIPHY_SEARCH, &vars)
                },
                render_search,
            ),
        )
        .with_input(InputRule::Required("Please enter a search term for GIFs.")),
        FeatureSpec::new(
            "movies",
            "movies",
            "Error fetching movies.",
            Endpoint::json(
                move |input| {
                    let mut vars = movie_vars.clone();
                    vars.insert("page".to_string(), movie_page(input).to_string());
                    expand_template(TMDB_POPULAR, &vars)
                },
                render_movies,
            ),
        )
        .with_input(InputRule::Optional),
        FeatureSpec::new(
            "nasa",
            "nasa",
            "Error fetching NASA APOD.",
            Endpoint::json(move |_| nasa_url.clone(), render_apod),
        ),
        FeatureSpec::new(
            "meme",
            "meme",
            "Error fetching meme.",
            Endpoint::fixed("https://meme-api.com/gimme", render_meme),
        ),
        FeatureSpec::new(
            "emoji",
            "emoji",
            "Error fetching emoji.",
            Endpoint::fixed("https://api.github.com/emojis", render_emoji),
        ),
        FeatureSpec::new(
            "user",
            "user",
            "Error fetching user.",
            Endpoint::fixed("https://randomuser.me/api/", render_user),
        ),
        FeatureSpec::new(
            "superhero",
            "superhero",
            "Error fetching superhero.",
            Endpoint::fixed("https://akabab.github.io/superhero-api/api/all.json", render_superhero),
        ),
    ]
}

/// Page requested by the first value; anything unusable means page 1
pub fn movie_page(input: &FeatureInput) -> u32 {
    input
        .first()
        .and_then(|p| p.parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

#[derive(Deserialize)]
struct GifList {
    #[serde(default)]
    data: Vec<Gif>,
}

#[derive(Deserialize)]
struct Gif {
    #[serde(default)]
    title: String,
    images: GifImages,
}

#[derive(Deserialize)]
struct GifImages {
    fixed_height: GifRendition,
}

#[derive(Deserialize)]
struct GifRendition {
    url: String,
}

fn gif_cards(gifs: Vec<Gif>) -> RenderResult {
    RenderResult::Cards(
        gifs.into_iter()
            .map(|gif| {
                let title = if gif.title.is_empty() { "GIF".to_string() } else { gif.title };
                Card::new(title).with_image(gif.images.fixed_height.url)
            })
            .collect(),
    )
}

fn render_trending(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let list: GifList = decode(payload)?;
    if list.data.is_empty() {
        return Ok(RenderResult::message("No trending GIFs found."));
    }
    Ok(gif_cards(list.data))
}

fn render_search(payload: Payload, input: &FeatureInput) -> Result<RenderResult, FetchError> {
    let list: GifList = decode(payload)?;
    if list.data.is_empty() {
        return Ok(RenderResult::message(format!(
            "No GIFs found for \"{}\".",
            input.first().unwrap_or_default()
        )));
    }
    Ok(gif_cards(list.data))
}

#[derive(Deserialize)]
struct MoviePage {
    results: Vec<Movie>,
}

#[derive(Deserialize)]
struct Movie {
    title: String,
    poster_path: Option<String>,
}

fn render_movies(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let page: MoviePage = decode(payload)?;
    let cards = page
        .results
        .into_iter()
        .take(MOVIES_SHOWN)
        .map(|movie| {
            let card = Card::new(movie.title);
            match movie.poster_path {
                Some(path) => card.with_image(format!("{}{}", TMDB_POSTER_BASE, path)),
                None => card,
            }
        })
        .collect();
    Ok(RenderResult::Cards(cards))
}

#[derive(Deserialize)]
struct Apod {
    title: String,
    url: String,
    explanation: String,
}

fn render_apod(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let apod: Apod = decode(payload)?;
    let excerpt: String = apod.explanation.chars().take(APOD_EXCERPT_CHARS).collect();
    Ok(RenderResult::Image {
        url: apod.url,
        alt: "NASA APOD".to_string(),
        heading: Some(apod.title),
        lines: vec![format!("{}...", excerpt)],
    })
}

#[derive(Deserialize)]
struct Meme {
    title: String,
    subreddit: String,
    url: String,
}

fn render_meme(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let meme: Meme = decode(payload)?;
    Ok(RenderResult::Image {
        url: meme.url,
        alt: "Meme".to_string(),
        heading: Some(meme.title),
        lines: vec![format!("r/{}", meme.subreddit)],
    })
}

fn render_emoji(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let emojis: HashMap<String, String> = decode(payload)?;
    let mut names: Vec<&String> = emojis.keys().collect();
    names.sort();
    let name = *pick_random(&names)?;
    Ok(RenderResult::Image {
        url: emojis[name].clone(),
        alt: name.clone(),
        heading: Some(name.clone()),
        lines: Vec::new(),
    })
}

#[derive(Deserialize)]
struct RandomUsers {
    results: Vec<RandomUser>,
}

#[derive(Deserialize)]
struct RandomUser {
    picture: UserPicture,
    name: UserName,
    email: String,
    location: UserLocation,
}

#[derive(Deserialize)]
struct UserPicture {
    large: String,
}

#[derive(Deserialize)]
struct UserName {
    first: String,
    last: String,
}

#[derive(Deserialize)]
struct UserLocation {
    city: String,
    country: String,
}

fn render_user(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let users: RandomUsers = decode(payload)?;
    let u = first(&users.results)?;
    Ok(RenderResult::Image {
        url: u.picture.large.clone(),
        alt: "User".to_string(),
        heading: Some(format!("{} {}", u.name.first, u.name.last)),
        lines: vec![
            u.email.clone(),
            format!("{}, {}", u.location.city, u.location.country),
        ],
    })
}

#[derive(Deserialize)]
struct Superhero {
    name: String,
    powerstats: PowerStats,
    images: HeroImages,
}

#[derive(Deserialize)]
struct PowerStats {
    power: i64,
}

#[derive(Deserialize)]
struct HeroImages {
    sm: String,
}

fn render_superhero(payload: Payload, _: &FeatureInput) -> Result<RenderResult, FetchError> {
    let heroes: Vec<Superhero> = decode(payload)?;
    let hero = pick_random(&heroes)?;
    Ok(RenderResult::Image {
        url: hero.images.sm.clone(),
        alt: "Superhero".to_string(),
        heading: Some(hero.name.clone()),
        lines: vec![format!("Power: {}", hero.powerstats.power)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::features::FeatureRegistry;
    use crate::application::http_source::testing::{json, ScriptedHttp};
    use serde_json::json;

    fn keys() -> ApiKeys {
        ApiKeys {
            giphy: "gk".to_string(),
            tmdb: "tk".to_string(),
            nasa: "nk".to_string(),
        }
    }

    #[tokio::test]
    async fn test_api_keys_and_input_land_in_urls() {
        let registry = FeatureRegistry::from_specs(features(&keys()));
        let http = ScriptedHttp::always(json(r#"{"data":[]}"#));

        let search = registry.get("giphy-search").unwrap();
        search
            .action()
            .attempt(&http, &FeatureInput::single("happy cat"))
            .await
            .unwrap();
        let trending = registry.get("giphy-trending").unwrap();
        trending.action().attempt(&http, &FeatureInput::empty()).await.unwrap();

        let urls = http.urls();
        assert_eq!(
            urls[0],
            "https://api.giphy.com/v1/gifs/search?api_key=gk&q=happy%20cat&limit=5&rating=pg"
        );
        assert_eq!(
            urls[1],
            "https://api.giphy.com/v1/gifs/trending?api_key=gk&limit=5&rating=pg"
        );
    }

    #[test]
    fn test_movie_page_defaults_to_one() {
        assert_eq!(movie_page(&FeatureInput::empty()), 1);
        assert_eq!(movie_page(&FeatureInput::single("0")), 1);
        assert_eq!(movie_page(&FeatureInput::single("4")), 4);
    }

    #[test]
    fn test_movies_show_top_three() {
        let payload = Payload::Json(json!({
            "page": 1,
            "results": [
                { "title": "A", "poster_path": "/a.jpg" },
                { "title": "B", "poster_path": null },
                { "title": "C", "poster_path": "/c.jpg" },
                { "title": "D", "poster_path": "/d.jpg" }
            ]
        }));
        let RenderResult::Cards(cards) = render_movies(payload, &FeatureInput::empty()).unwrap() else {
            panic!("expected cards");
        };
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].image_url.as_deref(), Some("https://image.tmdb.org/t/p/w200/a.jpg"));
        assert_eq!(cards[1].image_url, None);
    }

    #[test]
    fn test_empty_search_names_the_query() {
        let payload = Payload::Json(json!({ "data": [] }));
        assert_eq!(
            render_search(payload, &FeatureInput::single("zzz")),
            Ok(RenderResult::message("No GIFs found for \"zzz\"."))
        );
    }

    #[test]
    fn test_untitled_gif_gets_placeholder_title() {
        let payload = Payload::Json(json!({
            "data": [{ "title": "", "images": { "fixed_height": { "url": "https://g/1.gif" } } }]
        }));
        assert_eq!(
            render_trending(payload, &FeatureInput::empty()),
            Ok(RenderResult::Cards(vec![Card::new("GIF").with_image("https://g/1.gif")]))
        );
    }

    #[test]
    fn test_apod_excerpt_is_truncated() {
        let payload = Payload::Json(json!({
            "title": "Stars",
            "url": "https://apod/x.jpg",
            "explanation": "x".repeat(300)
        }));
        let RenderResult::Image { lines, .. } = render_apod(payload, &FeatureInput::empty()).unwrap() else {
            panic!("expected image");
        };
        assert_eq!(lines[0].len(), APOD_EXCERPT_CHARS + 3);
    }
}
