// Breed pickers for the dog and cat panels, loaded once at startup
use crate::application::features::{capitalize, fetch_decoded};
use crate::application::http_source::{FetchError, HttpRequest, HttpSource};
use serde::Deserialize;
use std::collections::BTreeMap;

const DOG_BREEDS: &str = "https://dog.ceo/api/breeds/list/all";
const CAT_BREEDS: &str = "https://api.thecatapi.com/v1/breeds";
const LOAD_FAILED: &str = "Failed to load breeds";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Value passed as input to the feature; empty means "any"
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreedOptions {
    pub dogs: Vec<SelectOption>,
    pub cats: Vec<SelectOption>,
}

impl BreedOptions {
    pub fn for_panel(&self, panel: &str) -> Option<&[SelectOption]> {
        match panel {
            "dog" => Some(&self.dogs),
            "cat" => Some(&self.cats),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct DogBreeds {
    message: BTreeMap<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct CatBreed {
    id: String,
    name: String,
}

pub struct OptionsService;

impl OptionsService {
    /// Both lists load concurrently; a failed list collapses to a single
    /// placeholder option and does not affect the other.
    pub async fn load(http: &dyn HttpSource) -> BreedOptions {
        let (dogs, cats) = tokio::join!(Self::dog_breeds(http), Self::cat_breeds(http));
        BreedOptions {
            dogs: Self::or_placeholder("dog", dogs),
            cats: Self::or_placeholder("cat", cats),
        }
    }

    async fn dog_breeds(http: &dyn HttpSource) -> Result<Vec<SelectOption>, FetchError> {
        let breeds: DogBreeds = fetch_decoded(http, &HttpRequest::get(DOG_BREEDS)).await?;
        Ok(breeds
            .message
            .keys()
            .map(|breed| SelectOption::new(breed.as_str(), capitalize(breed)))
            .collect())
    }

    async fn cat_breeds(http: &dyn HttpSource) -> Result<Vec<SelectOption>, FetchError> {
        let breeds: Vec<CatBreed> = fetch_decoded(http, &HttpRequest::get(CAT_BREEDS)).await?;
        Ok(breeds
            .into_iter()
            .map(|b| SelectOption::new(b.id, b.name))
            .collect())
    }

    fn or_placeholder(which: &str, loaded: Result<Vec<SelectOption>, FetchError>) -> Vec<SelectOption> {
        match loaded {
            Ok(options) => {
                tracing::debug!("Loaded {} {} breeds", options.len(), which);
                options
            }
            Err(e) => {
                tracing::warn!("Failed to load {} breeds: {}", which, e);
                vec![SelectOption::new("", LOAD_FAILED)]
            }
        }
    }
}
