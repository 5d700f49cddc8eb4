use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = "config/dashboard";
const ENV_PREFIX: &str = "DASHBOARD";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub api_keys: ApiKeys,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpSettings {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-request timeout; retries are not time-limited
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_user_agent() -> String {
    format!("api-dashboard/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    15
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageSettings {
    /// State file; the platform data directory is used when unset
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiKeys {
    #[serde(default)]
    pub giphy: String,
    #[serde(default)]
    pub tmdb: String,
    #[serde(default = "default_nasa_key")]
    pub nasa: String,
}

impl Default for ApiKeys {
    fn default() -> Self {
        Self {
            giphy: String::new(),
            tmdb: String::new(),
            nasa: default_nasa_key(),
        }
    }
}

fn default_nasa_key() -> String {
    "DEMO_KEY".to_string()
}

impl ApiKeys {
    /// Variables available to URL templates as `${giphy}`, `${tmdb}`, `${nasa}`
    pub fn template_vars(&self) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert("giphy".to_string(), self.giphy.clone());
        vars.insert("tmdb".to_string(), self.tmdb.clone());
        vars.insert("nasa".to_string(), self.nasa.clone());
        vars
    }
}

/// Layered load: defaults, then the config file, then `DASHBOARD__*` env vars.
/// Without an explicit path the default file is optional.
pub fn load_dashboard_config(path: Option<&Path>) -> anyhow::Result<DashboardConfig> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG).required(false),
    };
    let settings = config::Config::builder()
        .add_source(file)
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace template variables in a URL
pub fn expand_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}
