use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Where feed files are read from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Local directory laid out as `<city>/latest_full_data.json` etc.
    Dir(PathBuf),
    /// Base URL serving the same layout.
    Url(String),
}

/// Which feeds to load on the next fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FeedSelection {
    #[serde(default = "enabled")]
    pub primary: bool,
    #[serde(default = "enabled")]
    pub secondary: bool,
}

impl Default for FeedSelection {
    fn default() -> Self {
        Self { primary: true, secondary: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CityConfig {
    pub slug: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Initial map center as `[latitude, longitude]`.
    pub center: [f64; 2],
    #[serde(default = "default_secondary_file")]
    pub secondary_file: String,
}

impl CityConfig {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.slug)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub data_source: DataSource,
    pub default_city: String,
    pub cities: Vec<CityConfig>,
    #[serde(default)]
    pub feeds: FeedSelection,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl AppConfig {
    pub fn city(&self, slug: &str) -> Result<&CityConfig, ConfigError> {
        self.cities
            .iter()
            .find(|c| c.slug == slug)
            .ok_or_else(|| ConfigError::UnknownCity(slug.to_string()))
    }
}

fn enabled() -> bool {
    true
}

fn default_secondary_file() -> String {
    "processed_thefork_data.json".to_string()
}

fn default_refresh_interval() -> u64 {
    300
}

fn default_request_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("dealmap/", env!("CARGO_PKG_VERSION")).to_string()
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    if config.cities.is_empty() {
        return Err(ConfigError::Invalid("no cities configured".into()));
    }
    config.city(&config.default_city)?;
    Ok(config)
}
