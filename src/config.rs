use crate::constants::*;
use crate::error::{FinderError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub places: PlacesConfig,
    pub images: ImagesConfig,
    pub spreadsheet: SpreadsheetConfig,
    pub rest: RestConfig,
    pub http: HttpConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub query: String,
    pub default_lat_long: String,
    pub default_limit: u32,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            endpoint: PLACES_ENDPOINT.to_string(),
            api_key: None,
            query: PLACES_QUERY.to_string(),
            default_lat_long: DEFAULT_LAT_LONG.to_string(),
            default_limit: DEFAULT_PLACES_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    pub endpoint: String,
    pub access_key: Option<String>,
    pub query: String,
    pub per_page: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            endpoint: IMAGES_ENDPOINT.to_string(),
            access_key: None,
            query: IMAGES_QUERY.to_string(),
            per_page: IMAGES_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpreadsheetConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub base_id: Option<String>,
    pub artist_table: String,
    pub view: Option<String>,
    pub page_size: u32,
}

impl Default for SpreadsheetConfig {
    fn default() -> Self {
        Self {
            endpoint: SPREADSHEET_ENDPOINT.to_string(),
            api_key: None,
            base_id: None,
            artist_table: ARTIST_TABLE.to_string(),
            view: Some(ARTIST_VIEW.to_string()),
            page_size: SPREADSHEET_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    pub base_url: String,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REST_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub artist_backend: ArtistBackend,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            artist_backend: ArtistBackend::Rest,
        }
    }
}

/// Which backend serves the artist pathway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtistBackend {
    #[default]
    Rest,
    Spreadsheet,
}

impl FromStr for ArtistBackend {
    type Err = FinderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rest" => Ok(ArtistBackend::Rest),
            "spreadsheet" | "airtable" => Ok(ArtistBackend::Spreadsheet),
            other => Err(FinderError::Config(format!(
                "Unknown artist backend '{}', expected 'rest' or 'spreadsheet'",
                other
            ))),
        }
    }
}

impl Config {
    /// Load the config file (if present) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var(ENV_CONFIG_PATH).ok();
        let mut config = Self::load_file(explicit.as_deref())?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// An explicitly named file must exist; the default file is optional.
    pub fn load_file(explicit_path: Option<&str>) -> Result<Self> {
        match explicit_path {
            Some(path) if !Path::new(path).exists() => Err(FinderError::Config(format!(
                "{} points at '{}', which does not exist",
                ENV_CONFIG_PATH, path
            ))),
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            FinderError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Overlay values from an environment lookup. Each key is also tried with
    /// the `NEXT_PUBLIC_` prefix; empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .or_else(|| lookup(&format!("{ENV_PUBLIC_PREFIX}{key}")))
                .filter(|v| !v.trim().is_empty())
        };

        if let Some(v) = get(ENV_FOURSQUARE_API_KEY) {
            self.places.api_key = Some(v);
        }
        if let Some(v) = get(ENV_UNSPLASH_ACCESS_KEY) {
            self.images.access_key = Some(v);
        }
        if let Some(v) = get(ENV_AIRTABLE_API_KEY) {
            self.spreadsheet.api_key = Some(v);
        }
        if let Some(v) = get(ENV_AIRTABLE_BASE_KEY) {
            self.spreadsheet.base_id = Some(v);
        }
        if let Some(v) = get(ENV_ARTIST_API_BASE_URL) {
            self.rest.base_url = v;
        }
        if let Some(v) = get(ENV_ARTIST_BACKEND) {
            self.server.artist_backend = v.parse()?;
        }
        if let Some(v) = get(ENV_PORT) {
            self.server.port = v
                .parse()
                .map_err(|e| FinderError::Config(format!("Invalid {}='{}': {}", ENV_PORT, v, e)))?;
        }
        Ok(())
    }

    /// False only when every places/images/spreadsheet key is absent, in which
    /// case the home page falls back to the problem page instead of fetching.
    pub fn has_any_location_keys(&self) -> bool {
        self.places.api_key.is_some()
            || self.images.access_key.is_some()
            || self.spreadsheet.api_key.is_some()
            || self.spreadsheet.base_id.is_some()
    }
}
