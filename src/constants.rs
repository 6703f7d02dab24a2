/// Provider endpoints and defaults shared across adapters and config.

// Places search
pub const PLACES_ENDPOINT: &str = "https://api.foursquare.com/v3/places/search";
pub const PLACES_QUERY: &str = "coffee";
pub const DEFAULT_LAT_LONG: &str = "43.653833032607096,-79.37896808855945";
pub const DEFAULT_PLACES_LIMIT: u32 = 6;

// Image search
pub const IMAGES_ENDPOINT: &str = "https://api.unsplash.com/search/photos";
pub const IMAGES_QUERY: &str = "people";
pub const IMAGES_PER_PAGE: u32 = 30;

// Spreadsheet table
pub const SPREADSHEET_ENDPOINT: &str = "https://api.airtable.com/v0";
pub const ARTIST_TABLE: &str = "street-artist-list";
pub const ARTIST_VIEW: &str = "Grid view";
pub const SPREADSHEET_PAGE_SIZE: u32 = 30;

// REST backend
pub const DEFAULT_REST_BASE_URL: &str = "http://localhost:8000";
pub const REST_ARTIST_PATH: &str = "/api/taipei_artist";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PORT: u16 = 3000;

// Fallback images for items without a usable image
pub const DEFAULT_STORE_IMAGE_URL: &str = "https://images.unsplash.com/photo-1504753793650-d4a2b783c15e?ixid=MnwxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8&ixlib=rb-1.2.1&auto=format&fit=crop&w=2000&q=80";
pub const DEFAULT_ARTIST_IMAGE_URL: &str = "https://images.unsplash.com/photo-1471922694854-ff1b63b20054?ixlib=rb-4.0.3&ixid=MnwxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8&auto=format&fit=crop&w=1172&q=80";

// Environment variable names. The NEXT_PUBLIC_ spellings are accepted as fallbacks.
pub const ENV_CONFIG_PATH: &str = "STREET_FINDER_CONFIG";
pub const ENV_FOURSQUARE_API_KEY: &str = "FOURSQUARE_API_KEY";
pub const ENV_UNSPLASH_ACCESS_KEY: &str = "UNSPLASH_ACCESS_KEY";
pub const ENV_AIRTABLE_API_KEY: &str = "AIRTABLE_API_KEY";
pub const ENV_AIRTABLE_BASE_KEY: &str = "AIRTABLE_BASE_KEY";
pub const ENV_ARTIST_API_BASE_URL: &str = "ARTIST_API_BASE_URL";
pub const ENV_ARTIST_BACKEND: &str = "ARTIST_BACKEND";
pub const ENV_PORT: &str = "PORT";
pub const ENV_PUBLIC_PREFIX: &str = "NEXT_PUBLIC_";

pub const DEFAULT_CONFIG_PATH: &str = "street_finder.toml";
