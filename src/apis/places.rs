use crate::config::PlacesConfig;
use crate::error::{FinderError, Result};
use crate::infra::http_client::HttpClient;
use crate::types::{PlaceSource, RawRecord, SourceKind};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::AUTHORIZATION;
use tracing::{info, instrument};

static LAT_LONG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(-?\d{1,3}(?:\.\d+)?)\s*(?:,|%2[cC])\s*(-?\d{1,3}(?:\.\d+)?)\s*$")
        .expect("static lat/long regex")
});

/// Normalize a `"lat,long"` pair (the URL-encoded `%2C` separator is accepted too).
pub fn parse_lat_long(lat_long: &str) -> Result<String> {
    let captures = LAT_LONG.captures(lat_long).ok_or_else(|| {
        FinderError::InvalidInput(format!("latLong must look like '<lat>,<long>', got '{}'", lat_long))
    })?;
    Ok(format!("{},{}", &captures[1], &captures[2]))
}

/// Places-search adapter: one GET against the configured endpoint
pub struct PlacesAdapter {
    http: HttpClient,
    endpoint: String,
    api_key: Option<String>,
}

impl PlacesAdapter {
    pub fn new(http: HttpClient, config: &PlacesConfig) -> Self {
        Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait::async_trait]
impl PlaceSource for PlacesAdapter {
    #[instrument(skip(self))]
    async fn search(&self, lat_long: &str, query: &str, limit: u32) -> Result<Vec<RawRecord>> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            FinderError::ConfigurationMissing("places api key (FOURSQUARE_API_KEY)".into())
        })?;
        let ll = parse_lat_long(lat_long)?;
        let limit = limit.to_string();

        let request = self
            .http
            .get(&self.endpoint)
            .header(AUTHORIZATION, api_key)
            .query(&[("query", query), ("ll", ll.as_str()), ("limit", limit.as_str())]);

        let mut body = self.http.get_json(SourceKind::Places, request).await?;
        let results = match body.get_mut("results").map(serde_json::Value::take) {
            Some(serde_json::Value::Array(results)) => results,
            _ => {
                return Err(FinderError::malformed(
                    SourceKind::Places,
                    "expected a 'results' array",
                ))
            }
        };

        info!("Fetched {} places", results.len());
        Ok(results)
    }
}
