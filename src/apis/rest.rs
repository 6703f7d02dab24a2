use crate::config::RestConfig;
use crate::constants::REST_ARTIST_PATH;
use crate::error::{FinderError, Result};
use crate::infra::http_client::HttpClient;
use crate::types::{ArtistSource, RawRecord, SourceKind};
use reqwest::Url;
use serde_json::Value;
use tracing::{info, instrument};

/// REST-backend adapter for the artist API
pub struct RestAdapter {
    http: HttpClient,
    base_url: String,
}

impl RestAdapter {
    pub fn new(http: HttpClient, config: &RestConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn list_url(&self) -> String {
        format!("{}{}", self.base_url, REST_ARTIST_PATH)
    }

    fn item_url(&self, id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.list_url())
            .map_err(|e| FinderError::Config(format!("Invalid REST base url '{}': {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| FinderError::Config(format!("REST base url '{}' cannot be a base", self.base_url)))?
            .push(id);
        Ok(url)
    }
}

/// Pull the `data` field out of the backend's JSON envelope.
fn take_data(mut body: Value) -> Result<Value> {
    body.get_mut("data")
        .map(Value::take)
        .ok_or_else(|| FinderError::malformed(SourceKind::Rest, "missing 'data' field in envelope"))
}

#[async_trait::async_trait]
impl ArtistSource for RestAdapter {
    fn source_kind(&self) -> SourceKind {
        SourceKind::Rest
    }

    #[instrument(skip(self))]
    async fn fetch_artists(&self, page: Option<u32>) -> Result<Vec<RawRecord>> {
        let mut request = self.http.get(&self.list_url());
        if let Some(page) = page {
            request = request.query(&[("page", page)]);
        }

        let body = self.http.get_json(SourceKind::Rest, request).await?;
        match take_data(body)? {
            Value::Array(records) => {
                info!("Fetched {} artists from REST backend", records.len());
                Ok(records)
            }
            Value::Null => Ok(Vec::new()),
            _ => Err(FinderError::malformed(SourceKind::Rest, "'data' is not an array")),
        }
    }

    #[instrument(skip(self))]
    async fn fetch_artist(&self, id: &str) -> Result<Option<RawRecord>> {
        let request = self.http.get(self.item_url(id)?.as_str());
        let Some(body) = self.http.get_json_optional(SourceKind::Rest, request).await? else {
            return Ok(None);
        };

        match take_data(body)? {
            Value::Null => Ok(None),
            record @ Value::Object(_) => Ok(Some(record)),
            // Some backend versions wrap the single record in a list
            Value::Array(records) => Ok(records.into_iter().next()),
            _ => Err(FinderError::malformed(SourceKind::Rest, "'data' is not an object")),
        }
    }
}
