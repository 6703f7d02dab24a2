use crate::config::ImagesConfig;
use crate::error::{FinderError, Result};
use crate::infra::http_client::HttpClient;
use crate::types::{ImageSource, RawRecord, SourceKind};
use reqwest::header::AUTHORIZATION;
use tracing::{info, instrument};

/// Image-search adapter. Fixed query and page size, first page only.
pub struct ImagesAdapter {
    http: HttpClient,
    endpoint: String,
    access_key: Option<String>,
    query: String,
    per_page: u32,
}

impl ImagesAdapter {
    pub fn new(http: HttpClient, config: &ImagesConfig) -> Self {
        Self {
            http,
            endpoint: config.endpoint.clone(),
            access_key: config.access_key.clone(),
            query: config.query.clone(),
            per_page: config.per_page,
        }
    }
}

#[async_trait::async_trait]
impl ImageSource for ImagesAdapter {
    #[instrument(skip(self), fields(query = %self.query))]
    async fn fetch_images(&self) -> Result<Vec<RawRecord>> {
        let access_key = self.access_key.as_deref().ok_or_else(|| {
            FinderError::ConfigurationMissing("image search access key (UNSPLASH_ACCESS_KEY)".into())
        })?;

        let per_page = self.per_page.to_string();
        let request = self
            .http
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("Client-ID {}", access_key))
            .query(&[("query", self.query.as_str()), ("per_page", per_page.as_str())]);

        let mut body = self.http.get_json(SourceKind::Images, request).await?;
        let mut results = match body.get_mut("results").map(serde_json::Value::take) {
            Some(serde_json::Value::Array(results)) => results,
            // A missing result set is an empty page, not a failure
            Some(serde_json::Value::Null) | None => Vec::new(),
            Some(_) => {
                return Err(FinderError::malformed(
                    SourceKind::Images,
                    "expected 'results' to be an array",
                ))
            }
        };
        results.truncate(self.per_page as usize);

        info!("Fetched {} images", results.len());
        Ok(results)
    }
}
