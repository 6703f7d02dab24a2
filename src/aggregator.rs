use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::apis::{ImagesAdapter, PlacesAdapter, RestAdapter, SpreadsheetAdapter};
use crate::config::{ArtistBackend, Config};
use crate::constants::DEFAULT_STORE_IMAGE_URL;
use crate::error::Result;
use crate::infra::http_client::HttpClient;
use crate::normalize::{ImagesNormalizer, NormalizationRegistry};
use crate::types::{ArtistSource, CanonicalItem, ImageSource, PlaceSource, SourceKind};

/// Tunables for the places pathway
#[derive(Debug, Clone)]
pub struct AggregatorSettings {
    pub places_query: String,
    pub default_lat_long: String,
    pub default_limit: u32,
    pub placeholder_image_url: String,
}

impl AggregatorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            places_query: config.places.query.clone(),
            default_lat_long: config.places.default_lat_long.clone(),
            default_limit: config.places.default_limit,
            placeholder_image_url: DEFAULT_STORE_IMAGE_URL.to_string(),
        }
    }
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Combines the source adapters into the lists the presentation layer renders.
///
/// Holds no mutable state; every call re-fetches from the sources.
pub struct Aggregator {
    places: Arc<dyn PlaceSource>,
    images: Arc<dyn ImageSource>,
    artists: Arc<dyn ArtistSource>,
    registry: NormalizationRegistry,
    settings: AggregatorSettings,
}

impl Aggregator {
    pub fn new(
        places: Arc<dyn PlaceSource>,
        images: Arc<dyn ImageSource>,
        artists: Arc<dyn ArtistSource>,
        settings: AggregatorSettings,
    ) -> Self {
        Self {
            places,
            images,
            artists,
            registry: NormalizationRegistry::new(),
            settings,
        }
    }

    /// Wire the HTTP adapters described by `config`. The artist pathway uses
    /// whichever backend `server.artist_backend` selects.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = HttpClient::new(Duration::from_secs(config.http.timeout_secs))?;
        let artists: Arc<dyn ArtistSource> = match config.server.artist_backend {
            ArtistBackend::Rest => Arc::new(RestAdapter::new(http.clone(), &config.rest)),
            ArtistBackend::Spreadsheet => {
                Arc::new(SpreadsheetAdapter::new(http.clone(), &config.spreadsheet))
            }
        };
        Ok(Self::new(
            Arc::new(PlacesAdapter::new(http.clone(), &config.places)),
            Arc::new(ImagesAdapter::new(http, &config.images)),
            artists,
            AggregatorSettings::from_config(config),
        ))
    }

    /// Places near `lat_long`, each decorated with an image.
    ///
    /// Images and places are requested concurrently. A failed image search
    /// degrades to placeholder images; a failed places search is returned.
    #[instrument(skip(self))]
    pub async fn aggregate(&self, lat_long: Option<&str>, limit: Option<u32>) -> Result<Vec<CanonicalItem>> {
        let lat_long = lat_long.unwrap_or(&self.settings.default_lat_long);
        let limit = limit.unwrap_or(self.settings.default_limit);

        let (images, places) = tokio::join!(
            self.images.fetch_images(),
            self.places.search(lat_long, &self.settings.places_query, limit)
        );

        // Keep one slot per image result so a missing rendition does not shift later pairs
        let image_urls: Vec<Option<String>> = match images {
            Ok(records) => records.iter().map(ImagesNormalizer::small_url).collect(),
            Err(e) => {
                warn!(kind = e.kind(), "Image search failed, rendering with placeholders: {}", e);
                Vec::new()
            }
        };

        let items = places?
            .iter()
            .map(|record| self.registry.normalize(SourceKind::Places, record))
            .collect::<Result<Vec<_>>>()?;

        info!(places = items.len(), images = image_urls.len(), "Aggregated places");
        Ok(pair_images(items, &image_urls, &self.settings.placeholder_image_url))
    }

    /// One page of artists from the configured backend, in backend order.
    #[instrument(skip(self))]
    pub async fn aggregate_artists(&self, page: Option<u32>) -> Result<Vec<CanonicalItem>> {
        let kind = self.artists.source_kind();
        let records = self.artists.fetch_artists(page).await?;
        records
            .iter()
            .map(|record| self.registry.normalize(kind, record).map(with_display_image))
            .collect()
    }

    /// A single artist by id, `None` when the backend has no such record.
    #[instrument(skip(self))]
    pub async fn aggregate_artist(&self, id: &str) -> Result<Option<CanonicalItem>> {
        let kind = self.artists.source_kind();
        match self.artists.fetch_artist(id).await? {
            Some(record) => self.registry.normalize(kind, &record).map(|item| Some(with_display_image(item))),
            None => Ok(None),
        }
    }
}

/// Give item `i` image `i`. Items past the end of `image_urls`, or whose slot
/// has no usable URL, get `placeholder`.
pub fn pair_images(
    items: Vec<CanonicalItem>,
    image_urls: &[Option<String>],
    placeholder: &str,
) -> Vec<CanonicalItem> {
    items
        .into_iter()
        .enumerate()
        .map(|(idx, mut item)| {
            let url = image_urls
                .get(idx)
                .cloned()
                .flatten()
                .unwrap_or_else(|| placeholder.to_string());
            item.image_url = Some(url);
            item
        })
        .collect()
}

fn with_display_image(mut item: CanonicalItem) -> CanonicalItem {
    item.image_url = Some(item.display_image_url().to_string());
    item
}
