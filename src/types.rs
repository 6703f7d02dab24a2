use crate::constants::{DEFAULT_ARTIST_IMAGE_URL, DEFAULT_STORE_IMAGE_URL};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw record as returned from an external source, before normalization
pub type RawRecord = serde_json::Value;

/// Identifies which adapter produced a raw record and which normalization rules apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Places,
    Images,
    Spreadsheet,
    Rest,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Places => "places",
            SourceKind::Images => "images",
            SourceKind::Spreadsheet => "spreadsheet",
            SourceKind::Rest => "rest",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The normalized record shape handed to the presentation layer.
///
/// Every optional field is serialized, as `null` when absent, so that the key
/// set is identical across items regardless of source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalItem {
    pub id: String,
    pub name: String,
    pub source: SourceKind,
    pub image_url: Option<String>,

    // places
    pub address: Option<String>,
    pub neighbourhood: Option<String>,

    // artists
    pub record_id: Option<String>,
    pub certificate_no: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub subcategory_description: Option<String>,
    pub intro_url: Option<String>,
    pub stage_name: Option<String>,
    pub sex: Option<String>,

    // contact
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl CanonicalItem {
    /// Creates an item with only the identifying fields set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, source: SourceKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source,
            image_url: None,
            address: None,
            neighbourhood: None,
            record_id: None,
            certificate_no: None,
            category: None,
            subcategory: None,
            subcategory_description: None,
            intro_url: None,
            stage_name: None,
            sex: None,
            phone: None,
            email: None,
        }
    }

    /// Image to render, falling back to the placeholder for the item's source.
    pub fn display_image_url(&self) -> &str {
        match &self.image_url {
            Some(url) => url,
            None => match self.source {
                SourceKind::Places | SourceKind::Images => DEFAULT_STORE_IMAGE_URL,
                SourceKind::Spreadsheet | SourceKind::Rest => DEFAULT_ARTIST_IMAGE_URL,
            },
        }
    }
}

/// Location-based places search
#[async_trait::async_trait]
pub trait PlaceSource: Send + Sync {
    async fn search(&self, lat_long: &str, query: &str, limit: u32) -> Result<Vec<RawRecord>>;
}

/// Image search used to decorate place results
#[async_trait::async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch_images(&self) -> Result<Vec<RawRecord>>;
}

/// Backend holding street artist records
#[async_trait::async_trait]
pub trait ArtistSource: Send + Sync {
    /// Which normalization rules apply to this backend's records
    fn source_kind(&self) -> SourceKind;

    /// Fetch one page of artist records; `None` means the backend's first page
    async fn fetch_artists(&self, page: Option<u32>) -> Result<Vec<RawRecord>>;

    /// Fetch a single artist record, `Ok(None)` when the backend has no such id
    async fn fetch_artist(&self, id: &str) -> Result<Option<RawRecord>>;
}
