use serde_json::Value;

use super::base::{NormalizerUtils, SourceNormalizer};
use crate::error::Result;
use crate::types::{CanonicalItem, RawRecord, SourceKind};

/// Normalizer for places-search results.
///
/// `imageUrl` is left empty; the aggregator fills it by pairing with image results.
pub struct PlacesNormalizer;

impl PlacesNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// First listed neighborhood, or an empty string when there is none.
    fn neighbourhood(data: &Value) -> String {
        NormalizerUtils::at_path(data, &["location", "neighborhood"])
            .and_then(Value::as_array)
            .and_then(|hoods| hoods.first())
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

impl Default for PlacesNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceNormalizer for PlacesNormalizer {
    fn normalize(&self, record: &RawRecord) -> Result<CanonicalItem> {
        let id = NormalizerUtils::required(record, &["fsq_id"], SourceKind::Places)?;
        let name = NormalizerUtils::required(record, &["name"], SourceKind::Places)?;

        let mut item = CanonicalItem::new(id, name, SourceKind::Places);
        item.address = NormalizerUtils::at_path(record, &["location", "address"])
            .and_then(NormalizerUtils::truthy_string);
        item.neighbourhood = Some(Self::neighbourhood(record));
        Ok(item)
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::Places
    }

    fn name(&self) -> &str {
        "places"
    }
}
