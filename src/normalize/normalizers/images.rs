use super::base::{NormalizerUtils, SourceNormalizer};
use crate::error::Result;
use crate::types::{CanonicalItem, RawRecord, SourceKind};

/// Normalizer for image-search results. Only the small rendition is used.
pub struct ImagesNormalizer;

impl ImagesNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// The small rendition URL, `None` when the result has none.
    pub fn small_url(record: &RawRecord) -> Option<String> {
        NormalizerUtils::at_path(record, &["urls", "small"]).and_then(NormalizerUtils::truthy_string)
    }
}

impl Default for ImagesNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceNormalizer for ImagesNormalizer {
    fn normalize(&self, record: &RawRecord) -> Result<CanonicalItem> {
        let id = NormalizerUtils::required(record, &["id"], SourceKind::Images)?;
        let name = NormalizerUtils::first_truthy(record, &["alt_description", "description"])
            .unwrap_or_default();

        let mut item = CanonicalItem::new(id, name, SourceKind::Images);
        item.image_url = Self::small_url(record);
        Ok(item)
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::Images
    }

    fn name(&self) -> &str {
        "images"
    }
}
