use std::collections::HashMap;

use super::normalizers::{ArtistNormalizer, ImagesNormalizer, PlacesNormalizer, SourceNormalizer};
use crate::error::{FinderError, Result};
use crate::types::{CanonicalItem, RawRecord, SourceKind};

/// Registry of normalization strategies keyed by source kind
pub struct NormalizationRegistry {
    normalizers: HashMap<SourceKind, Box<dyn SourceNormalizer>>,
}

impl NormalizationRegistry {
    /// Create a registry with the built-in normalizer for every source kind
    pub fn new() -> Self {
        let mut registry = Self {
            normalizers: HashMap::new(),
        };
        registry.register(Box::new(PlacesNormalizer::new()));
        registry.register(Box::new(ImagesNormalizer::new()));
        registry.register(Box::new(ArtistNormalizer::spreadsheet()));
        registry.register(Box::new(ArtistNormalizer::rest()));
        registry
    }

    /// Register (or replace) the normalizer for its source kind
    pub fn register(&mut self, normalizer: Box<dyn SourceNormalizer>) {
        self.normalizers.insert(normalizer.source_kind(), normalizer);
    }

    pub fn get_normalizer(&self, source_kind: SourceKind) -> Option<&dyn SourceNormalizer> {
        self.normalizers.get(&source_kind).map(|n| n.as_ref())
    }

    pub fn normalize(&self, source_kind: SourceKind, record: &RawRecord) -> Result<CanonicalItem> {
        match self.get_normalizer(source_kind) {
            Some(normalizer) => normalizer.normalize(record),
            None => Err(FinderError::Config(format!(
                "No normalizer registered for source: {}",
                source_kind
            ))),
        }
    }

    /// List all registered source kinds
    pub fn list_sources(&self) -> Vec<SourceKind> {
        self.normalizers.keys().copied().collect()
    }
}

impl Default for NormalizationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct UppercasePlaces;

    impl SourceNormalizer for UppercasePlaces {
        fn normalize(&self, record: &RawRecord) -> Result<CanonicalItem> {
            let mut item = PlacesNormalizer::new().normalize(record)?;
            item.name = item.name.to_uppercase();
            Ok(item)
        }

        fn source_kind(&self) -> SourceKind {
            SourceKind::Places
        }

        fn name(&self) -> &str {
            "uppercase_places"
        }
    }

    #[test]
    fn test_registry_has_built_in_normalizers() {
        let registry = NormalizationRegistry::new();
        let sources = registry.list_sources();
        assert_eq!(sources.len(), 4);
        for kind in [SourceKind::Places, SourceKind::Images, SourceKind::Spreadsheet, SourceKind::Rest] {
            assert!(sources.contains(&kind));
        }
        assert_eq!(
            registry.get_normalizer(SourceKind::Spreadsheet).unwrap().name(),
            "spreadsheet_artist"
        );
    }

    #[test]
    fn test_register_replaces_existing_strategy() {
        let mut registry = NormalizationRegistry::new();
        registry.register(Box::new(UppercasePlaces));

        let item = registry
            .normalize(SourceKind::Places, &json!({ "fsq_id": "a", "name": "Cafe A" }))
            .unwrap();
        assert_eq!(item.name, "CAFE A");
        assert_eq!(registry.list_sources().len(), 4);
    }
}
