pub mod normalizers;
pub mod registry;

pub use normalizers::{ArtistNormalizer, ImagesNormalizer, PlacesNormalizer, SourceNormalizer};
pub use registry::NormalizationRegistry;

use crate::error::Result;
use crate::types::{CanonicalItem, RawRecord, SourceKind};

/// Normalize one raw record using the built-in rules for its source kind.
pub fn normalize(source_kind: SourceKind, record: &RawRecord) -> Result<CanonicalItem> {
    NormalizationRegistry::new().normalize(source_kind, record)
}

/// Normalize a batch of records from one source, failing on the first bad record.
pub fn normalize_all(source_kind: SourceKind, records: &[RawRecord]) -> Result<Vec<CanonicalItem>> {
    let registry = NormalizationRegistry::new();
    records
        .iter()
        .map(|record| registry.normalize(source_kind, record))
        .collect()
}
