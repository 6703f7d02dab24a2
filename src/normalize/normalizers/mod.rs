pub mod artist;
pub mod base;
pub mod images;
pub mod places;

pub use artist::ArtistNormalizer;
pub use base::{NormalizerUtils, SourceNormalizer};
pub use images::ImagesNormalizer;
pub use places::PlacesNormalizer;
