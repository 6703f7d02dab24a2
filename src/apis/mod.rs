pub mod images;
pub mod places;
pub mod rest;
pub mod spreadsheet;

pub use images::ImagesAdapter;
pub use places::PlacesAdapter;
pub use rest::RestAdapter;
pub use spreadsheet::{RecordPager, SelectQuery, SpreadsheetAdapter};
