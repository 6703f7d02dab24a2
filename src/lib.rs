pub mod aggregator;
pub mod apis;
pub mod config;
pub mod constants;
pub mod error;
pub mod infra;
pub mod logging;
pub mod normalize;
pub mod server;
pub mod types;

pub use aggregator::Aggregator;
pub use error::{FinderError, Result};
pub use types::{CanonicalItem, RawRecord, SourceKind};
