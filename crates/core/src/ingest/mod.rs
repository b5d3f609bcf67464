//! Ingestion: turns scan output into catalog records, then flags group
//! directories.

mod groups;
mod writer;

pub use groups::GroupDetector;
pub use writer::{CatalogWriter, IngestSummary};
