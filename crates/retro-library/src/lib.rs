//! Game list to ROM file matching
//!
//! Scans ROM collections, classifies every file into a platform, and finds
//! the best file for each game of a curated list.
//! Matching is in-memory and pure once the candidate index is built.

mod catalog;
mod index;
mod matcher;
mod normalize;
mod scanner;
mod scorer;
mod system;

pub use catalog::{CatalogEntry, parse_catalog, read_catalog};
pub use index::CandidateIndex;
pub use matcher::{MatchEngine, MatchResult, title_variants};
pub use normalize::normalize;
pub use scanner::{CandidateFile, ROM_EXTENSIONS, RomScanner, ScanConfig, ScanResult};
pub use scorer::MatchScorer;
pub use system::{KNOWN_SYSTEMS, SystemTag, classify};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LibraryError::PathNotFound(PathBuf::from("/roms/missing"));
        assert!(err.to_string().contains("/roms/missing"));

        let err = LibraryError::Catalog("no header".to_string());
        assert!(err.to_string().starts_with("Catalog error"));
    }
}
