//! Device folder organizer
//!
//! Turns a game list and a set of ROM collections into a ready-to-copy
//! `Roms/<SYSTEM>/` tree with a `BIOS/` folder and a run report.
//!
//! # Flow
//!
//! - Entries with an explicit path or URL are fetched first
//! - Everything else is matched against the scanned collections
//! - Small matches are copied, large ones symlinked
//! - Known BIOS images are gathered once at the end

mod bios;
mod organizer;
mod placement;
mod report;
mod source;

use std::path::PathBuf;
use thiserror::Error;

pub use bios::{BIOS_FILES, BiosResult, collect_bios};
pub use organizer::Organizer;
pub use placement::{Placement, place_rom};
pub use report::{EntryOutcome, EntryRecord, JSON_REPORT, RunReport, RunStats, TEXT_REPORT};
pub use source::{SourceFetcher, copy_local, download_file_name, expand_home};

#[derive(Debug, Error)]
pub enum OrganizerError {
    #[error("Source not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Not a file: {0}")]
    NotAFile(PathBuf),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Library error: {0}")]
    Library(#[from] retro_library::LibraryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OrganizerError::SourceNotFound(PathBuf::from("/mnt/usb/game.zip"));
        assert_eq!(err.to_string(), "Source not found: /mnt/usb/game.zip");

        let err = OrganizerError::DownloadFailed("Server returned 404 Not Found".to_string());
        assert!(err.to_string().contains("404"));
    }
}
