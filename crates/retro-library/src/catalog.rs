//! Game list ingestion

use crate::LibraryError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One game the user wants on the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    /// Platform label as written in the list
    pub system: String,
    pub category: Option<String>,
    pub notes: Option<String>,
    /// Explicit local path or URL for the ROM
    pub source_hint: Option<String>,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, system: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system: system.into(),
            category: None,
            notes: None,
            source_hint: None,
        }
    }

    pub fn with_source_hint(mut self, hint: impl Into<String>) -> Self {
        self.source_hint = Some(hint.into());
        self
    }
}

const NAME_HEADERS: &[&str] = &["Game Name", "Game", "Name", "name"];
const SYSTEM_HEADERS: &[&str] = &["System", "system"];
const CATEGORY_HEADERS: &[&str] = &["Category", "Category/Set"];
const NOTES_HEADERS: &[&str] = &["Notes"];
const SOURCE_HEADERS: &[&str] = &["rom_path", "ROM Path", "Rom Path", "path"];

/// Column positions resolved from the header row
struct Columns {
    name: Option<usize>,
    system: Option<usize>,
    category: Option<usize>,
    notes: Option<usize>,
    source: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Self {
        let find = |aliases: &[&str]| {
            aliases
                .iter()
                .find_map(|alias| headers.iter().position(|h| h == *alias))
        };

        Self {
            name: find(NAME_HEADERS),
            system: find(SYSTEM_HEADERS),
            category: find(CATEGORY_HEADERS),
            notes: find(NOTES_HEADERS),
            source: find(SOURCE_HEADERS),
        }
    }
}

/// Read a game list from a CSV or TSV file
pub fn read_catalog(path: &Path) -> Result<Vec<CatalogEntry>, LibraryError> {
    if !path.is_file() {
        return Err(LibraryError::PathNotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path)?;
    let entries = parse_catalog(&contents)?;
    tracing::info!("Loaded {} games from {}", entries.len(), path.display());
    Ok(entries)
}

/// Parse a game list.
///
/// The delimiter is a tab if the header line contains one, a comma otherwise.
/// Rows without a name or a system are skipped.
pub fn parse_catalog(contents: &str) -> Result<Vec<CatalogEntry>, LibraryError> {
    let contents = contents.trim_start_matches('\u{feff}');
    let first_line = contents.lines().next().unwrap_or_default();
    let delimiter = if first_line.contains('\t') { b'\t' } else { b',' };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    let columns = Columns::resolve(reader.headers()?);
    if columns.name.is_none() || columns.system.is_none() {
        return Err(LibraryError::Catalog(
            "game list needs a name column and a system column".to_string(),
        ));
    }

    let mut entries = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping malformed row {}: {}", row + 2, e);
                continue;
            }
        };

        let field = |column: Option<usize>| {
            column
                .and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let (Some(name), Some(system)) = (field(columns.name), field(columns.system)) else {
            tracing::debug!("Skipping row {} without name or system", row + 2);
            continue;
        };

        entries.push(CatalogEntry {
            name,
            system,
            category: field(columns.category),
            notes: field(columns.notes),
            source_hint: field(columns.source),
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_separated() {
        let csv = "Game Name,System,Category,Notes\n\
                   Chrono Trigger,SNES,RPG,classic\n\
                   Sonic the Hedgehog,Genesis,,\n";
        let entries = parse_catalog(csv).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Chrono Trigger");
        assert_eq!(entries[0].system, "SNES");
        assert_eq!(entries[0].category.as_deref(), Some("RPG"));
        assert_eq!(entries[0].notes.as_deref(), Some("classic"));
        assert_eq!(entries[1].category, None);
    }

    #[test]
    fn test_parse_tab_separated() {
        let tsv = "Game\tSystem\tROM Path\n\
                   Pokemon Blue/Red\tGame Boy\t/mnt/usb/pokemon.gb\n";
        let entries = parse_catalog(tsv).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Pokemon Blue/Red");
        assert_eq!(entries[0].source_hint.as_deref(), Some("/mnt/usb/pokemon.gb"));
    }

    #[test]
    fn test_header_alias_precedence() {
        let csv = "name,Game Name,system\nlower,upper,NES\n";
        let entries = parse_catalog(csv).unwrap();
        assert_eq!(entries[0].name, "upper");
    }

    #[test]
    fn test_incomplete_rows_dropped() {
        let csv = "Name,System\nMetroid,NES\n,SNES\nZelda,\nShort\n";
        let entries = parse_catalog(csv).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Metroid");
    }

    #[test]
    fn test_quoted_fields_keep_commas() {
        let csv = "Name,System\n\"Ghosts, Goblins\",NES\n";
        let entries = parse_catalog(csv).unwrap();
        assert_eq!(entries[0].name, "Ghosts, Goblins");
    }

    #[test]
    fn test_missing_required_columns() {
        let result = parse_catalog("Title,Platform\nMetroid,NES\n");
        assert!(matches!(result, Err(LibraryError::Catalog(_))));
    }

    #[test]
    fn test_byte_order_mark_ignored() {
        let csv = "\u{feff}Name,System\nMetroid,NES\n";
        let entries = parse_catalog(csv).unwrap();
        assert_eq!(entries.len(), 1);
    }
}
