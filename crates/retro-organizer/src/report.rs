//! Run statistics and the organization report

use crate::{OrganizerError, Placement};
use retro_library::MatchResult;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

pub const TEXT_REPORT: &str = "organization_report.txt";
pub const JSON_REPORT: &str = "organization_report.json";

/// Final state of one catalog entry
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryOutcome {
    /// Taken from the entry's explicit path or URL
    FromSource { path: PathBuf },
    /// The match already lives in the output tree
    AlreadyInOutput { path: PathBuf },
    /// Matched in a source collection and placed
    Placed { placement: Placement },
    Missing,
    /// Placement failed; the batch carried on
    Failed { reason: String },
}

impl EntryOutcome {
    pub fn is_found(&self) -> bool {
        matches!(
            self,
            EntryOutcome::FromSource { .. }
                | EntryOutcome::AlreadyInOutput { .. }
                | EntryOutcome::Placed { .. }
        )
    }
}

/// One catalog entry with its match and outcome
#[derive(Debug, Clone, Serialize)]
pub struct EntryRecord {
    #[serde(rename = "match")]
    pub result: MatchResult,
    pub outcome: EntryOutcome,
}

/// Counters for a run
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunStats {
    pub total: usize,
    pub found: usize,
    pub missing: usize,
    pub failed: usize,
    pub from_source: usize,
    pub already_in_output: usize,
    pub copied: usize,
    pub linked: usize,
    pub bios_copied: usize,
}

impl RunStats {
    pub fn record(&mut self, outcome: &EntryOutcome) {
        self.total += 1;
        if outcome.is_found() {
            self.found += 1;
        }

        match outcome {
            EntryOutcome::FromSource { .. } => self.from_source += 1,
            EntryOutcome::AlreadyInOutput { .. } => self.already_in_output += 1,
            EntryOutcome::Placed { placement } => match placement {
                Placement::Copied(_) => self.copied += 1,
                Placement::Linked(_) => self.linked += 1,
                Placement::AlreadyPresent(_) | Placement::LeftInPlace(_) => {}
            },
            EntryOutcome::Missing => self.missing += 1,
            EntryOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Log the end-of-run summary
    pub fn log_summary(&self, output_dir: &Path) {
        tracing::info!("Summary:");
        tracing::info!("  ROMs found locally: {}", self.found - self.from_source);
        tracing::info!("  ROMs from provided paths: {}", self.from_source);
        tracing::info!("  Total ROMs ready: {}", self.found);
        tracing::info!("  ROMs still missing: {}", self.missing);
        if self.failed > 0 {
            tracing::warn!("  Entries that failed: {}", self.failed);
        }
        tracing::info!("  BIOS files copied: {}", self.bios_copied);
        tracing::info!("Output directory: {}", output_dir.display());
    }
}

/// The run as written to disk
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub stats: RunStats,
    pub entries: Vec<EntryRecord>,
}

impl RunReport {
    /// Plain-text report: counts, then every entry without a ROM
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let stats = &self.stats;

        let _ = writeln!(out, "ROM Organization Report");
        let _ = writeln!(out, "{}", "=".repeat(60));
        let _ = writeln!(out);
        let _ = writeln!(out, "Total games in list: {}", stats.total);
        let _ = writeln!(out, "ROMs found: {}", stats.found);
        let _ = writeln!(out, "ROMs missing: {}", stats.missing + stats.failed);
        let _ = writeln!(out, "BIOS files copied: {}", stats.bios_copied);
        let _ = writeln!(out);
        let _ = writeln!(out, "Missing ROMs:");
        let _ = writeln!(out, "{}", "-".repeat(40));

        for record in self.entries.iter().filter(|r| !r.outcome.is_found()) {
            let entry = &record.result.entry;
            let _ = writeln!(out, "{} ({})", entry.name, entry.system);
        }

        out
    }

    /// Write the text and JSON reports into `output_dir`
    pub fn write(&self, output_dir: &Path) -> Result<(), OrganizerError> {
        let text_path = output_dir.join(TEXT_REPORT);
        fs::write(&text_path, self.render_text())?;

        let json_path = output_dir.join(JSON_REPORT);
        fs::write(&json_path, serde_json::to_string_pretty(self)?)?;

        tracing::info!("Report saved to {}", text_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retro_library::{CatalogEntry, SystemTag};

    fn record(name: &str, outcome: EntryOutcome) -> EntryRecord {
        EntryRecord {
            result: MatchResult {
                entry: CatalogEntry::new(name, "SNES"),
                target: SystemTag::Sfc,
                file: None,
                score: None,
                accepted: false,
            },
            outcome,
        }
    }

    #[test]
    fn test_stats_record() {
        let mut stats = RunStats::default();
        stats.record(&EntryOutcome::Placed {
            placement: Placement::Copied(PathBuf::from("/out/a.sfc")),
        });
        stats.record(&EntryOutcome::Placed {
            placement: Placement::Linked(PathBuf::from("/out/b.chd")),
        });
        stats.record(&EntryOutcome::FromSource {
            path: PathBuf::from("/out/c.sfc"),
        });
        stats.record(&EntryOutcome::Missing);
        stats.record(&EntryOutcome::Failed {
            reason: "disk full".to_string(),
        });

        assert_eq!(stats.total, 5);
        assert_eq!(stats.found, 3);
        assert_eq!(stats.copied, 1);
        assert_eq!(stats.linked, 1);
        assert_eq!(stats.from_source, 1);
        assert_eq!(stats.missing, 1);
        assert_eq!(stats.failed, 1);
    }

    #[test]
    fn test_text_report_lists_missing() {
        let entries = vec![
            record(
                "Chrono Trigger",
                EntryOutcome::AlreadyInOutput {
                    path: PathBuf::from("/out/Roms/SFC/Chrono Trigger.sfc"),
                },
            ),
            record("Earthbound", EntryOutcome::Missing),
        ];
        let mut stats = RunStats::default();
        for entry in &entries {
            stats.record(&entry.outcome);
        }

        let text = RunReport { stats, entries }.render_text();

        assert!(text.contains("Total games in list: 2"));
        assert!(text.contains("ROMs found: 1"));
        assert!(text.contains("Earthbound (SNES)"));
        assert!(!text.contains("Chrono Trigger (SNES)"));
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = EntryOutcome::Placed {
            placement: Placement::Copied(PathBuf::from("/out/a.sfc")),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "placed");
        assert_eq!(json["placement"]["kind"], "copied");
        assert_eq!(json["placement"]["path"], "/out/a.sfc");
    }
}
