//! End-to-end organization run

use crate::report::{EntryOutcome, EntryRecord, RunReport, RunStats};
use crate::{OrganizerError, SourceFetcher, collect_bios, place_rom};
use retro_config::BuilderConfig;
use retro_library::{CandidateIndex, MatchEngine, MatchResult, RomScanner, ScanConfig, read_catalog};
use std::fs;
use std::path::{Path, PathBuf};

/// Builds an output tree from a game list and source collections
pub struct Organizer {
    config: BuilderConfig,
    catalog_path: PathBuf,
    rom_dirs: Vec<PathBuf>,
    output_dir: PathBuf,
}

impl Organizer {
    pub fn new(
        config: BuilderConfig,
        catalog_path: impl Into<PathBuf>,
        rom_dirs: Vec<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            catalog_path: catalog_path.into(),
            rom_dirs,
            output_dir: output_dir.into(),
        }
    }

    pub fn roms_dir(&self) -> PathBuf {
        self.output_dir.join(&self.config.placement.roms_dir)
    }

    pub fn bios_dir(&self) -> PathBuf {
        self.output_dir.join(&self.config.placement.bios_dir)
    }

    /// Run the whole pipeline and write the reports.
    ///
    /// Only setup failures abort; a failing entry is recorded and skipped.
    pub async fn run(&self) -> Result<RunReport, OrganizerError> {
        let roms_dir = self.roms_dir();
        fs::create_dir_all(&roms_dir)?;

        let entries = read_catalog(&self.catalog_path)?;

        let mut scan_config = ScanConfig::from(&self.config.scan);
        scan_config.skip_dirs.insert(self.config.placement.bios_dir.to_lowercase());
        let scanner = RomScanner::with_config(scan_config);

        // Output files go in first so they win ties against their sources on a rerun
        let mut index = CandidateIndex::new();
        let existing = scanner.scan_output(&roms_dir, &mut index);
        if existing.files_found > 0 {
            tracing::info!("Found {} existing ROMs in output directory", existing.files_found);
        }

        let scanned = scanner.scan_roots(&self.rom_dirs, &mut index);
        tracing::info!(
            "Found {} ROM files in {} source directories ({} ms)",
            scanned.files_found,
            scanned.roots_scanned,
            scanned.duration_ms
        );

        for (system, count) in index.systems() {
            tracing::debug!("  {}: {} files", system, count);
        }

        let engine = MatchEngine::new(&self.config.matching);
        let results = engine.match_all(&entries, &index);

        let fetcher = SourceFetcher::new(&self.config.download)?;
        let mut stats = RunStats::default();
        let mut records = Vec::with_capacity(results.len());

        for result in results {
            let outcome = match self.process_entry(&result, &roms_dir, &fetcher).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!("✗ {} ({}): {}", result.entry.name, result.entry.system, e);
                    EntryOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            stats.record(&outcome);
            records.push(EntryRecord { result, outcome });
        }

        let bios = collect_bios(&self.rom_dirs, &self.bios_dir(), self.config.scan.max_depth)?;
        stats.bios_copied = bios.copied.len();

        let report = RunReport {
            stats,
            entries: records,
        };
        report.stats.log_summary(&self.output_dir);
        report.write(&self.output_dir)?;

        Ok(report)
    }

    async fn process_entry(
        &self,
        result: &MatchResult,
        roms_dir: &Path,
        fetcher: &SourceFetcher,
    ) -> Result<EntryOutcome, OrganizerError> {
        let entry = &result.entry;
        let system_dir = roms_dir.join(result.target.folder_name());
        fs::create_dir_all(&system_dir)?;

        if let Some(hint) = entry.source_hint.as_deref() {
            match fetcher.fetch(hint, &entry.name, &system_dir).await {
                Ok(path) => {
                    tracing::info!(
                        "✓ {} ({}) -> {} (from provided path)",
                        entry.name,
                        entry.system,
                        path.display()
                    );
                    return Ok(EntryOutcome::FromSource { path });
                }
                Err(e) => {
                    tracing::warn!(
                        "✗ {} ({}): failed to get ROM from {}: {}",
                        entry.name,
                        entry.system,
                        hint,
                        e
                    );
                }
            }
        }

        let Some(file) = &result.file else {
            tracing::info!("✗ {} ({}) - ROM not found", entry.name, entry.system);
            return Ok(EntryOutcome::Missing);
        };

        if file.path.parent() == Some(system_dir.as_path()) {
            tracing::info!("✓ {} ({}) -> Already in output", entry.name, entry.system);
            return Ok(EntryOutcome::AlreadyInOutput {
                path: file.path.clone(),
            });
        }

        let placement = place_rom(file, &system_dir, &self.config.placement)?;
        tracing::info!("✓ {} ({}) -> {}", entry.name, entry.system, file.file_name());
        Ok(EntryOutcome::Placed { placement })
    }
}
