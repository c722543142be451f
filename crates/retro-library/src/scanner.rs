//! ROM scanning functionality

use crate::{CandidateIndex, LibraryError, SystemTag, classify, normalize};
use retro_config::ScanSettings;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Result of a ROM scan
#[derive(Debug, Default)]
pub struct ScanResult {
    pub files_found: usize,
    pub roots_scanned: usize,
    pub roots_skipped: usize,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

impl ScanResult {
    /// Fold another scan into this one
    pub fn absorb(&mut self, other: ScanResult) {
        self.files_found += other.files_found;
        self.roots_scanned += other.roots_scanned;
        self.roots_skipped += other.roots_skipped;
        self.errors.extend(other.errors);
        self.duration_ms += other.duration_ms;
    }
}

/// A ROM file discovered on disk.
///
/// Platform and normalized title are computed once, at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub extension: String,
    pub detected_system: SystemTag,
    pub size_bytes: u64,
    pub normalized_stem: String,
}

impl CandidateFile {
    /// Classify a file from its path
    pub fn new(path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        let path = path.into();
        let system = classify(&path);
        Self::with_system(path, size_bytes, system)
    }

    /// Use a platform already known from the file's placement
    pub fn with_system(path: impl Into<PathBuf>, size_bytes: u64, system: SystemTag) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let normalized_stem = path
            .file_stem()
            .map(|s| normalize(&s.to_string_lossy()))
            .unwrap_or_default();

        Self {
            path,
            extension,
            detected_system: system,
            size_bytes,
            normalized_stem,
        }
    }

    /// File name with extension
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Extensions of archives, cartridge dumps and disc images
#[rustfmt::skip]
pub const ROM_EXTENSIONS: &[&str] = &[
    "zip", "7z", "rar",
    "nes", "sfc", "smc", "gb", "gbc", "gba",
    "md", "smd", "gen", "sms", "gg",
    "pce", "iso", "cue", "bin", "chd",
    "n64", "z64", "v64", "ndd",
    "cdi", "gdi",
    "pbp", "cso",
    "img", "ccd", "mdf", "nrg",
    "rom", "32x", "sg",
];

/// BIOS images that share an extension with ROMs
const EXCLUDED_NAMES: &[&str] = &["PSXONPSP660.bin"];
const EXCLUDED_PREFIX: &str = "bios";

/// ROM scanner configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions to scan
    pub extensions: HashSet<String>,

    /// Directories to skip
    pub skip_dirs: HashSet<String>,

    /// Deepest file below a root, counting the file name itself
    pub max_depth: usize,

    /// Skip hidden files/directories
    pub skip_hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::from(&ScanSettings::default())
    }
}

impl From<&ScanSettings> for ScanConfig {
    fn from(settings: &ScanSettings) -> Self {
        let extensions = ROM_EXTENSIONS
            .iter()
            .map(|ext| ext.to_string())
            .chain(
                settings
                    .extra_extensions
                    .iter()
                    .map(|ext| ext.trim_start_matches('.').to_lowercase()),
            )
            .collect();

        Self {
            extensions,
            skip_dirs: settings.skip_dirs.iter().map(|d| d.to_lowercase()).collect(),
            max_depth: settings.max_depth,
            skip_hidden: settings.skip_hidden,
        }
    }
}

/// ROM scanner
pub struct RomScanner {
    config: ScanConfig,
}

impl Default for RomScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl RomScanner {
    /// Create a new scanner with default config
    pub fn new() -> Self {
        Self {
            config: ScanConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Check if file is likely a ROM
    pub fn is_rom_file(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };

        if name.starts_with(EXCLUDED_PREFIX) || EXCLUDED_NAMES.contains(&name.as_ref()) {
            return false;
        }

        path.extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.config.extensions.contains(&ext))
    }

    /// Scan every source root into the index.
    ///
    /// A root that is missing or unreadable is logged and skipped.
    pub fn scan_roots(&self, roots: &[PathBuf], index: &mut CandidateIndex) -> ScanResult {
        let start = Instant::now();
        let mut result = ScanResult::default();

        for root in roots {
            match self.scan_root(root, &mut result.errors) {
                Ok(files) => {
                    tracing::info!("Scanned {}: {} ROM files", root.display(), files.len());
                    result.files_found += files.len();
                    result.roots_scanned += 1;
                    index.extend(files);
                }
                Err(e) => {
                    tracing::warn!("Skipping scan root {}: {}", root.display(), e);
                    result.errors.push(format!("{}: {}", root.display(), e));
                    result.roots_skipped += 1;
                }
            }
        }

        result.duration_ms = start.elapsed().as_millis() as u64;
        result
    }

    /// Scan a single root recursively
    pub fn scan_root(
        &self,
        root: &Path,
        errors: &mut Vec<String>,
    ) -> Result<Vec<CandidateFile>, LibraryError> {
        if !root.is_dir() {
            return Err(LibraryError::PathNotFound(root.to_path_buf()));
        }

        // The root itself must be readable; failures below it are per-directory
        fs::read_dir(root)?;

        let mut files = Vec::new();
        self.scan_dir(root, 1, &mut files, errors);
        Ok(files)
    }

    /// Recursively scan a directory whose entries sit at `depth`
    fn scan_dir(
        &self,
        dir: &Path,
        depth: usize,
        files: &mut Vec<CandidateFile>,
        errors: &mut Vec<String>,
    ) {
        if depth > self.config.max_depth {
            return;
        }

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Cannot read {}: {}", dir.display(), e);
                errors.push(format!("{}: {}", dir.display(), e));
                return;
            }
        };

        let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
        // Directory order varies between filesystems
        paths.sort();

        for entry_path in paths {
            let name = entry_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            // Skip hidden files/directories
            if self.config.skip_hidden && name.starts_with('.') {
                continue;
            }

            if entry_path.is_dir() {
                if self.config.skip_dirs.contains(&name.to_lowercase()) {
                    continue;
                }
                self.scan_dir(&entry_path, depth + 1, files, errors);
            } else if entry_path.is_file() && self.is_rom_file(&entry_path) {
                let size = fs::metadata(&entry_path).map(|m| m.len()).unwrap_or(0);
                files.push(CandidateFile::new(entry_path, size));
            }
        }
    }

    /// Index ROMs already organized under `roms_dir/<platform>/`.
    ///
    /// Files take the platform of the folder they sit in.
    pub fn scan_output(&self, roms_dir: &Path, index: &mut CandidateIndex) -> ScanResult {
        let start = Instant::now();
        let mut result = ScanResult::default();

        let Ok(entries) = fs::read_dir(roms_dir) else {
            return result;
        };
        result.roots_scanned = 1;

        let mut system_dirs: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        system_dirs.sort();

        for system_dir in system_dirs {
            let folder = system_dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let system = SystemTag::from_label(&folder);

            let entries = match fs::read_dir(&system_dir) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Cannot read {}: {}", system_dir.display(), e);
                    result.errors.push(format!("{}: {}", system_dir.display(), e));
                    continue;
                }
            };

            let mut roms: Vec<PathBuf> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_file() && self.is_rom_file(p))
                .collect();
            roms.sort();

            for rom in roms {
                let size = fs::metadata(&rom).map(|m| m.len()).unwrap_or(0);
                index.insert(CandidateFile::with_system(rom, size, system.clone()));
                result.files_found += 1;
            }
        }

        result.duration_ms = start.elapsed().as_millis() as u64;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_file_caches_classification() {
        let file = CandidateFile::new("/roms/SNES/Chrono Trigger (USA).SFC", 4096);
        assert_eq!(file.detected_system, SystemTag::Sfc);
        assert_eq!(file.extension, "sfc");
        assert_eq!(file.normalized_stem, "chrono trigger");
        assert_eq!(file.file_name(), "Chrono Trigger (USA).SFC");
    }

    #[test]
    fn test_is_rom_file() {
        let scanner = RomScanner::new();
        assert!(scanner.is_rom_file(Path::new("/roms/game.gba")));
        assert!(scanner.is_rom_file(Path::new("/roms/game.ZIP")));
        assert!(scanner.is_rom_file(Path::new("/roms/game.chd")));
        assert!(!scanner.is_rom_file(Path::new("/roms/readme.txt")));
        assert!(!scanner.is_rom_file(Path::new("/roms/noext")));
    }

    #[test]
    fn test_bios_images_excluded() {
        let scanner = RomScanner::new();
        assert!(!scanner.is_rom_file(Path::new("/roms/bios_CD_U.bin")));
        assert!(!scanner.is_rom_file(Path::new("/roms/PSXONPSP660.bin")));
        assert!(scanner.is_rom_file(Path::new("/roms/Game.bin")));
    }

    #[test]
    fn test_scan_config_default() {
        let config = ScanConfig::default();
        assert!(config.extensions.contains("gba"));
        assert!(config.extensions.contains("nes"));
        assert!(config.skip_dirs.contains("bios"));
        assert_eq!(config.max_depth, 6);
    }

    #[test]
    fn test_extra_extensions() {
        let settings = ScanSettings {
            extra_extensions: vec![".LNX".to_string()],
            ..ScanSettings::default()
        };
        let config = ScanConfig::from(&settings);
        assert!(config.extensions.contains("lnx"));
    }

    #[test]
    fn test_scan_result_absorb() {
        let mut total = ScanResult {
            files_found: 2,
            roots_scanned: 1,
            ..Default::default()
        };
        total.absorb(ScanResult {
            files_found: 3,
            roots_skipped: 1,
            errors: vec!["x".to_string()],
            ..Default::default()
        });
        assert_eq!(total.files_found, 5);
        assert_eq!(total.roots_skipped, 1);
        assert_eq!(total.errors.len(), 1);
    }
}
