//! Integration tests for scanning and matching over a real directory tree

use retro_library::{
    CandidateIndex, CatalogEntry, MatchEngine, RomScanner, SystemTag, classify, normalize,
    read_catalog,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test environment with a source collection and an output tree
struct LibraryTestEnv {
    temp_dir: TempDir,
    source_dir: PathBuf,
    roms_dir: PathBuf,
}

impl LibraryTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source_dir = temp_dir.path().join("collection");
        let roms_dir = temp_dir.path().join("output").join("Roms");

        fs::create_dir_all(&source_dir).unwrap();
        fs::create_dir_all(&roms_dir).unwrap();

        Self {
            temp_dir,
            source_dir,
            roms_dir,
        }
    }

    fn create_rom(&self, relative: &str) -> PathBuf {
        let path = self.source_dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"FAKE_ROM_DATA").unwrap();
        path
    }

    fn create_output_rom(&self, system: &str, name: &str) -> PathBuf {
        let path = self.roms_dir.join(system).join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"FAKE_ROM_DATA").unwrap();
        path
    }

    fn scan(&self) -> CandidateIndex {
        let scanner = RomScanner::new();
        let mut index = CandidateIndex::new();
        scanner.scan_roots(&[self.source_dir.clone()], &mut index);
        scanner.scan_output(&self.roms_dir, &mut index);
        index
    }
}

fn stems(index: &CandidateIndex, system: &SystemTag) -> Vec<String> {
    index
        .group(system)
        .iter()
        .map(|f| f.normalized_stem.clone())
        .collect()
}

#[test]
fn test_scan_classifies_by_folder_and_extension() {
    let env = LibraryTestEnv::new();
    env.create_rom("SNES/Chrono Trigger (USA).sfc");
    env.create_rom("Nintendo/GBA/Golden Sun (USA).gba");
    env.create_rom("loose/Super Mario 64 (USA).z64");
    env.create_rom("loose/Street Fighter II.zip");
    env.create_rom("SNES/manual.pdf");

    let index = env.scan();

    assert_eq!(index.len(), 4);
    assert_eq!(stems(&index, &SystemTag::Sfc), ["chrono trigger"]);
    assert_eq!(stems(&index, &SystemTag::Gba), ["golden sun"]);
    assert_eq!(stems(&index, &SystemTag::N64), ["super mario 64"]);
    assert_eq!(stems(&index, &SystemTag::Unknown), ["street fighter ii"]);
}

#[test]
fn test_scan_respects_depth_limit() {
    let env = LibraryTestEnv::new();
    // Six components below the root, counting the file
    env.create_rom("a/b/c/d/e/deep_enough.gba");
    // Seven components
    env.create_rom("a/b/c/d/e/f/too_deep.gba");

    let index = env.scan();

    assert_eq!(stems(&index, &SystemTag::Gba), ["deep enough"]);
}

#[test]
fn test_scan_skips_bios_and_hidden() {
    let env = LibraryTestEnv::new();
    env.create_rom("PS/bios_CD_U.bin");
    env.create_rom("PS/PSXONPSP660.bin");
    env.create_rom("bios/gba_bios.bin");
    env.create_rom(".trash/Old Game.gba");
    env.create_rom("PS/Crash Bandicoot (USA).chd");

    let index = env.scan();

    assert_eq!(index.len(), 1);
    assert_eq!(stems(&index, &SystemTag::Ps), ["crash bandicoot"]);
}

#[test]
fn test_missing_root_is_not_fatal() {
    let env = LibraryTestEnv::new();
    env.create_rom("GB/Tetris (World).gb");

    let scanner = RomScanner::new();
    let mut index = CandidateIndex::new();
    let result = scanner.scan_roots(
        &[PathBuf::from("/nonexistent/collection"), env.source_dir.clone()],
        &mut index,
    );

    assert_eq!(result.roots_skipped, 1);
    assert_eq!(result.roots_scanned, 1);
    assert_eq!(result.files_found, 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(index.len(), 1);
}

#[test]
fn test_output_tree_uses_folder_platform() {
    let env = LibraryTestEnv::new();
    env.create_output_rom("SFC", "Earthbound.zip");
    env.create_output_rom("Virtual Boy", "Wario Land.zip");

    let index = env.scan();

    assert_eq!(stems(&index, &SystemTag::Sfc), ["earthbound"]);
    assert_eq!(
        stems(&index, &SystemTag::Custom("Virtual Boy".to_string())),
        ["wario land"]
    );
}

#[test]
fn test_end_to_end_matching() {
    let env = LibraryTestEnv::new();
    env.create_rom("SNES/Chrono Trigger (USA).sfc");
    env.create_rom("SNES/Sonic the Hedgehog (USA).sfc");
    env.create_rom("GB/Pokemon Red (USA).gb");
    env.create_rom("GB/Pokemon Blue (USA).gb");

    let catalog = env.temp_dir.path().join("games.csv");
    fs::write(
        &catalog,
        "Game Name,System\n\
         Chrono Trigger,SNES\n\
         Sonic,Genesis\n\
         Pokemon Blue/Red,Game Boy\n\
         Metroid,NES\n",
    )
    .unwrap();

    let entries = read_catalog(&catalog).unwrap();
    let index = env.scan();
    let engine = MatchEngine::default();
    let results = engine.match_all(&entries, &index);

    assert_eq!(results.len(), 4);

    let chrono = &results[0];
    assert!(chrono.accepted);
    assert_eq!(chrono.score, Some(1.0));

    // Same title exists only on another platform
    let sonic = &results[1];
    assert!(!sonic.accepted);
    assert!(sonic.file.is_none());

    let pokemon = &results[2];
    assert!(pokemon.accepted);
    assert_eq!(pokemon.score, Some(1.0));

    let metroid = &results[3];
    assert!(!metroid.accepted);
    assert!(metroid.score.is_none());

    for result in results.iter().filter(|r| r.accepted) {
        let file = result.file.as_ref().unwrap();
        let detected = classify(&file.path);
        assert!(detected == result.target || detected.is_unknown());
    }
}

#[test]
fn test_results_serialize_for_reports() {
    let env = LibraryTestEnv::new();
    env.create_rom("N64/Super Mario 64 (USA).z64");

    let index = env.scan();
    let entry = CatalogEntry::new("Super Mario 64", "N64");
    let result = MatchEngine::default().find_match(&entry, &index);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["target"], "N64");
    assert_eq!(json["accepted"], true);
    assert_eq!(json["file"]["detected_system"], "N64");
}

#[test]
fn test_normalize_matches_file_stem() {
    let path = Path::new("/roms/FC/Super Mario Bros. 3 (USA) [!].nes");
    let stem = path.file_stem().unwrap().to_string_lossy();
    assert_eq!(normalize(&stem), "super mario bros 3");
}
