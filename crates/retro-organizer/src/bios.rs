//! BIOS collection from the source collections

use crate::OrganizerError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// BIOS images the device firmware looks for, with a description
pub const BIOS_FILES: &[(&str, &str)] = &[
    // PlayStation
    ("bios_CD_U.bin", "PS1 USA BIOS"),
    ("bios_CD_E.bin", "PS1 Europe BIOS"),
    ("bios_CD_J.bin", "PS1 Japan BIOS"),
    ("PSXONPSP660.bin", "PS1 BIOS for PSXONPSP"),
    // PC Engine CD
    ("syscard3.pce", "PC Engine CD BIOS"),
    // Sega
    ("bios_MD.bin", "Mega Drive BIOS"),
    ("bios.gg", "Game Gear BIOS"),
    ("bios_E.sms", "Master System Europe BIOS"),
    ("bios_U.sms", "Master System USA BIOS"),
    ("bios_J.sms", "Master System Japan BIOS"),
    // Nintendo handhelds
    ("gb_bios.bin", "Game Boy BIOS"),
    ("gbc_bios.bin", "Game Boy Color BIOS"),
    ("gba_bios.bin", "Game Boy Advance BIOS"),
    // Neo Geo
    ("neogeo.zip", "Neo Geo BIOS"),
    // Dreamcast
    ("dc_boot.bin", "Dreamcast boot BIOS"),
    ("dc_flash.bin", "Dreamcast flash BIOS"),
    // Famicom Disk System
    ("disksys.rom", "Famicom Disk System BIOS"),
];

/// Summary of a BIOS collection pass
#[derive(Debug, Default)]
pub struct BiosResult {
    pub copied: Vec<String>,
    pub already_present: Vec<String>,
}

/// Find known BIOS files below `roots` and copy each into `bios_dir` once.
///
/// The first hit in root order wins. A root that cannot be read is skipped.
pub fn collect_bios(
    roots: &[PathBuf],
    bios_dir: &Path,
    max_depth: usize,
) -> Result<BiosResult, OrganizerError> {
    fs::create_dir_all(bios_dir)?;

    let mut found: BTreeMap<&'static str, PathBuf> = BTreeMap::new();
    for root in roots {
        tracing::info!("Searching for BIOS files in {}", root.display());
        find_bios(root, 1, max_depth, &mut found);
    }

    let mut result = BiosResult::default();
    for (name, description) in BIOS_FILES {
        let Some(source) = found.get(name) else {
            continue;
        };

        let dest = bios_dir.join(name);
        if dest.exists() {
            tracing::info!("{} already exists: {}", description, name);
            result.already_present.push(name.to_string());
            continue;
        }

        fs::copy(source, &dest)?;
        tracing::info!("Copied {}: {}", description, name);
        result.copied.push(name.to_string());
    }

    if result.copied.is_empty() {
        tracing::info!("No new BIOS files found to copy");
    } else {
        tracing::info!("Copied {} BIOS files to {}", result.copied.len(), bios_dir.display());
    }

    Ok(result)
}

fn find_bios(
    dir: &Path,
    depth: usize,
    max_depth: usize,
    found: &mut BTreeMap<&'static str, PathBuf>,
) {
    if depth > max_depth {
        return;
    }

    let Ok(entries) = fs::read_dir(dir) else {
        tracing::debug!("Cannot read {}", dir.display());
        return;
    };

    let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            find_bios(&path, depth + 1, max_depth, found);
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some((known, _)) = BIOS_FILES.iter().find(|(known, _)| *known == name) {
            found.entry(*known).or_insert(path);
        }
    }
}
