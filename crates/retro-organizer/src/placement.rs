//! Copy or link matched ROMs into their system folder

use crate::OrganizerError;
use retro_config::PlacementConfig;
use retro_library::CandidateFile;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// What happened to a matched file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum Placement {
    /// Copied byte for byte
    Copied(PathBuf),
    /// Symlinked because the file is large
    Linked(PathBuf),
    /// A file of the same name was already in the system folder
    AlreadyPresent(PathBuf),
    /// Copying is disabled; the source stays where it is
    LeftInPlace(PathBuf),
}

impl Placement {
    pub fn path(&self) -> &Path {
        match self {
            Placement::Copied(p)
            | Placement::Linked(p)
            | Placement::AlreadyPresent(p)
            | Placement::LeftInPlace(p) => p,
        }
    }
}

/// Place `file` into `system_dir` according to the placement policy
pub fn place_rom(
    file: &CandidateFile,
    system_dir: &Path,
    config: &PlacementConfig,
) -> Result<Placement, OrganizerError> {
    if !config.copy_roms {
        return Ok(Placement::LeftInPlace(file.path.clone()));
    }

    let Some(name) = file.path.file_name() else {
        return Err(OrganizerError::NotAFile(file.path.clone()));
    };
    let dest = system_dir.join(name);

    // symlink_metadata also sees dangling links
    if fs::symlink_metadata(&dest).is_ok() {
        return Ok(Placement::AlreadyPresent(dest));
    }

    if file.size_bytes < config.symlink_threshold_bytes {
        fs::copy(&file.path, &dest)?;
        tracing::debug!("Copied {} -> {}", file.path.display(), dest.display());
        return Ok(Placement::Copied(dest));
    }

    link(&file.path, &dest)?;
    tracing::debug!("Linked {} -> {}", dest.display(), file.path.display());
    Ok(Placement::Linked(dest))
}

#[cfg(unix)]
fn link(source: &Path, dest: &Path) -> Result<(), OrganizerError> {
    let source = fs::canonicalize(source)?;
    std::os::unix::fs::symlink(source, dest)?;
    Ok(())
}

#[cfg(not(unix))]
fn link(source: &Path, dest: &Path) -> Result<(), OrganizerError> {
    // No unprivileged symlinks here; fall back to a copy
    fs::copy(source, dest)?;
    Ok(())
}
