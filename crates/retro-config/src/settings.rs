//! Scan, placement and download settings

use serde::{Deserialize, Serialize};

/// Candidate scan settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Maximum path depth below a scan root, counting the file name
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Skip hidden files and directories
    #[serde(default = "default_true")]
    pub skip_hidden: bool,

    /// Directory names (lower-case) never descended into
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,

    /// Extensions accepted in addition to the built-in ROM list
    #[serde(default)]
    pub extra_extensions: Vec<String>,
}

fn default_max_depth() -> usize {
    6
}

fn default_true() -> bool {
    true
}

fn default_skip_dirs() -> Vec<String> {
    ["bios", "saves", "states", "screenshots"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            skip_hidden: true,
            skip_dirs: default_skip_dirs(),
            extra_extensions: Vec::new(),
        }
    }
}

/// How matched files land in the output tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Copy (or link) matched files into the output tree
    #[serde(default = "default_true")]
    pub copy_roms: bool,

    /// Files at or above this size are symlinked instead of copied
    #[serde(default = "default_symlink_threshold")]
    pub symlink_threshold_bytes: u64,

    /// ROM folder below the output root
    #[serde(default = "default_roms_dir")]
    pub roms_dir: String,

    /// BIOS folder below the output root
    #[serde(default = "default_bios_dir")]
    pub bios_dir: String,
}

fn default_symlink_threshold() -> u64 {
    1_000_000_000
}

fn default_roms_dir() -> String {
    "Roms".to_string()
}

fn default_bios_dir() -> String {
    "BIOS".to_string()
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            copy_roms: true,
            symlink_threshold_bytes: default_symlink_threshold(),
            roms_dir: default_roms_dir(),
            bios_dir: default_bios_dir(),
        }
    }
}

/// HTTP settings for ROM URLs given in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Connect and per-read timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("retro-builder/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}
