//! Platform vocabulary and path-based platform detection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Canonical platform tag, named after the platform's storage folder
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum SystemTag {
    // Nintendo
    Fc,
    Sfc,
    N64,
    Gb,
    Gbc,
    Gba,

    // Sega
    Ms,
    Md,
    Gg,
    Dc,

    // Sony
    Ps,
    Psp,

    // Arcade
    Arcade,
    NeoGeo,

    // Other
    Atari,
    Pce,
    Ngp,
    Ws,

    /// Detection found no evidence for any platform
    Unknown,

    /// A raw label outside the known vocabulary, kept verbatim
    Custom(String),
}

/// Every known tag, in declaration order
pub const KNOWN_SYSTEMS: &[SystemTag] = &[
    SystemTag::Fc,
    SystemTag::Sfc,
    SystemTag::N64,
    SystemTag::Gb,
    SystemTag::Gbc,
    SystemTag::Gba,
    SystemTag::Ms,
    SystemTag::Md,
    SystemTag::Gg,
    SystemTag::Dc,
    SystemTag::Ps,
    SystemTag::Psp,
    SystemTag::Arcade,
    SystemTag::NeoGeo,
    SystemTag::Atari,
    SystemTag::Pce,
    SystemTag::Ngp,
    SystemTag::Ws,
];

/// Platform labels as catalogs write them
const LABEL_ALIASES: &[(&str, SystemTag)] = &[
    ("Nintendo 64", SystemTag::N64),
    ("N64", SystemTag::N64),
    ("PlayStation", SystemTag::Ps),
    ("PS1", SystemTag::Ps),
    ("PSX", SystemTag::Ps),
    ("Dreamcast", SystemTag::Dc),
    ("Sega Dreamcast", SystemTag::Dc),
    ("Arcade", SystemTag::Arcade),
    ("MAME", SystemTag::Arcade),
    ("FBA", SystemTag::Arcade),
    ("Game Boy", SystemTag::Gb),
    ("Game Boy Color", SystemTag::Gbc),
    ("Game Boy Advance", SystemTag::Gba),
    ("GBA", SystemTag::Gba),
    ("NES", SystemTag::Fc),
    ("Nintendo Entertainment System", SystemTag::Fc),
    ("Famicom", SystemTag::Fc),
    ("SNES", SystemTag::Sfc),
    ("Super Nintendo", SystemTag::Sfc),
    ("Super Famicom", SystemTag::Sfc),
    ("Genesis", SystemTag::Md),
    ("Mega Drive", SystemTag::Md),
    ("Sega Genesis", SystemTag::Md),
    ("Neo Geo", SystemTag::NeoGeo),
    ("Atari 2600", SystemTag::Atari),
    ("TurboGrafx-16", SystemTag::Pce),
    ("PC Engine", SystemTag::Pce),
    ("Master System", SystemTag::Ms),
    ("Sega Master System", SystemTag::Ms),
    ("Game Gear", SystemTag::Gg),
    ("Sega Game Gear", SystemTag::Gg),
    ("Neo Geo Pocket", SystemTag::Ngp),
    ("WonderSwan", SystemTag::Ws),
    ("PlayStation Portable", SystemTag::Psp),
];

/// Folder names that identify a platform, checked top to bottom.
///
/// GBA and GBC precede GB so the more specific handheld wins when a path
/// carries several of them.
const FOLDER_ALIASES: &[(SystemTag, &[&str])] = &[
    (SystemTag::Arcade, &["ARCADE"]),
    (SystemTag::N64, &["N64", "NINTENDO64"]),
    (SystemTag::Ps, &["PS", "PS1", "PSX", "PLAYSTATION"]),
    (SystemTag::Dc, &["DC", "DREAMCAST"]),
    (SystemTag::Gba, &["GBA"]),
    (SystemTag::Gbc, &["GBC"]),
    (SystemTag::Gb, &["GB"]),
    (SystemTag::Fc, &["FC", "NES"]),
    (SystemTag::Sfc, &["SFC", "SNES"]),
    (SystemTag::Md, &["MD", "GENESIS", "MEGADRIVE"]),
    (SystemTag::NeoGeo, &["NEOGEO"]),
    (SystemTag::Atari, &["ATARI"]),
    (SystemTag::Pce, &["PCE", "PCENGINE", "TURBOGRAFX"]),
    (SystemTag::Ms, &["MS"]),
    (SystemTag::Gg, &["GG"]),
    (SystemTag::Psp, &["PSP"]),
    (SystemTag::Ngp, &["NGP"]),
    (SystemTag::Ws, &["WS", "WONDERSWAN"]),
];

/// Cartridge formats that name their platform unambiguously
const EXTENSION_SYSTEMS: &[(&str, SystemTag)] = &[
    ("n64", SystemTag::N64),
    ("z64", SystemTag::N64),
    ("v64", SystemTag::N64),
    ("nes", SystemTag::Fc),
    ("sfc", SystemTag::Sfc),
    ("smc", SystemTag::Sfc),
    ("gb", SystemTag::Gb),
    ("gbc", SystemTag::Gbc),
    ("gba", SystemTag::Gba),
    ("md", SystemTag::Md),
    ("smd", SystemTag::Md),
    ("gen", SystemTag::Md),
    ("sms", SystemTag::Ms),
    ("gg", SystemTag::Gg),
    ("pce", SystemTag::Pce),
];

/// Disc images only count as PlayStation inside a PS folder
const DISC_EXTENSIONS: &[&str] = &["chd", "iso", "cue", "bin"];

impl SystemTag {
    /// Map a raw platform label to its canonical tag.
    ///
    /// Catalog labels and canonical folder names are matched case-insensitively.
    /// Anything else passes through as [`SystemTag::Custom`], made safe to use
    /// as a single folder name.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();

        if let Some((_, tag)) = LABEL_ALIASES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(trimmed))
        {
            return tag.clone();
        }

        if let Some(tag) = KNOWN_SYSTEMS
            .iter()
            .find(|tag| tag.folder_name().eq_ignore_ascii_case(trimmed))
        {
            return tag.clone();
        }

        SystemTag::Custom(custom_folder(trimmed))
    }

    /// Detect a tag from a folder name such as `SNES` or `PlayStation`
    pub fn from_folder_segment(segment: &str) -> Option<Self> {
        let upper = segment.to_uppercase();
        FOLDER_ALIASES
            .iter()
            .find(|(_, names)| names.contains(&upper.as_str()))
            .map(|(tag, _)| tag.clone())
    }

    /// Detect a tag from a cartridge file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        EXTENSION_SYSTEMS
            .iter()
            .find(|(known, _)| *known == ext)
            .map(|(_, tag)| tag.clone())
    }

    /// Storage folder name for this platform
    pub fn folder_name(&self) -> &str {
        match self {
            SystemTag::Fc => "FC",
            SystemTag::Sfc => "SFC",
            SystemTag::N64 => "N64",
            SystemTag::Gb => "GB",
            SystemTag::Gbc => "GBC",
            SystemTag::Gba => "GBA",
            SystemTag::Ms => "MS",
            SystemTag::Md => "MD",
            SystemTag::Gg => "GG",
            SystemTag::Dc => "DC",
            SystemTag::Ps => "PS",
            SystemTag::Psp => "PSP",
            SystemTag::Arcade => "ARCADE",
            SystemTag::NeoGeo => "NEOGEO",
            SystemTag::Atari => "ATARI",
            SystemTag::Pce => "PCE",
            SystemTag::Ngp => "NGP",
            SystemTag::Ws => "WS",
            SystemTag::Unknown => "UNKNOWN",
            SystemTag::Custom(name) => name,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &str {
        match self {
            SystemTag::Fc => "Nintendo Entertainment System",
            SystemTag::Sfc => "Super Nintendo",
            SystemTag::N64 => "Nintendo 64",
            SystemTag::Gb => "Game Boy",
            SystemTag::Gbc => "Game Boy Color",
            SystemTag::Gba => "Game Boy Advance",
            SystemTag::Ms => "Sega Master System",
            SystemTag::Md => "Sega Mega Drive / Genesis",
            SystemTag::Gg => "Sega Game Gear",
            SystemTag::Dc => "Sega Dreamcast",
            SystemTag::Ps => "Sony PlayStation",
            SystemTag::Psp => "Sony PSP",
            SystemTag::Arcade => "Arcade",
            SystemTag::NeoGeo => "Neo Geo",
            SystemTag::Atari => "Atari 2600",
            SystemTag::Pce => "PC Engine / TurboGrafx-16",
            SystemTag::Ngp => "Neo Geo Pocket",
            SystemTag::Ws => "WonderSwan",
            SystemTag::Unknown => "Unknown",
            SystemTag::Custom(name) => name,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, SystemTag::Unknown)
    }
}

impl fmt::Display for SystemTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}

impl From<SystemTag> for String {
    fn from(tag: SystemTag) -> Self {
        tag.folder_name().to_string()
    }
}

impl From<String> for SystemTag {
    fn from(label: String) -> Self {
        if label == "UNKNOWN" {
            SystemTag::Unknown
        } else {
            SystemTag::from_label(&label)
        }
    }
}

/// Keep a custom label to one path component
fn custom_folder(label: &str) -> String {
    let name: String = label
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();

    match name.as_str() {
        "" => "_".to_string(),
        "." | ".." => name.replace('.', "_"),
        _ => name,
    }
}

/// Infer the platform of a ROM file from where it sits and what it is called.
///
/// Folder segments win over the extension; the first folder alias in table
/// order that appears anywhere in the path decides.
pub fn classify(path: &Path) -> SystemTag {
    let segments: Vec<String> = path
        .iter()
        .map(|part| part.to_string_lossy().to_uppercase())
        .collect();

    for (tag, names) in FOLDER_ALIASES {
        if segments.iter().any(|s| names.contains(&s.as_str())) {
            return tag.clone();
        }
    }

    let Some(ext) = path.extension().map(|e| e.to_string_lossy().to_lowercase()) else {
        return SystemTag::Unknown;
    };

    if let Some(tag) = SystemTag::from_extension(&ext) {
        return tag;
    }

    if DISC_EXTENSIONS.contains(&ext.as_str()) && segments.iter().any(|s| s == "PS") {
        return SystemTag::Ps;
    }

    SystemTag::Unknown
}
