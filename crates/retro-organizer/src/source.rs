//! ROMs given explicitly in the game list, as a local path or a URL

use crate::OrganizerError;
use directories::BaseDirs;
use futures_util::StreamExt;
use percent_encoding::percent_decode_str;
use retro_config::DownloadConfig;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Extensions a downloaded file name must carry to be kept as-is
const DOWNLOAD_EXTENSIONS: &[&str] = &[
    ".zip", ".chd", ".7z", ".rar", ".z64", ".n64", ".iso", ".cue", ".gba", ".gb", ".gbc", ".nes",
    ".sfc", ".smc", ".md", ".smd", ".gg", ".sms",
];

/// Fetches source hints into a system folder
pub struct SourceFetcher {
    client: reqwest::Client,
}

impl SourceFetcher {
    pub fn new(config: &DownloadConfig) -> Result<Self, OrganizerError> {
        // Per-read deadline; a large ROM may stream for much longer in total
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }

    /// Bring the hinted ROM into `system_dir`, returning where it landed
    pub async fn fetch(
        &self,
        hint: &str,
        game_name: &str,
        system_dir: &Path,
    ) -> Result<PathBuf, OrganizerError> {
        if is_url(hint) {
            self.download(hint, game_name, system_dir).await
        } else {
            copy_local(&expand_home(hint), system_dir)
        }
    }

    async fn download(
        &self,
        url: &str,
        game_name: &str,
        system_dir: &Path,
    ) -> Result<PathBuf, OrganizerError> {
        let dest = system_dir.join(download_file_name(url, game_name));
        let partial = dest.with_extension(format!(
            "{}.partial",
            dest.extension().map(|e| e.to_string_lossy()).unwrap_or_default()
        ));

        tracing::info!("Downloading {} to {}", url, dest.display());

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(OrganizerError::DownloadFailed(format!(
                "Server returned {}",
                response.status()
            )));
        }

        let downloaded = match write_body(response, &partial).await {
            Ok(bytes) => bytes,
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&partial) {
                    tracing::debug!("Could not remove {}: {}", partial.display(), cleanup);
                }
                return Err(e);
            }
        };

        fs::rename(&partial, &dest)?;
        tracing::info!("Downloaded {} bytes", downloaded);
        Ok(dest)
    }
}

/// Stream a response body into `path`, returning the byte count
async fn write_body(response: reqwest::Response, path: &Path) -> Result<u64, OrganizerError> {
    let total = response.content_length().unwrap_or(0);
    let mut file = File::create(path)?;
    let mut stream = response.bytes_stream();
    let mut downloaded = 0u64;
    let mut next_report = 10u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| OrganizerError::DownloadFailed(e.to_string()))?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;

        if total > 0 && downloaded * 100 / total >= next_report {
            tracing::debug!("Downloading: {}% ({}/{} bytes)", next_report, downloaded, total);
            next_report += 10;
        }
    }

    file.sync_all()?;
    Ok(downloaded)
}

fn is_url(hint: &str) -> bool {
    hint.starts_with("http://") || hint.starts_with("https://")
}

/// Last URL path segment, decoded, or `<game>.zip` when it is not a ROM name
pub fn download_file_name(url: &str, game_name: &str) -> String {
    let fallback = || format!("{}.zip", game_name);

    let Ok(parsed) = reqwest::Url::parse(url) else {
        return fallback();
    };

    let name = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy().to_string())
        .unwrap_or_default();

    if !name.is_empty() && DOWNLOAD_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
        name
    } else {
        fallback()
    }
}

/// Expand a leading `~` to the home directory
pub fn expand_home(hint: &str) -> PathBuf {
    let Some(rest) = hint.strip_prefix('~') else {
        return PathBuf::from(hint);
    };
    let Some(dirs) = BaseDirs::new() else {
        return PathBuf::from(hint);
    };

    let rest = rest.trim_start_matches('/');
    if rest.is_empty() {
        dirs.home_dir().to_path_buf()
    } else {
        dirs.home_dir().join(rest)
    }
}

/// Copy a local ROM into `system_dir` unless a file of that name is there
pub fn copy_local(source: &Path, system_dir: &Path) -> Result<PathBuf, OrganizerError> {
    if !source.exists() {
        return Err(OrganizerError::SourceNotFound(source.to_path_buf()));
    }
    if !source.is_file() {
        return Err(OrganizerError::NotAFile(source.to_path_buf()));
    }

    let Some(name) = source.file_name() else {
        return Err(OrganizerError::NotAFile(source.to_path_buf()));
    };
    let dest = system_dir.join(name);

    if dest.exists() {
        tracing::info!("Already exists: {}", dest.display());
        return Ok(dest);
    }

    tracing::info!("Copying from {}", source.display());
    fs::copy(source, &dest)?;
    Ok(dest)
}
