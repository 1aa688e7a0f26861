use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;
use tokio::process::Command;

use crate::{
    clients::{
        entities::{DownloadedMedia, Track},
        errors::{Error, Result},
    },
    paths::{AUDIO_EXTENSION, sanitize_filename},
};

const YT_DLP_BINARY: &str = "yt-dlp";

/// Searches for a query and downloads the best matching audio into a directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, query: &str, output_dir: &Path) -> Result<DownloadedMedia>;
}

/// Search query for a track: `"<title> <primary artist>"`.
pub fn search_query(track: &Track) -> String {
    match track.primary_artist() {
        Some(artist) => format!("{} {}", track.name, artist.name),
        None => track.name.clone(),
    }
}

/// Downloads a track, logging failures instead of returning them.
///
/// Not finding a match and a failing transcode both end up as `None`.
pub async fn download_track(
    downloader: &dyn Downloader,
    track: &Track,
    output_dir: &Path,
) -> Option<DownloadedMedia> {
    let query = search_query(track);
    match downloader.download(&query, output_dir).await {
        Ok(media) => {
            debug!(
                "Downloaded \"{query}\" from {:?} as {:?}",
                media.source_url, media.path
            );
            Some(media)
        }
        Err(e) => {
            warn!("Error downloading {query}: {e}");
            None
        }
    }
}

// Subset of the info dict printed by yt-dlp once post-processing is done
#[derive(Deserialize, Debug)]
struct YtDlpInfo {
    title: String,
    #[serde(default)]
    webpage_url: Option<String>,
    #[serde(default)]
    filepath: Option<PathBuf>,
}

/// Settings handed to yt-dlp for every download.
#[derive(Debug, Clone)]
pub struct YtDlpOptions {
    pub format: String,
    pub audio_quality: String,
}

impl Default for YtDlpOptions {
    fn default() -> Self {
        YtDlpOptions {
            format: "bestaudio/best".to_string(),
            audio_quality: "192K".to_string(),
        }
    }
}

/// [`Downloader`] backed by the `yt-dlp` executable (which drives ffmpeg for transcoding).
pub struct YtDlpDownloader {
    binary: PathBuf,
    options: YtDlpOptions,
}

impl YtDlpDownloader {
    pub fn new(binary: PathBuf, options: YtDlpOptions) -> Self {
        YtDlpDownloader { binary, options }
    }

    // Locate yt-dlp in PATH or raise a configuration error
    pub fn try_default(options: YtDlpOptions) -> Result<Self> {
        let binary = which::which(YT_DLP_BINARY).map_err(|_| {
            Error::ConfigurationError(format!(
                "{YT_DLP_BINARY} not found in PATH. Install yt-dlp and ffmpeg, or pass its location explicitly."
            ))
        })?;
        debug!("Using {YT_DLP_BINARY} at {binary:?}");
        Ok(Self::new(binary, options))
    }

    fn args(&self, query: &str, output_dir: &Path) -> Vec<String> {
        let template = output_dir.join("%(title)s.%(ext)s");
        vec![
            "--quiet".into(),
            "--no-warnings".into(),
            "--no-progress".into(),
            "--format".into(),
            self.options.format.clone(),
            "--extract-audio".into(),
            "--audio-format".into(),
            AUDIO_EXTENSION.into(),
            "--audio-quality".into(),
            self.options.audio_quality.clone(),
            "--output".into(),
            template.to_string_lossy().into_owned(),
            "--print".into(),
            "after_move:%()j".into(),
            "--no-simulate".into(),
            format!("ytsearch1:{query}"),
        ]
    }
}

#[async_trait::async_trait]
impl Downloader for YtDlpDownloader {
    async fn download(&self, query: &str, output_dir: &Path) -> Result<DownloadedMedia> {
        let output = Command::new(&self.binary)
            .args(self.args(query, output_dir))
            .output()
            .await?;

        if !output.status.success() {
            return Err(Error::DownloadError {
                query: query.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_info(&stdout, output_dir).ok_or_else(|| Error::NoMatch(query.to_string()))?
    }
}

// yt-dlp prints one JSON object per downloaded entry; ytsearch1 yields at most one
fn parse_info(stdout: &str, output_dir: &Path) -> Option<Result<DownloadedMedia>> {
    let line = stdout.lines().rev().find(|l| !l.trim().is_empty())?;
    let info = match serde_json::from_str::<YtDlpInfo>(line) {
        Ok(info) => info,
        Err(e) => return Some(Err(e.into())),
    };
    let path = info.filepath.unwrap_or_else(|| {
        output_dir.join(format!(
            "{}.{AUDIO_EXTENSION}",
            sanitize_filename(&info.title)
        ))
    });
    Some(Ok(DownloadedMedia {
        title: info.title,
        source_url: info.webpage_url,
        path,
    }))
}
