//! Downloads one collection of tracks into a directory.

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};

use crate::{
    clients::{
        entities::{DownloadedFile, LibraryEntry, Track},
        errors::Result,
        tagger::Tagger,
        youtube::{Downloader, download_track},
    },
    paths::canonical_filename,
    report::format_size,
};

const PROGRESS_TEMPLATE: &str = "{prefix}: {percent:>3}%|{wide_bar}| {pos}/{len} [{elapsed_precise}<{eta_precise}] {msg}";

/// Result of processing one collection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Bytes of every file downloaded in this batch.
    pub total_size: u64,
    pub files: Vec<DownloadedFile>,
    pub skipped: usize,
    pub failed: usize,
}

enum TrackResult {
    Downloaded(DownloadedFile),
    Skipped,
    Failed,
}

/// Resolves, downloads, renames and tags every track of a list of entries.
pub struct BatchProcessor {
    downloader: Box<dyn Downloader>,
    tagger: Box<dyn Tagger>,
    show_progress: bool,
}

impl BatchProcessor {
    pub fn new(downloader: Box<dyn Downloader>, tagger: Box<dyn Tagger>) -> Self {
        BatchProcessor {
            downloader,
            tagger,
            show_progress: true,
        }
    }

    /// Hide progress bars, e.g. when stdout is not a terminal or in tests.
    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub async fn process(
        &self,
        entries: Vec<LibraryEntry>,
        output_dir: &Path,
        label: &str,
    ) -> Result<BatchOutcome> {
        let len = entries.len() as u64;
        let progress = if self.show_progress {
            let bar = ProgressBar::new(len);
            bar.set_style(
                ProgressStyle::with_template(PROGRESS_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        } else {
            ProgressBar::hidden()
        };
        progress.set_prefix(label.to_string());

        let outcome = self
            .process_with_progress(entries, output_dir, &progress)
            .await;
        progress.finish();
        outcome
    }

    /// Same as [`BatchProcessor::process`], reporting to a caller-owned progress bar.
    ///
    /// The bar advances by exactly one per entry, whatever happened to it.
    pub async fn process_with_progress(
        &self,
        entries: Vec<LibraryEntry>,
        output_dir: &Path,
        progress: &ProgressBar,
    ) -> Result<BatchOutcome> {
        tokio::fs::create_dir_all(output_dir).await?;

        let mut outcome = BatchOutcome::default();
        for entry in entries {
            match self.process_entry(entry, output_dir, progress).await {
                TrackResult::Downloaded(file) => {
                    outcome.total_size += file.size;
                    outcome.files.push(file);
                }
                TrackResult::Skipped => outcome.skipped += 1,
                TrackResult::Failed => outcome.failed += 1,
            }
            progress.inc(1);
        }

        debug!(
            "Finished {output_dir:?}: {} downloaded, {} skipped, {} failed",
            outcome.files.len(),
            outcome.skipped,
            outcome.failed
        );
        Ok(outcome)
    }

    async fn process_entry(
        &self,
        entry: LibraryEntry,
        output_dir: &Path,
        progress: &ProgressBar,
    ) -> TrackResult {
        let Some(track) = entry.into_track() else {
            debug!("Skipping entry without a track");
            return TrackResult::Skipped;
        };
        let Some(filename) = canonical_filename(&track) else {
            warn!("Skipping \"{}\": no artist to search for", track.name);
            return TrackResult::Skipped;
        };

        let file_path = output_dir.join(&filename);
        if tokio::fs::try_exists(&file_path).await.unwrap_or(false) {
            progress.set_message(format!("Skipped: {}...", short(&filename)));
            return TrackResult::Skipped;
        }

        progress.set_message(format!("Downloading: {}...", short(&filename)));
        let Some(media) = download_track(self.downloader.as_ref(), &track, output_dir).await
        else {
            return TrackResult::Failed;
        };

        match self.finish_download(&media.path, file_path, &track).await {
            Ok(file) => {
                progress.set_message(format!("Downloaded: {}", format_size(file.size)));
                TrackResult::Downloaded(file)
            }
            Err(e) => {
                warn!("Error storing {:?} as {filename}: {e}", media.path);
                TrackResult::Failed
            }
        }
    }

    async fn finish_download(
        &self,
        raw_path: &Path,
        file_path: PathBuf,
        track: &Track,
    ) -> Result<DownloadedFile> {
        if raw_path != file_path {
            tokio::fs::rename(raw_path, &file_path).await?;
        }

        // A file without tags is still worth keeping
        if let Err(e) = self.tagger.write_tags(&file_path, track) {
            warn!("Error setting metadata for {file_path:?}: {e}");
        }

        let size = tokio::fs::metadata(&file_path).await?.len();
        Ok(DownloadedFile {
            path: file_path,
            size,
        })
    }
}

// First 15 characters, for status messages
fn short(name: &str) -> String {
    name.chars().take(15).collect()
}
