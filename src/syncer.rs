use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use log::{debug, info};

use crate::{
    batch::BatchProcessor,
    clients::{
        entities::{LibraryEntry, Playlist},
        errors::{Error, Result},
        library::MusicLibrary,
        tagger::{Id3Tagger, Tagger},
        youtube::{Downloader, YtDlpDownloader, YtDlpOptions},
    },
    paths::sanitize_filename,
    report::SyncReport,
};

/// Spotify caps the recently played endpoint at a single page of 50.
pub const MAX_RECENT_LIMIT: u32 = 50;

/// A group of tracks downloaded into its own directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collection {
    RecentlyPlayed,
    LikedSongs,
    Playlist(Playlist),
}

impl Collection {
    /// Directory name below the base path.
    ///
    /// Playlist names that sanitize to nothing but dots or nothing at all would
    /// point at the base directory or its parent, so the playlist id is used instead.
    pub fn dir_name(&self) -> String {
        match self {
            Collection::RecentlyPlayed => "Recently Played".to_string(),
            Collection::LikedSongs => "Liked Songs".to_string(),
            Collection::Playlist(p) => {
                let name = sanitize_filename(&p.name);
                if name.chars().all(|c| c == '.' || c.is_whitespace()) {
                    sanitize_filename(&p.id)
                } else {
                    name
                }
            }
        }
    }

    /// Label shown next to the progress bar.
    pub fn label(&self) -> String {
        match self {
            Collection::RecentlyPlayed => "Recent Tracks".to_string(),
            Collection::LikedSongs => "Liked Songs".to_string(),
            Collection::Playlist(p) => {
                let short: String = p.name.chars().take(15).collect();
                format!("Playlist: {short}...")
            }
        }
    }

    /// Name used in the summary.
    pub fn name(&self) -> &str {
        match self {
            Collection::RecentlyPlayed => "Recently Played",
            Collection::LikedSongs => "Liked Songs",
            Collection::Playlist(p) => &p.name,
        }
    }
}

// Configuration for the Syncer Struct
pub struct Config {
    pub library: Box<dyn MusicLibrary>,
    pub processor: BatchProcessor,
    pub base_path: PathBuf,
    pub recent_limit: u32,
    pub include_recent: bool,
    pub include_liked: bool,
    pub include_playlists: bool,
}

pub struct ConfigBuilder {
    library: Option<Box<dyn MusicLibrary>>,
    downloader: Option<Box<dyn Downloader>>,
    tagger: Option<Box<dyn Tagger>>,
    downloader_options: YtDlpOptions,
    yt_dlp_binary: Option<PathBuf>,
    base_path: PathBuf,
    recent_limit: u32,
    include_recent: bool,
    include_liked: bool,
    include_playlists: bool,
    show_progress: bool,
}

impl ConfigBuilder {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            library: None,
            downloader: None,
            tagger: None,
            downloader_options: YtDlpOptions::default(),
            yt_dlp_binary: None,
            base_path: base_path.into(),
            recent_limit: MAX_RECENT_LIMIT,
            include_recent: true,
            include_liked: true,
            include_playlists: true,
            show_progress: true,
        }
    }

    #[must_use]
    pub fn library(mut self, library: impl MusicLibrary + 'static) -> Self {
        self.library = Some(Box::new(library));
        self
    }

    #[must_use]
    pub fn downloader(mut self, downloader: impl Downloader + 'static) -> Self {
        self.downloader = Some(Box::new(downloader));
        self
    }

    #[must_use]
    pub fn tagger(mut self, tagger: impl Tagger + 'static) -> Self {
        self.tagger = Some(Box::new(tagger));
        self
    }

    #[must_use]
    pub fn downloader_options(mut self, options: YtDlpOptions) -> Self {
        self.downloader_options = options;
        self
    }

    #[must_use]
    pub fn yt_dlp_binary(mut self, binary: Option<PathBuf>) -> Self {
        self.yt_dlp_binary = binary;
        self
    }

    #[must_use]
    pub fn recent_limit(mut self, limit: u32) -> Self {
        self.recent_limit = limit;
        self
    }

    #[must_use]
    pub fn include_recent(mut self, include: bool) -> Self {
        self.include_recent = include;
        self
    }

    #[must_use]
    pub fn include_liked(mut self, include: bool) -> Self {
        self.include_liked = include;
        self
    }

    #[must_use]
    pub fn include_playlists(mut self, include: bool) -> Self {
        self.include_playlists = include;
        self
    }

    #[must_use]
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn build(self) -> Result<Config> {
        let library = self.library.ok_or_else(|| {
            Error::ConfigurationError("No music library client configured".into())
        })?;
        if !(1..=MAX_RECENT_LIMIT).contains(&self.recent_limit) {
            return Err(Error::ConfigurationError(format!(
                "Recently played limit must be between 1 and {MAX_RECENT_LIMIT}, got {}",
                self.recent_limit
            )));
        }
        let downloader: Box<dyn Downloader> = match (self.downloader, self.yt_dlp_binary) {
            (Some(d), _) => d,
            (None, Some(binary)) => Box::new(YtDlpDownloader::new(binary, self.downloader_options)),
            (None, None) => Box::new(YtDlpDownloader::try_default(self.downloader_options)?),
        };
        let tagger: Box<dyn Tagger> = self.tagger.unwrap_or_else(|| Box::new(Id3Tagger));

        Ok(Config {
            library,
            processor: BatchProcessor::new(downloader, tagger).with_progress(self.show_progress),
            base_path: self.base_path,
            recent_limit: self.recent_limit,
            include_recent: self.include_recent,
            include_liked: self.include_liked,
            include_playlists: self.include_playlists,
        })
    }
}

// The main Syncer struct that downloads every collection in turn
pub struct Syncer {
    config: Config,
}

impl Syncer {
    pub fn new(config: Config) -> Self {
        Syncer { config }
    }

    pub async fn sync(&self) -> Result<SyncReport> {
        let start = Instant::now();
        let mut report = SyncReport::default();
        let base = self.config.base_path.as_path();

        info!("Starting download into {base:?} ...");
        tokio::fs::create_dir_all(base).await?;

        if self.config.include_recent {
            info!("Fetching recently played tracks ...");
            let entries = self
                .config
                .library
                .recently_played(self.config.recent_limit)
                .await?;
            self.run_collection(&Collection::RecentlyPlayed, entries, base, &mut report)
                .await?;
        }

        if self.config.include_liked {
            info!("Fetching saved tracks ...");
            let entries = self.config.library.saved_tracks().await?;
            self.run_collection(&Collection::LikedSongs, entries, base, &mut report)
                .await?;
        }

        if self.config.include_playlists {
            info!("Fetching playlists ...");
            let playlists = self.config.library.owned_playlists().await?;
            debug!("{} owned playlists", playlists.len());
            for playlist in playlists {
                info!("Processing playlist: {}", playlist.name);
                let entries = self.config.library.playlist_tracks(&playlist).await?;
                self.run_collection(&Collection::Playlist(playlist), entries, base, &mut report)
                    .await?;
            }
        }

        report.elapsed = start.elapsed();
        info!(
            "Download completed. Downloaded files: {}",
            report.total_files()
        );
        Ok(report)
    }

    async fn run_collection(
        &self,
        collection: &Collection,
        entries: Vec<LibraryEntry>,
        base: &Path,
        report: &mut SyncReport,
    ) -> Result<()> {
        debug!("{} entries in {}", entries.len(), collection.name());
        let output_dir = base.join(collection.dir_name());
        let outcome = self
            .config
            .processor
            .process(entries, &output_dir, &collection.label())
            .await?;
        report.record(collection.name(), outcome);
        Ok(())
    }
}
