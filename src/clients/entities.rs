use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Artist {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Album {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub album: Album,
}

impl Track {
    /// First credited artist; used for the search query, the filename and the tags.
    pub fn primary_artist(&self) -> Option<&Artist> {
        self.artists.first()
    }
}

/// One item of a library listing.
///
/// Saved tracks and playlist items come wrapped together with their
/// `added_at` metadata, and playlist items may carry no track at all
/// (removed tracks, podcast episodes). Recently played entries are bare.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LibraryEntry {
    // Tried first: a wrapper object has no `name`/`artists` and falls through.
    Bare(Track),
    Wrapped { track: Option<Track> },
}

impl LibraryEntry {
    pub fn into_track(self) -> Option<Track> {
        match self {
            LibraryEntry::Bare(track) => Some(track),
            LibraryEntry::Wrapped { track } => track,
        }
    }
}

impl From<Track> for LibraryEntry {
    fn from(track: Track) -> Self {
        LibraryEntry::Bare(track)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner_id: String,
}

/// What the download engine reports for a finished download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedMedia {
    /// Title of the matched video, which the engine used to name `path`.
    pub title: String,
    pub source_url: Option<String>,
    /// Raw file as left by the engine, before it is renamed to its canonical name.
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub path: PathBuf,
    pub size: u64,
}
