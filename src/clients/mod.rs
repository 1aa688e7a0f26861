/// Data entities for tracks, playlists and downloads
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// Provider independent library access and pagination
pub mod library;
/// Spotify API client
pub mod spotify;
/// ID3 tag writer
pub mod tagger;
/// yt-dlp based search and download
pub mod youtube;

pub use library::MusicLibrary;
pub use spotify::SpotifyClient;
pub use tagger::{Id3Tagger, Tagger};
pub use youtube::{Downloader, YtDlpDownloader};
