//! Spoty2tube - Download a Spotify library as tagged MP3 files
//!
//! This library walks your recently played tracks, liked songs and own playlists,
//! finds every track on YouTube, downloads it as MP3 and writes its metadata.
//! Files that already exist are never downloaded twice.

/// Downloading a single collection
pub mod batch;
/// Client modules for interacting with external services
pub mod clients;
/// Canonical file names
pub mod paths;
/// Summary of a run
pub mod report;
/// Runs every collection in turn
pub mod syncer;
