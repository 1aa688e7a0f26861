use rspotify::{ClientError, model::IdError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to parse downloader output, error: {0}")]
    ParseError(String),

    #[error("Spotify error: {0}")]
    SpotifyError(#[from] ClientError),

    #[error("Invalid Spotify id: {0}")]
    InvalidId(#[from] IdError),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Download of \"{query}\" failed: {message}")]
    DownloadError { query: String, message: String },

    #[error("No match found for \"{0}\"")]
    NoMatch(String),

    #[error("Tagging error: {0}")]
    TagError(#[from] id3::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ParseError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
