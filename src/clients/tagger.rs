use std::path::Path;

use id3::{ErrorKind, Tag, TagLike, Version};
use log::debug;

use crate::clients::{entities::Track, errors::Result};

/// Writes track metadata onto a downloaded audio file.
pub trait Tagger: Send + Sync {
    fn write_tags(&self, path: &Path, track: &Track) -> Result<()>;
}

/// ID3v2.4 tagger for MP3 files.
#[derive(Debug, Default, Clone, Copy)]
pub struct Id3Tagger;

impl Tagger for Id3Tagger {
    fn write_tags(&self, path: &Path, track: &Track) -> Result<()> {
        // Keep whatever the transcoder already wrote, start fresh when nothing is there
        let mut tag = match Tag::read_from_path(path) {
            Ok(tag) => tag,
            Err(e) if matches!(e.kind, ErrorKind::NoTag) => Tag::new(),
            Err(e) => return Err(e.into()),
        };

        tag.set_title(track.name.as_str());
        if let Some(artist) = track.primary_artist() {
            tag.set_artist(artist.name.as_str());
        }
        tag.set_album(track.album.name.as_str());
        tag.write_to_path(path, Version::Id3v24)?;

        debug!("Tagged {path:?}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{
        entities::{Album, Artist},
        errors::Error,
    };

    fn track() -> Track {
        Track {
            id: None,
            name: "Windowlicker".to_string(),
            artists: vec![Artist {
                name: "Aphex Twin".to_string(),
            }],
            album: Album {
                name: "Windowlicker".to_string(),
            },
        }
    }

    #[test]
    fn writes_title_artist_and_album() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        std::fs::write(&path, vec![0u8; 256]).unwrap();

        Id3Tagger.write_tags(&path, &track()).unwrap();

        let tag = Tag::read_from_path(&path).unwrap();
        assert_eq!(tag.title(), Some("Windowlicker"));
        assert_eq!(tag.artist(), Some("Aphex Twin"));
        assert_eq!(tag.album(), Some("Windowlicker"));
    }

    #[test]
    fn retagging_replaces_previous_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        std::fs::write(&path, vec![0u8; 256]).unwrap();

        let mut first = track();
        first.name = "Old Title".to_string();
        Id3Tagger.write_tags(&path, &first).unwrap();
        Id3Tagger.write_tags(&path, &track()).unwrap();

        let tag = Tag::read_from_path(&path).unwrap();
        assert_eq!(tag.title(), Some("Windowlicker"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Id3Tagger.write_tags(&dir.path().join("missing.mp3"), &track());
        assert!(matches!(result, Err(Error::TagError(_))));
    }
}
