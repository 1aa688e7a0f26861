//! Deterministic file and directory names for downloaded tracks.

use crate::clients::entities::Track;

/// Characters that are not allowed in file names on at least one common platform.
const INVALID_CHARS: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Extension of every file written to the library.
pub const AUDIO_EXTENSION: &str = "mp3";

/// Removes characters that are invalid in file names.
pub fn sanitize_filename(name: &str) -> String {
    name.chars().filter(|c| !INVALID_CHARS.contains(c)).collect()
}

/// `<Title> - <Primary Artist>.mp3`, sanitized.
///
/// This name doubles as the "already downloaded" marker: a file existing under
/// it is never downloaded again. Returns `None` for tracks without any artist.
pub fn canonical_filename(track: &Track) -> Option<String> {
    let artist = track.primary_artist()?;
    Some(format!(
        "{} - {}.{AUDIO_EXTENSION}",
        sanitize_filename(&track.name),
        sanitize_filename(&artist.name)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::entities::{Album, Artist};

    fn track(name: &str, artist: &str) -> Track {
        Track {
            id: None,
            name: name.to_string(),
            artists: vec![Artist {
                name: artist.to_string(),
            }],
            album: Album::default(),
        }
    }

    #[test]
    fn strips_every_invalid_character() {
        let sanitized = sanitize_filename(r#"a\b/c*d?e:f"g<h>i|j"#);
        assert_eq!(sanitized, "abcdefghij");
    }

    #[test]
    fn keeps_other_punctuation() {
        assert_eq!(sanitize_filename("Don't Stop (Remix) - Live!"), "Don't Stop (Remix) - Live!");
    }

    #[test]
    fn canonical_filename_has_no_invalid_characters() {
        let name = canonical_filename(&track("What? <Live>", "AC/DC")).unwrap();
        assert_eq!(name, "What Live - ACDC.mp3");
        let stem = name.trim_end_matches(".mp3");
        assert!(!stem.contains(INVALID_CHARS));
    }

    #[test]
    fn canonical_filename_uses_primary_artist() {
        let mut t = track("Song", "Lead");
        t.artists.push(Artist {
            name: "Feature".to_string(),
        });
        assert_eq!(canonical_filename(&t).unwrap(), "Song - Lead.mp3");
    }

    #[test]
    fn track_without_artist_has_no_filename() {
        let mut t = track("Song", "Lead");
        t.artists.clear();
        assert_eq!(canonical_filename(&t), None);
    }
}
