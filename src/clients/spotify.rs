use std::path::PathBuf;

use log::debug;

use crate::clients::{
    entities::{Album, Artist, LibraryEntry, Playlist, Track},
    errors::{Error, Result},
    library::{MusicLibrary, PageChunk, collect_pages, owned_by},
};
use rspotify::{
    AuthCodeSpotify, Config, Credentials, OAuth,
    model::{FullTrack, Page, PlayableItem, PlaylistId, PlaylistItem, SimplifiedPlaylist},
    prelude::*,
    scopes,
};

/// Largest page size accepted by the Spotify Web API.
const PAGE_LIMIT: u32 = 50;

impl From<FullTrack> for Track {
    fn from(f: FullTrack) -> Track {
        Track {
            id: f.id.map(|id| id.id().to_string()),
            name: f.name,
            artists: f
                .artists
                .into_iter()
                .map(|a| Artist { name: a.name })
                .collect(),
            album: Album { name: f.album.name },
        }
    }
}

impl From<PlaylistItem> for LibraryEntry {
    fn from(item: PlaylistItem) -> LibraryEntry {
        // Episodes and unavailable items carry no track to download
        let track = match item.track {
            Some(PlayableItem::Track(track)) => Some(Track::from(track)),
            _ => None,
        };
        LibraryEntry::Wrapped { track }
    }
}

impl From<SimplifiedPlaylist> for Playlist {
    fn from(p: SimplifiedPlaylist) -> Playlist {
        Playlist {
            id: p.id.id().to_string(),
            name: p.name,
            owner_id: p.owner.id.id().to_string(),
        }
    }
}

fn chunk<T: serde::de::DeserializeOwned, U>(page: Page<T>, map: impl FnMut(T) -> U) -> PageChunk<U> {
    let fetched = u32::try_from(page.items.len()).unwrap_or(u32::MAX);
    // An empty page with a cursor would loop forever
    let next_offset = match page.next {
        Some(_) if fetched > 0 => Some(page.offset.saturating_add(fetched)),
        _ => None,
    };
    PageChunk {
        items: page.items.into_iter().map(map).collect(),
        next_offset,
    }
}

/// Spotify credentials and OAuth settings.
#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

pub struct SpotifyClient {
    pub spotify: AuthCodeSpotify,
}

impl SpotifyClient {
    pub fn new(spotify: AuthCodeSpotify) -> Self {
        SpotifyClient { spotify }
    }

    // Authorize the Spotify client via CLI prompt and OAuth flow.
    // A cached token is reused and refreshed when present.
    pub async fn authorize_client(&self) -> Result<()> {
        debug!("Starting Spotify authorization ...");
        let url = self.spotify.get_authorize_url(false)?;
        self.spotify.prompt_for_token(&url).await?;
        let user = self.spotify.me().await?;
        debug!("Authenticated as user: {:?}", user.display_name);
        Ok(())
    }

    pub fn from_settings(settings: &SpotifySettings) -> Self {
        let creds = Credentials::new(&settings.client_id, &settings.client_secret);
        let oauth = OAuth {
            redirect_uri: settings.redirect_uri.clone(),
            scopes: scopes!(
                "user-library-read",
                "user-read-recently-played",
                "playlist-read-private"
            ),
            ..Default::default()
        };

        let cache_path = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp")) // Fallback to /tmp if cache directory can't be determined
            .join(".spoty2tube_token_cache");

        let spotify = AuthCodeSpotify::with_config(
            creds,
            oauth,
            Config {
                token_cached: true,
                cache_path,
                ..Default::default()
            },
        );

        Self::new(spotify)
    }
}

#[async_trait::async_trait]
impl MusicLibrary for SpotifyClient {
    async fn recently_played(&self, limit: u32) -> Result<Vec<LibraryEntry>> {
        let page = self
            .spotify
            .current_user_recently_played(Some(limit.min(PAGE_LIMIT)), None)
            .await?;
        debug!("Fetched {} recently played tracks", page.items.len());
        Ok(page
            .items
            .into_iter()
            .map(|history| LibraryEntry::Bare(Track::from(history.track)))
            .collect())
    }

    async fn saved_tracks(&self) -> Result<Vec<LibraryEntry>> {
        let tracks = collect_pages(|offset| async move {
            let page = self
                .spotify
                .current_user_saved_tracks_manual(None, Some(PAGE_LIMIT), Some(offset))
                .await?;
            Ok::<_, Error>(chunk(page, |saved| LibraryEntry::Wrapped {
                track: Some(Track::from(saved.track)),
            }))
        })
        .await?;
        debug!("Fetched {} saved tracks", tracks.len());
        Ok(tracks)
    }

    async fn owned_playlists(&self) -> Result<Vec<Playlist>> {
        let user = self.spotify.me().await?;
        let playlists: Vec<Playlist> = collect_pages(|offset| async move {
            let page = self
                .spotify
                .current_user_playlists_manual(Some(PAGE_LIMIT), Some(offset))
                .await?;
            Ok::<_, Error>(chunk(page, Playlist::from))
        })
        .await?;
        let owned = owned_by(playlists, user.id.id());
        debug!("Found {} playlists owned by {}", owned.len(), user.id.id());
        Ok(owned)
    }

    async fn playlist_tracks(&self, playlist: &Playlist) -> Result<Vec<LibraryEntry>> {
        let playlist_id = PlaylistId::from_id(playlist.id.as_str())?;
        let items = collect_pages(|offset| {
            let playlist_id = playlist_id.clone();
            async move {
                let page = self
                    .spotify
                    .playlist_items_manual(
                        playlist_id,
                        None,
                        None,
                        Some(PAGE_LIMIT),
                        Some(offset),
                    )
                    .await?;
                Ok::<_, Error>(chunk(page, LibraryEntry::from))
            }
        })
        .await?;
        debug!("Fetched {} items of playlist {}", items.len(), playlist.name);
        Ok(items)
    }
}
