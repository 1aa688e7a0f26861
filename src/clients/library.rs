use std::future::Future;

use futures::stream::{self, TryStreamExt};
use log::debug;

use crate::clients::{
    entities::{LibraryEntry, Playlist},
    errors::Result,
};

/// Access to the user's music library, independent of the streaming provider.
///
/// Production implementation lives in [`crate::clients::spotify`].
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MusicLibrary: Send + Sync {
    /// Most recently played tracks, newest first. A single page of at most `limit` entries.
    async fn recently_played(&self, limit: u32) -> Result<Vec<LibraryEntry>>;

    /// Every saved ("liked") track.
    async fn saved_tracks(&self) -> Result<Vec<LibraryEntry>>;

    /// Playlists owned by the authenticated user. Followed playlists are left out.
    async fn owned_playlists(&self) -> Result<Vec<Playlist>>;

    /// Every item of a playlist.
    async fn playlist_tracks(&self, playlist: &Playlist) -> Result<Vec<LibraryEntry>>;
}

/// A single page of an offset-paginated listing.
#[derive(Debug)]
pub struct PageChunk<T> {
    pub items: Vec<T>,
    /// Offset of the following page, `None` on the last one.
    pub next_offset: Option<u32>,
}

/// Follows `next_offset` from offset 0 until the listing is exhausted and
/// returns all items in page order.
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<PageChunk<T>>>,
{
    let pages = stream::try_unfold(Some(0u32), move |offset| {
        let next = offset.map(&mut fetch);
        async move {
            match next {
                None => Ok(None),
                Some(page) => page.await.map(|page| {
                    debug!(
                        "Fetched page with {} items, next offset: {:?}",
                        page.items.len(),
                        page.next_offset
                    );
                    Some((page.items, page.next_offset))
                }),
            }
        }
    });

    let pages: Vec<Vec<T>> = pages.try_collect().await?;
    Ok(pages.into_iter().flatten().collect())
}

/// Keeps the playlists whose owner is `user_id`.
pub fn owned_by(playlists: Vec<Playlist>, user_id: &str) -> Vec<Playlist> {
    playlists
        .into_iter()
        .filter(|p| p.owner_id == user_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::errors::Error;

    fn paged(pages: Vec<Vec<u32>>) -> impl FnMut(u32) -> std::future::Ready<Result<PageChunk<u32>>> {
        // Offsets are item positions, as in the Spotify API.
        let mut starts = Vec::new();
        let mut offset = 0;
        for page in &pages {
            starts.push(offset);
            offset += u32::try_from(page.len()).unwrap();
        }
        move |offset| {
            let index = starts.iter().position(|s| *s == offset).unwrap();
            let next_offset = starts.get(index + 1).copied();
            std::future::ready(Ok(PageChunk {
                items: pages[index].clone(),
                next_offset,
            }))
        }
    }

    #[tokio::test]
    async fn collects_every_page_in_order() {
        let items = collect_pages(paged(vec![vec![1, 2], vec![3, 4], vec![5]]))
            .await
            .unwrap();
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn single_page_without_cursor() {
        let items = collect_pages(paged(vec![vec![7, 8, 9]])).await.unwrap();
        assert_eq!(items, vec![7, 8, 9]);
    }

    #[tokio::test]
    async fn requests_each_page_once() {
        let mut requested = Vec::new();
        let mut inner = paged(vec![vec![1], vec![2], vec![3]]);
        let items = collect_pages(|offset| {
            requested.push(offset);
            inner(offset)
        })
        .await
        .unwrap();
        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(requested, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn page_error_is_propagated() {
        let result: Result<Vec<u32>> = collect_pages(|offset| {
            std::future::ready(if offset == 0 {
                Ok(PageChunk {
                    items: vec![1],
                    next_offset: Some(1),
                })
            } else {
                Err(Error::ConfigurationError("boom".into()))
            })
        })
        .await;
        assert!(matches!(result, Err(Error::ConfigurationError(_))));
    }

    #[test]
    fn keeps_only_owned_playlists() {
        let playlist = |id: &str, owner: &str| Playlist {
            id: id.to_string(),
            name: format!("Playlist {id}"),
            owner_id: owner.to_string(),
        };
        let owned = owned_by(
            vec![playlist("1", "me"), playlist("2", "someone"), playlist("3", "me")],
            "me",
        );
        let ids: Vec<_> = owned.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }
}
