//! Playlist sequencing
//!
//! Holds the fetched items and the playback cursor. The cursor only moves
//! forward; the loop policy is applied at the end of the list.

use crate::{
    error::Error,
    types::{PlaylistConfig, PlaylistItem, PlaylistResponse},
    Result,
};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;

/// Result of moving the cursor forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the given index
    Next(usize),
    /// Passed the end and looped back to the first item
    Wrapped,
    /// Passed the end with looping disabled; the cursor did not move
    Exhausted,
}

/// Fetched playlist plus the index of the item on screen
#[derive(Debug, Clone)]
pub struct Playlist {
    items: Vec<PlaylistItem>,
    current_index: usize,
    config: PlaylistConfig,
    fetched_at: DateTime<Utc>,
}

impl Playlist {
    /// Build a playlist; an empty item list is a fatal error
    pub fn new(items: Vec<PlaylistItem>, config: PlaylistConfig) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::EmptyPlaylist);
        }

        Ok(Self {
            items,
            current_index: 0,
            config,
            fetched_at: Utc::now(),
        })
    }

    /// Build a playlist from the wire response
    pub fn from_response(response: PlaylistResponse) -> Result<Self> {
        Self::new(
            response.media_list,
            response.playlist_config.unwrap_or_default(),
        )
    }

    /// Shuffle the items once and restart from the first one
    pub fn shuffle(&mut self) {
        self.items.shuffle(&mut rand::rng());
        self.current_index = 0;
    }

    /// Move to the next item, applying the loop policy at the boundary
    pub fn advance(&mut self) -> Advance {
        let next = self.current_index + 1;
        if next < self.items.len() {
            self.current_index = next;
            Advance::Next(next)
        } else if self.config.loop_playback {
            self.current_index = 0;
            Advance::Wrapped
        } else {
            Advance::Exhausted
        }
    }

    pub fn current(&self) -> &PlaylistItem {
        &self.items[self.current_index]
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Never true; construction rejects empty lists
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[PlaylistItem] {
        &self.items
    }

    pub fn config(&self) -> &PlaylistConfig {
        &self.config
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(loop_playback: bool) -> PlaylistConfig {
        PlaylistConfig {
            loop_playback,
            ..Default::default()
        }
    }

    fn items(n: usize) -> Vec<PlaylistItem> {
        (0..n)
            .map(|i| PlaylistItem::image(format!("https://cdn.example.com/{i}.jpg")))
            .collect()
    }

    #[test]
    fn test_empty_playlist_rejected() {
        let err = Playlist::new(Vec::new(), config(true)).unwrap_err();
        assert!(matches!(err, Error::EmptyPlaylist));
    }

    #[test]
    fn test_loop_returns_to_start_after_len_advances() {
        for n in 1..6 {
            let mut playlist = Playlist::new(items(n), config(true)).unwrap();
            for _ in 0..n {
                playlist.advance();
            }
            assert_eq!(playlist.current_index(), 0, "len {n}");
        }
    }

    #[test]
    fn test_wrap_reported() {
        let mut playlist = Playlist::new(items(2), config(true)).unwrap();
        assert_eq!(playlist.advance(), Advance::Next(1));
        assert_eq!(playlist.advance(), Advance::Wrapped);
        assert_eq!(playlist.current_index(), 0);
    }

    #[test]
    fn test_no_loop_stays_on_last_item() {
        let mut playlist = Playlist::new(items(2), config(false)).unwrap();
        assert_eq!(playlist.advance(), Advance::Next(1));
        assert_eq!(playlist.advance(), Advance::Exhausted);
        assert_eq!(playlist.advance(), Advance::Exhausted);
        assert_eq!(playlist.current_index(), 1);
    }

    #[test]
    fn test_single_item_no_loop() {
        let mut playlist = Playlist::new(items(1), config(false)).unwrap();
        assert_eq!(playlist.advance(), Advance::Exhausted);
        assert_eq!(playlist.current_index(), 0);
    }

    #[test]
    fn test_shuffle_keeps_items() {
        let mut playlist = Playlist::new(items(8), config(true)).unwrap();
        playlist.advance();
        playlist.shuffle();

        assert_eq!(playlist.current_index(), 0);
        let mut urls: Vec<_> = playlist.items().iter().map(|i| i.url.clone()).collect();
        urls.sort();
        let mut expected: Vec<_> = items(8).into_iter().map(|i| i.url).collect();
        expected.sort();
        assert_eq!(urls, expected);
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let response = PlaylistResponse {
            media_list: items(1),
            ..Default::default()
        };
        let playlist = Playlist::from_response(response).unwrap();
        assert!(playlist.config().loop_playback);
        assert_eq!(playlist.config().display_name, "Academia");
    }
}
