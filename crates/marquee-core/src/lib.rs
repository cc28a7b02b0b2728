//! Marquee Core - Slideshow Player Library
//!
//! This crate provides the core functionality for playlist playback:
//! - Fetching a playlist and its config from the playlist API
//! - Sequencing images and videos with interval timing
//! - Looping or halting at the end of the list
//! - Skipping items that fail to load or play
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Marquee Core                       │
//! ├─────────────────────────────────────────────────────────┤
//! │                                                         │
//! │  ┌──────────────┐                  ┌──────────────┐     │
//! │  │   Playlist   │                  │   Playlist   │     │
//! │  │   Fetcher    │                  │   (cursor)   │     │
//! │  └──────┬───────┘                  └──────┬───────┘     │
//! │         │                                 │             │
//! │         └──────────────┬──────────────────┘             │
//! │                        │                                │
//! │                 ┌──────┴──────┐                         │
//! │                 │  Playlist   │◄──── timers             │
//! │                 │   Player    │◄──── media events       │
//! │                 └──────┬──────┘                         │
//! │                        │                                │
//! │         ┌──────────────┴──────────────┐                 │
//! │  ┌──────┴───────┐              ┌──────┴───────┐         │
//! │  │   Display    │              │    Media     │         │
//! │  │   Surface    │              │   Backend    │         │
//! │  └──────────────┘              └──────────────┘         │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod types;
pub mod fetch;
pub mod playlist;
pub mod display;
pub mod media;
pub mod player;

pub use error::{Error, MediaFailure, Result};
pub use types::*;
pub use fetch::{
    academy_id_from_page_url, playlist_url, HttpFetcher, PlaylistFetcher, DEFAULT_USER_AGENT,
};
pub use playlist::{Advance, Playlist};
pub use display::DisplaySurface;
pub use media::{Generation, MediaBackend, MediaEvent, MediaTicket, PlayerEvent};
pub use player::PlaylistPlayer;

