//! Core types for Marquee

use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Interval used when the playlist config has no usable value
pub const DEFAULT_INTERVAL_SECS: u64 = 10;

/// Label used when the playlist config carries no name
pub const DEFAULT_DISPLAY_NAME: &str = "Academia";

/// Identifier used when the page URL has no `academy_id`
pub const DEFAULT_ACADEMY_ID: &str = "default";

/// Unique identifier for a player session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// External identifier a playlist is fetched for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcademyId(String);

impl AcademyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AcademyId {
    fn default() -> Self {
        Self(DEFAULT_ACADEMY_ID.to_string())
    }
}

impl From<&str> for AcademyId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for AcademyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of media a playlist item holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

impl From<String> for MediaKind {
    /// Only `"video"` is special; everything else is shown as an image.
    fn from(value: String) -> Self {
        match value.as_str() {
            "video" => MediaKind::Video,
            _ => MediaKind::Image,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// One entry of a playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// Image or video
    #[serde(rename = "type", default)]
    pub kind: MediaKind,
    /// Where the media is served from; an item without one fails to load
    /// and is skipped like any other broken item
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    /// Original file name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Last modification time as sent by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

impl PlaylistItem {
    pub fn image(url: impl Into<String>) -> Self {
        Self::with_kind(MediaKind::Image, url)
    }

    pub fn video(url: impl Into<String>) -> Self {
        Self::with_kind(MediaKind::Video, url)
    }

    fn with_kind(kind: MediaKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            filename: None,
            size: None,
            last_modified: None,
        }
    }
}

/// Playback settings sent along with the playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistConfig {
    /// Seconds each item stays on screen (after a video ends)
    pub interval: Option<f64>,
    /// Restart from the first item after the last one
    #[serde(rename = "loop", deserialize_with = "null_as_default")]
    pub loop_playback: bool,
    /// Name shown next to the media
    #[serde(rename = "academy_name")]
    pub display_name: String,
    /// Backend hint to randomize order
    pub shuffle: bool,
    /// Backend hint for cross-fading; informational only
    pub fade_transition: bool,
    /// IANA timezone of the venue; informational only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            interval: None,
            loop_playback: true,
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            shuffle: false,
            fade_transition: true,
            timezone: None,
        }
    }
}

impl PlaylistConfig {
    /// Delay before advancing; zero, negative, non-finite or out-of-range
    /// values fall back to [`DEFAULT_INTERVAL_SECS`].
    pub fn interval(&self) -> Duration {
        let fallback = Duration::from_secs(DEFAULT_INTERVAL_SECS);
        match self.interval {
            Some(secs) if secs > 0.0 => Duration::try_from_secs_f64(secs).unwrap_or(fallback),
            _ => fallback,
        }
    }
}

/// Explicit `null` reads as the type's zero value (`false`, `""`), while an
/// absent field still takes the container default.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `GET /academies/{id}/playlist`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academy_id: Option<String>,
    #[serde(default)]
    pub media_list: Vec<PlaylistItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_config: Option<PlaylistConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}

/// Player lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerState {
    /// Fetching the playlist
    Loading,
    /// An item is on screen or playing
    Playing,
    /// Moving on to the next item
    LoadingNext,
    /// Sequence exhausted with looping disabled
    Idle,
    /// The initial fetch failed
    Error,
}

impl PlayerState {
    /// Check if transition to target state is valid
    pub fn can_transition_to(&self, target: PlayerState) -> bool {
        use PlayerState::*;
        matches!(
            (self, target),
            (Loading, Playing) | (Loading, Error) |
            (Playing, LoadingNext) | (Playing, Idle) |
            (LoadingNext, Playing) | (LoadingNext, LoadingNext) | (LoadingNext, Idle)
        )
    }

    /// No event can move the player out of a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, PlayerState::Idle | PlayerState::Error)
    }
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerState::Loading => write!(f, "loading"),
            PlayerState::Playing => write!(f, "playing"),
            PlayerState::LoadingNext => write!(f, "loading-next"),
            PlayerState::Idle => write!(f, "idle"),
            PlayerState::Error => write!(f, "error"),
        }
    }
}

/// Labels shown around the media
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusText {
    pub name: String,
    /// 1-based position of the item on screen
    pub current: usize,
    pub total: usize,
}

/// Player configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerOptions {
    /// Request timeout for the playlist fetch in milliseconds
    pub request_timeout_ms: u64,
    /// Apply the backend `shuffle` hint
    pub honor_shuffle: bool,
    /// Override the default `marquee/<version>` user agent
    pub user_agent: Option<String>,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            request_timeout_ms: 10_000,
            honor_shuffle: false,
            user_agent: None,
        }
    }
}
