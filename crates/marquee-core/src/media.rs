//! Media loading capability
//!
//! Loading an image or running a video is asynchronous. The player hands a
//! [`MediaBackend`] a [`MediaTicket`] for every request and the backend
//! reports what happened through it. Tickets are stamped with the render
//! generation they belong to, so reports about an item that is no longer
//! on screen are dropped by the player.

use crate::error::MediaFailure;
use tokio::sync::mpsc;

/// Render counter; bumped every time the player starts a new item
pub type Generation = u64;

/// Outcome reported by a media backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaEvent {
    /// Off-screen image decoded successfully
    ImageDecoded,
    /// Off-screen image failed to load or decode
    ImageFailed,
    /// Enough video data is available to start playback
    VideoReady,
    /// Playback was refused (e.g. autoplay policy)
    VideoRejected,
    /// Video reached its natural end
    VideoEnded,
    /// Video failed to load or play
    VideoFailed,
}

impl MediaEvent {
    /// The transient failure this event stands for, if any
    pub fn failure(&self, url: &str) -> Option<MediaFailure> {
        let url = url.to_string();
        match self {
            MediaEvent::ImageFailed => Some(MediaFailure::ImageDecode { url }),
            MediaEvent::VideoRejected => Some(MediaFailure::PlaybackRejected { url }),
            MediaEvent::VideoFailed => Some(MediaFailure::Playback { url }),
            MediaEvent::ImageDecoded | MediaEvent::VideoReady | MediaEvent::VideoEnded => None,
        }
    }
}

/// Events consumed by the player loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    Media {
        generation: Generation,
        event: MediaEvent,
    },
    IntervalElapsed {
        generation: Generation,
    },
}

impl PlayerEvent {
    pub fn generation(&self) -> Generation {
        match self {
            PlayerEvent::Media { generation, .. } | PlayerEvent::IntervalElapsed { generation } => {
                *generation
            }
        }
    }
}

/// Return address for one media request
#[derive(Debug, Clone)]
pub struct MediaTicket {
    generation: Generation,
    tx: mpsc::UnboundedSender<PlayerEvent>,
}

impl MediaTicket {
    pub fn new(generation: Generation, tx: mpsc::UnboundedSender<PlayerEvent>) -> Self {
        Self { generation, tx }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Report an outcome. Returns false once the player has gone away.
    pub fn notify(&self, event: MediaEvent) -> bool {
        self.tx
            .send(PlayerEvent::Media {
                generation: self.generation,
                event,
            })
            .is_ok()
    }
}

/// Trait for media front ends
///
/// Implementations must not block; long work is spawned and reported later
/// through the ticket. Each request must produce at most one terminal
/// report, except video loading which reports `VideoReady` and later
/// `VideoEnded` or `VideoFailed`.
pub trait MediaBackend: Send {
    /// Load and decode an image off-screen
    fn preload_image(&mut self, url: &str, ticket: MediaTicket);

    /// Point the video surface at a source and start buffering
    fn load_video(&mut self, url: &str, ticket: MediaTicket);

    /// Start playback of a loaded video
    fn play_video(&mut self, url: &str, ticket: MediaTicket);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_stamps_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ticket = MediaTicket::new(7, tx);

        assert!(ticket.notify(MediaEvent::VideoReady));
        assert_eq!(
            rx.try_recv().unwrap(),
            PlayerEvent::Media {
                generation: 7,
                event: MediaEvent::VideoReady
            }
        );
    }

    #[test]
    fn test_ticket_reports_closed_player() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        assert!(!MediaTicket::new(1, tx).notify(MediaEvent::ImageDecoded));
    }

    #[test]
    fn test_failure_mapping() {
        assert_eq!(
            MediaEvent::VideoRejected.failure("v.mp4"),
            Some(MediaFailure::PlaybackRejected { url: "v.mp4".into() })
        );
        assert_eq!(MediaEvent::VideoEnded.failure("v.mp4"), None);
    }
}
