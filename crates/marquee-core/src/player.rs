//! Playlist Player - Main orchestrator for a slideshow session
//!
//! Coordinates:
//! - The one-shot playlist fetch
//! - Rendering the current item through the display and media capabilities
//! - Interval timers and media events
//! - Advancing with loop and skip-on-error policies
//!
//! Everything runs on one event loop. Each render bumps a generation counter
//! and every timer or media report carries the generation it was issued
//! for; reports from an earlier generation are ignored, so an item can only
//! be advanced past once.

use crate::{
    display::DisplaySurface,
    error::Error,
    fetch::PlaylistFetcher,
    media::{Generation, MediaBackend, MediaEvent, MediaTicket, PlayerEvent},
    playlist::{Advance, Playlist},
    types::*,
    Result,
};
use std::time::Instant;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};

/// Player session cycling through one playlist
pub struct PlaylistPlayer<F, D, M> {
    /// Unique session ID
    id: SessionId,
    /// Player configuration
    options: PlayerOptions,
    /// Playlist source
    fetcher: F,
    /// Visible surfaces
    display: D,
    /// Media loading front end
    media: M,
    /// Current lifecycle state
    state: PlayerState,
    /// State change broadcaster
    state_tx: watch::Sender<PlayerState>,
    /// Fetched playlist, set once by `initialize`
    playlist: Option<Playlist>,
    /// Generation of the item in flight
    generation: Generation,
    /// Number of render calls so far
    renders: u64,
    events_tx: mpsc::UnboundedSender<PlayerEvent>,
    events_rx: mpsc::UnboundedReceiver<PlayerEvent>,
    /// Session start time
    start_time: Instant,
}

impl<F, D, M> PlaylistPlayer<F, D, M>
where
    F: PlaylistFetcher,
    D: DisplaySurface,
    M: MediaBackend,
{
    /// Create a new player in the `Loading` state
    pub fn new(fetcher: F, display: D, media: M, options: PlayerOptions) -> Self {
        let (state_tx, _) = watch::channel(PlayerState::Loading);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            id: SessionId::new(),
            options,
            fetcher,
            display,
            media,
            state: PlayerState::Loading,
            state_tx,
            playlist: None,
            generation: 0,
            renders: 0,
            events_tx,
            events_rx,
            start_time: Instant::now(),
        }
    }

    /// Get session ID
    pub fn session_id(&self) -> SessionId {
        self.id
    }

    /// Get current state
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Subscribe to state changes
    pub fn subscribe_state(&self) -> watch::Receiver<PlayerState> {
        self.state_tx.subscribe()
    }

    /// Fetched playlist, if initialization succeeded
    pub fn playlist(&self) -> Option<&Playlist> {
        self.playlist.as_ref()
    }

    /// Index of the item on screen
    pub fn current_index(&self) -> Option<usize> {
        self.playlist.as_ref().map(Playlist::current_index)
    }

    /// Number of items rendered so far
    pub fn renders(&self) -> u64 {
        self.renders
    }

    /// Transition to new state
    fn set_state(&mut self, new_state: PlayerState) -> Result<()> {
        let current = self.state;
        if current == new_state {
            return Ok(());
        }

        if !current.can_transition_to(new_state) {
            return Err(Error::InvalidStateTransition {
                from: current.to_string(),
                to: new_state.to_string(),
            });
        }

        self.state = new_state;
        self.state_tx.send_replace(new_state);

        debug!(from = %current, to = %new_state, "State transition");

        Ok(())
    }

    fn transition(&mut self, new_state: PlayerState) {
        if let Err(e) = self.set_state(new_state) {
            warn!(error = %e, "Ignoring state change");
        }
    }

    /// Fetch the playlist and start the first item.
    ///
    /// Any failure is fatal: the error is shown on the display, the player
    /// moves to `Error` and never plays.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn initialize(&mut self, academy: &AcademyId) -> Result<()> {
        if self.state != PlayerState::Loading || self.playlist.is_some() {
            return Err(Error::InvalidStateTransition {
                from: self.state.to_string(),
                to: PlayerState::Loading.to_string(),
            });
        }

        info!(academy = %academy, "Loading playlist");
        self.display.show_loading();

        let playlist = match self.load(academy).await {
            Ok(playlist) => playlist,
            Err(e) => {
                error!(code = e.error_code(), error = %e, "Playlist unavailable");
                self.display.show_error(&e.to_string());
                self.transition(PlayerState::Error);
                return Err(e);
            }
        };

        info!(
            items = playlist.len(),
            interval_secs = playlist.config().interval().as_secs_f64(),
            loop_playback = playlist.config().loop_playback,
            fetched_at = %playlist.fetched_at(),
            "Playlist loaded"
        );

        self.playlist = Some(playlist);
        self.transition(PlayerState::Playing);
        self.display.show_content();
        self.render();

        Ok(())
    }

    async fn load(&self, academy: &AcademyId) -> Result<Playlist> {
        let response = self.fetcher.fetch_playlist(academy).await?;
        let mut playlist = Playlist::from_response(response)?;

        if self.options.honor_shuffle && playlist.config().shuffle {
            debug!("Shuffling playlist");
            playlist.shuffle();
        }

        Ok(playlist)
    }

    /// Wait for one event and handle it.
    ///
    /// Returns false once the player is in a terminal state (or was never
    /// initialized), after which calling it again does nothing.
    pub async fn tick(&mut self) -> bool {
        if self.state.is_terminal() || self.playlist.is_none() {
            return false;
        }

        match self.events_rx.recv().await {
            Some(event) => {
                self.handle_event(event);
                !self.state.is_terminal()
            }
            None => false,
        }
    }

    /// Drive the player until it reaches a terminal state
    pub async fn run(&mut self) -> PlayerState {
        while self.tick().await {}

        info!(
            state = %self.state,
            renders = self.renders,
            elapsed_secs = self.start_time.elapsed().as_secs_f64(),
            "Player stopped"
        );

        self.state
    }

    /// Initialize and run to completion
    pub async fn start(&mut self, academy: &AcademyId) -> Result<PlayerState> {
        self.initialize(academy).await?;
        Ok(self.run().await)
    }

    fn handle_event(&mut self, event: PlayerEvent) {
        if event.generation() != self.generation {
            debug!(
                event = ?event,
                current = self.generation,
                "Dropping stale event"
            );
            return;
        }

        match event {
            PlayerEvent::IntervalElapsed { .. } => self.advance(),
            PlayerEvent::Media { event, .. } => self.handle_media(event),
        }
    }

    fn handle_media(&mut self, event: MediaEvent) {
        let Some(url) = self.playlist.as_ref().map(|p| p.current().url.clone()) else {
            return;
        };

        debug!(event = ?event, url = %url, generation = self.generation, "Media event");

        match event {
            MediaEvent::ImageDecoded => {
                self.display.show_image(&url);
                self.transition(PlayerState::Playing);
                self.schedule_advance();
            }
            MediaEvent::VideoReady => {
                self.transition(PlayerState::Playing);
                let ticket = self.ticket();
                self.media.play_video(&url, ticket);
            }
            MediaEvent::VideoEnded => self.schedule_advance(),
            MediaEvent::ImageFailed | MediaEvent::VideoRejected | MediaEvent::VideoFailed => {
                if let Some(failure) = event.failure(&url) {
                    warn!(error = %failure, "Skipping item");
                }
                self.advance();
            }
        }
    }

    /// Show the current item
    fn render(&mut self) {
        let Some(playlist) = self.playlist.as_ref() else {
            return;
        };

        let item = playlist.current().clone();
        let status = StatusText {
            name: playlist.config().display_name.clone(),
            current: playlist.current_index() + 1,
            total: playlist.len(),
        };

        self.generation += 1;
        self.renders += 1;

        debug!(
            index = playlist.current_index(),
            kind = %item.kind,
            url = %item.url,
            generation = self.generation,
            "Rendering item"
        );

        self.display.set_status(&status);
        let ticket = self.ticket();

        match item.kind {
            MediaKind::Image => self.media.preload_image(&item.url, ticket),
            MediaKind::Video => {
                self.display.show_video(&item.url);
                self.media.load_video(&item.url, ticket);
            }
        }
    }

    /// Move past the current item, looping or halting at the end
    fn advance(&mut self) {
        let Some(playlist) = self.playlist.as_mut() else {
            return;
        };

        match playlist.advance() {
            Advance::Next(index) => debug!(index, "Advancing"),
            Advance::Wrapped => info!("Reached end of playlist, looping"),
            Advance::Exhausted => {
                info!("Reached end of playlist");
                self.transition(PlayerState::Idle);
                return;
            }
        }

        self.transition(PlayerState::LoadingNext);
        self.render();
    }

    /// Post an advance for the current generation after the interval
    fn schedule_advance(&self) {
        let Some(playlist) = self.playlist.as_ref() else {
            return;
        };

        let interval = playlist.config().interval();
        let generation = self.generation;
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            let _ = tx.send(PlayerEvent::IntervalElapsed { generation });
        });
    }

    fn ticket(&self) -> MediaTicket {
        MediaTicket::new(self.generation, self.events_tx.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NoFetch;

    #[async_trait]
    impl PlaylistFetcher for NoFetch {
        async fn fetch_playlist(&self, _id: &AcademyId) -> Result<PlaylistResponse> {
            Err(Error::HttpStatus { status: 404 })
        }
    }

    struct NullDisplay;

    impl DisplaySurface for NullDisplay {
        fn show_image(&mut self, _url: &str) {}
        fn show_video(&mut self, _url: &str) {}
        fn set_status(&mut self, _status: &StatusText) {}
        fn show_loading(&mut self) {}
        fn show_content(&mut self) {}
        fn show_error(&mut self, _message: &str) {}
    }

    struct NullMedia;

    impl MediaBackend for NullMedia {
        fn preload_image(&mut self, _url: &str, _ticket: MediaTicket) {}
        fn load_video(&mut self, _url: &str, _ticket: MediaTicket) {}
        fn play_video(&mut self, _url: &str, _ticket: MediaTicket) {}
    }

    fn player() -> PlaylistPlayer<NoFetch, NullDisplay, NullMedia> {
        PlaylistPlayer::new(NoFetch, NullDisplay, NullMedia, PlayerOptions::default())
    }

    #[tokio::test]
    async fn test_player_creation() {
        let mut player = player();

        assert_eq!(player.state(), PlayerState::Loading);
        assert_eq!(player.current_index(), None);
        assert!(!player.tick().await);
    }

    #[tokio::test]
    async fn test_state_transitions() {
        let mut player = player();

        assert!(player.set_state(PlayerState::Playing).is_ok());
        assert!(player.set_state(PlayerState::LoadingNext).is_ok());
        assert!(player.set_state(PlayerState::Idle).is_ok());

        // Idle is terminal
        assert!(player.set_state(PlayerState::Playing).is_err());
    }

    #[tokio::test]
    async fn test_failed_fetch_is_terminal() {
        let mut player = player();
        let mut states = player.subscribe_state();

        let err = player.initialize(&AcademyId::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 404");
        assert_eq!(player.state(), PlayerState::Error);
        assert!(states.has_changed().unwrap());
        assert_eq!(*states.borrow_and_update(), PlayerState::Error);

        // A second attempt is refused
        assert!(player.initialize(&AcademyId::default()).await.is_err());
        assert_eq!(player.renders(), 0);
    }
}
