//! CLI command implementations

use crate::media::HeadlessMedia;
use crate::output::{ConsoleDisplay, OutputFormat};
use anyhow::{bail, Context};
use marquee_core::{
    academy_id_from_page_url, AcademyId, HttpFetcher, PlayerOptions, PlayerState, PlaylistFetcher,
    PlaylistPlayer,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Settings read from `--config`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Playlist API root, e.g. `https://api.example.com/prod`
    pub api_base: Option<Url>,
    /// Seconds a headless video "plays"
    pub video_seconds: Option<u64>,
    /// Refuse video playback like a browser without autoplay permission
    pub no_autoplay: bool,
    #[serde(flatten)]
    pub player: PlayerOptions,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Where to fetch from and for whom
#[derive(Debug, Clone, Default)]
pub struct Target {
    pub api_base: Option<Url>,
    pub academy_id: Option<String>,
    pub page_url: Option<Url>,
}

impl Target {
    /// Explicit id wins over the page URL; neither means `"default"`
    pub fn academy(&self) -> AcademyId {
        match (&self.academy_id, &self.page_url) {
            (Some(id), _) if !id.is_empty() => AcademyId::new(id.clone()),
            (_, Some(page)) => academy_id_from_page_url(page),
            _ => AcademyId::default(),
        }
    }

    pub fn api_base(&self, config: &FileConfig) -> anyhow::Result<Url> {
        match self.api_base.as_ref().or(config.api_base.as_ref()) {
            Some(base) => Ok(base.clone()),
            None => bail!("no API base given; pass --api-base or set api_base in the config file"),
        }
    }
}

/// Playback flags from the command line
#[derive(Debug, Clone, Default)]
pub struct PlayFlags {
    pub video_seconds: Option<u64>,
    pub no_autoplay: bool,
    pub honor_shuffle: bool,
}

/// HTTP client for media downloads, bounded by the same timeout as the
/// playlist fetch
fn media_client(options: &PlayerOptions) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(Duration::from_millis(options.request_timeout_ms))
        .build()
        .context("building media client")
}

/// Run the slideshow until it stops or is interrupted
pub async fn play(
    target: &Target,
    flags: &PlayFlags,
    config: &FileConfig,
    format: &str,
) -> anyhow::Result<PlayerState> {
    let mut options = config.player.clone();
    options.honor_shuffle |= flags.honor_shuffle;

    let base = target.api_base(config)?;
    let academy = target.academy();
    let fetcher = HttpFetcher::new(base.clone(), &options)?;

    let video_length = Duration::from_secs(flags.video_seconds.or(config.video_seconds).unwrap_or(30));
    let autoplay = !(flags.no_autoplay || config.no_autoplay);
    let media = HeadlessMedia::new(media_client(&options)?, video_length, autoplay);

    let display = ConsoleDisplay::new(OutputFormat::from(format));
    let mut player = PlaylistPlayer::new(fetcher, display, media, options);

    info!(
        session_id = %player.session_id(),
        api_base = %base,
        academy = %academy,
        autoplay,
        "Starting player"
    );

    let states = player.subscribe_state();
    player.initialize(&academy).await?;

    tokio::select! {
        state = player.run() => Ok(state),
        _ = tokio::signal::ctrl_c() => {
            let state = *states.borrow();
            info!(state = %state, "Interrupted");
            Ok(state)
        }
    }
}

/// Fetch a playlist and print it without playing
pub async fn show(target: &Target, config: &FileConfig, format: &str) -> anyhow::Result<()> {
    let base = target.api_base(config)?;
    let academy = target.academy();
    let fetcher = HttpFetcher::new(base, &config.player)?;

    let playlist = fetcher.fetch_playlist(&academy).await?;

    match OutputFormat::from(format) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&playlist)?),
        OutputFormat::Text => {
            let config = playlist.playlist_config.clone().unwrap_or_default();
            println!("Playlist for {}:", academy);
            println!("  Name: {}", config.display_name);
            println!("  Interval: {:?}", config.interval());
            println!("  Loop: {}", config.loop_playback);
            println!("  Shuffle: {}", config.shuffle);
            if let Some(generated_at) = &playlist.generated_at {
                println!("  Generated: {}", generated_at);
            }
            println!("  Items: {}", playlist.media_list.len());

            println!("\nItems:");
            for (i, item) in playlist.media_list.iter().enumerate() {
                println!("  {}. {} {}", i + 1, item.kind, item.url);
            }
        }
    }

    Ok(())
}
