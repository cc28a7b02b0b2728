//! Marquee CLI - Headless Slideshow Player
//!
//! Features:
//! - Playlist playback with interval timing and looping
//! - Skip-on-error for images and videos
//! - Playlist inspection without playback

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use url::Url;

mod commands;
mod media;
mod output;

use commands::{FileConfig, PlayFlags, Target};

/// Marquee CLI - Slideshow playlist player
#[derive(Parser)]
#[command(name = "marquee")]
#[command(version)]
#[command(about = "Headless slideshow player for Marquee playlists", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct TargetArgs {
    /// Playlist API root, e.g. https://api.example.com/prod
    #[arg(long)]
    api_base: Option<Url>,

    /// Identifier to fetch the playlist for
    #[arg(short, long)]
    academy_id: Option<String>,

    /// Page URL carrying an `academy_id` query parameter
    #[arg(long)]
    page_url: Option<Url>,
}

impl From<TargetArgs> for Target {
    fn from(args: TargetArgs) -> Self {
        Target {
            api_base: args.api_base,
            academy_id: args.academy_id,
            page_url: args.page_url,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Play a playlist until it ends or is interrupted
    Play {
        #[command(flatten)]
        target: TargetArgs,

        /// Seconds each video plays for
        #[arg(long)]
        video_seconds: Option<u64>,

        /// Refuse video playback
        #[arg(long)]
        no_autoplay: bool,

        /// Apply the playlist's shuffle setting
        #[arg(long)]
        honor_shuffle: bool,
    },

    /// Fetch and print a playlist
    Show {
        #[command(flatten)]
        target: TargetArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    match cli.command {
        Commands::Play {
            target,
            video_seconds,
            no_autoplay,
            honor_shuffle,
        } => {
            let flags = PlayFlags {
                video_seconds,
                no_autoplay,
                honor_shuffle,
            };
            let state = commands::play(&target.into(), &flags, &config, &cli.format).await?;
            tracing::info!(state = %state, "Done");
        }
        Commands::Show { target } => {
            commands::show(&target.into(), &config, &cli.format).await?;
        }
    }

    Ok(())
}
