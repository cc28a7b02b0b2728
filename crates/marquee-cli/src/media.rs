//! Headless media backend
//!
//! Images are downloaded and decoded so broken files get skipped the same
//! way a screen would skip them. Videos cannot be shown, so loading only
//! checks that the source answers and playback lasts a fixed time.

use anyhow::Result;
use marquee_core::{MediaBackend, MediaEvent, MediaTicket};
use reqwest::{header::RANGE, Client};
use std::time::Duration;
use tracing::debug;

pub struct HeadlessMedia {
    client: Client,
    video_length: Duration,
    autoplay: bool,
}

impl HeadlessMedia {
    pub fn new(client: Client, video_length: Duration, autoplay: bool) -> Self {
        Self {
            client,
            video_length,
            autoplay,
        }
    }
}

impl MediaBackend for HeadlessMedia {
    fn preload_image(&mut self, url: &str, ticket: MediaTicket) {
        let client = self.client.clone();
        let url = url.to_string();

        tokio::spawn(async move {
            let event = match decode_image(&client, &url).await {
                Ok((width, height)) => {
                    debug!(url = %url, width, height, "Image decoded");
                    MediaEvent::ImageDecoded
                }
                Err(e) => {
                    debug!(url = %url, error = %e, "Image failed");
                    MediaEvent::ImageFailed
                }
            };
            ticket.notify(event);
        });
    }

    fn load_video(&mut self, url: &str, ticket: MediaTicket) {
        let client = self.client.clone();
        let url = url.to_string();

        tokio::spawn(async move {
            let event = match probe(&client, &url).await {
                Ok(()) => MediaEvent::VideoReady,
                Err(e) => {
                    debug!(url = %url, error = %e, "Video unavailable");
                    MediaEvent::VideoFailed
                }
            };
            ticket.notify(event);
        });
    }

    fn play_video(&mut self, url: &str, ticket: MediaTicket) {
        if !self.autoplay {
            debug!(url = %url, "Autoplay disabled");
            ticket.notify(MediaEvent::VideoRejected);
            return;
        }

        let length = self.video_length;
        tokio::spawn(async move {
            tokio::time::sleep(length).await;
            ticket.notify(MediaEvent::VideoEnded);
        });
    }
}

/// Download and decode an image, returning its dimensions
async fn decode_image(client: &Client, url: &str) -> Result<(u32, u32)> {
    let bytes = client.get(url).send().await?.error_for_status()?.bytes().await?;
    let image = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await??;
    Ok((image.width(), image.height()))
}

/// Ask for the first byte of a video to see that it can be loaded
async fn probe(client: &Client, url: &str) -> Result<()> {
    client
        .get(url)
        .header(RANGE, "bytes=0-0")
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::PlayerEvent;
    use std::io::Cursor;
    use tokio::sync::mpsc;

    fn media(autoplay: bool) -> HeadlessMedia {
        HeadlessMedia::new(Client::new(), Duration::from_secs(30), autoplay)
    }

    fn png() -> Vec<u8> {
        let mut bytes = Vec::new();
        image::DynamicImage::new_rgb8(2, 2)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<PlayerEvent>) -> MediaEvent {
        match rx.recv().await.unwrap() {
            PlayerEvent::Media { event, .. } => event,
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_image_decoded() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/a.png").with_body(png()).create_async().await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        media(true).preload_image(&format!("{}/a.png", server.url()), MediaTicket::new(1, tx));

        assert_eq!(next_event(&mut rx).await, MediaEvent::ImageDecoded);
    }

    #[tokio::test]
    async fn test_image_garbage_fails() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/a.png").with_body("not an image").create_async().await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        media(true).preload_image(&format!("{}/a.png", server.url()), MediaTicket::new(1, tx));

        assert_eq!(next_event(&mut rx).await, MediaEvent::ImageFailed);
    }

    #[tokio::test]
    async fn test_image_missing_fails() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/gone.jpg").with_status(404).create_async().await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        media(true).preload_image(&format!("{}/gone.jpg", server.url()), MediaTicket::new(1, tx));

        assert_eq!(next_event(&mut rx).await, MediaEvent::ImageFailed);
    }

    #[tokio::test]
    async fn test_video_probe() {
        let mut server = mockito::Server::new_async().await;
        let _ok = server
            .mock("GET", "/v.mp4")
            .match_header("range", "bytes=0-0")
            .with_status(206)
            .create_async()
            .await;
        let _missing = server.mock("GET", "/x.mp4").with_status(404).create_async().await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut backend = media(true);
        backend.load_video(&format!("{}/v.mp4", server.url()), MediaTicket::new(1, tx.clone()));
        assert_eq!(next_event(&mut rx).await, MediaEvent::VideoReady);

        backend.load_video(&format!("{}/x.mp4", server.url()), MediaTicket::new(2, tx));
        assert_eq!(next_event(&mut rx).await, MediaEvent::VideoFailed);
    }

    #[tokio::test]
    async fn test_playback_rejected_without_autoplay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        media(false).play_video("https://cdn.example.com/v.mp4", MediaTicket::new(3, tx));

        assert_eq!(
            rx.recv().await.unwrap(),
            PlayerEvent::Media {
                generation: 3,
                event: MediaEvent::VideoRejected
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_playback_ends_after_length() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let started = tokio::time::Instant::now();

        media(true).play_video("https://cdn.example.com/v.mp4", MediaTicket::new(4, tx));

        assert_eq!(next_event(&mut rx).await, MediaEvent::VideoEnded);
        assert_eq!(started.elapsed(), Duration::from_secs(30));
    }
}
