//! Playlist fetching
//!
//! The player only sees the [`PlaylistFetcher`] trait; [`HttpFetcher`] is the
//! production implementation talking to the playlist API.

use crate::{
    error::Error,
    types::{AcademyId, PlayerOptions, PlaylistResponse},
    Result,
};
use async_trait::async_trait;
use reqwest::{
    header::{CACHE_CONTROL, PRAGMA},
    Client,
};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Query parameter carrying the external id on the hosting page
pub const ACADEMY_ID_PARAM: &str = "academy_id";

/// Trait for playlist sources
#[async_trait]
pub trait PlaylistFetcher: Send + Sync {
    /// Fetch the playlist and its config for one id
    async fn fetch_playlist(&self, id: &AcademyId) -> Result<PlaylistResponse>;
}

/// Build `{base}/academies/{id}/playlist`, encoding the id as one segment
pub fn playlist_url(base: &Url, id: &AcademyId) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| Error::InvalidConfig(format!("API base cannot hold a path: {base}")))?
        .pop_if_empty()
        .extend(["academies", id.as_str(), "playlist"]);
    Ok(url)
}

/// Read `academy_id` from a page URL, falling back to `"default"`
pub fn academy_id_from_page_url(page: &Url) -> AcademyId {
    page.query_pairs()
        .find(|(key, _)| key == ACADEMY_ID_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .map(AcademyId::new)
        .unwrap_or_default()
}

/// Sent when `PlayerOptions::user_agent` is unset
pub const DEFAULT_USER_AGENT: &str = concat!("marquee/", env!("CARGO_PKG_VERSION"));

/// Playlist fetcher backed by the HTTP API
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
}

impl HttpFetcher {
    pub fn new(base_url: Url, options: &PlayerOptions) -> Result<Self> {
        let user_agent = options
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let client = Client::builder()
            .timeout(Duration::from_millis(options.request_timeout_ms))
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl PlaylistFetcher for HttpFetcher {
    #[instrument(skip(self), fields(base = %self.base_url))]
    async fn fetch_playlist(&self, id: &AcademyId) -> Result<PlaylistResponse> {
        let url = playlist_url(&self.base_url, id)?;
        debug!(url = %url, "Fetching playlist");

        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let playlist: PlaylistResponse =
            serde_json::from_str(&body).map_err(|e| Error::InvalidResponse(e.to_string()))?;

        debug!(items = playlist.media_list.len(), "Playlist fetched");

        Ok(playlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_url() {
        let base = Url::parse("https://api.example.com/prod").unwrap();
        let url = playlist_url(&base, &AcademyId::from("gym-1")).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/prod/academies/gym-1/playlist");
    }

    #[test]
    fn test_playlist_url_trailing_slash() {
        let base = Url::parse("https://api.example.com/prod/").unwrap();
        let url = playlist_url(&base, &AcademyId::from("gym-1")).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/prod/academies/gym-1/playlist");
    }

    #[test]
    fn test_playlist_url_encodes_id() {
        let base = Url::parse("https://api.example.com").unwrap();
        let url = playlist_url(&base, &AcademyId::from("a b/c")).unwrap();
        assert_eq!(url.path(), "/academies/a%20b%2Fc/playlist");
    }

    #[test]
    fn test_academy_id_from_page_url() {
        let page = Url::parse("https://tv.example.com/?academy_id=north&x=1").unwrap();
        assert_eq!(academy_id_from_page_url(&page).as_str(), "north");
    }

    #[test]
    fn test_academy_id_defaults() {
        let page = Url::parse("https://tv.example.com/").unwrap();
        assert_eq!(academy_id_from_page_url(&page).as_str(), "default");

        let page = Url::parse("https://tv.example.com/?academy_id=").unwrap();
        assert_eq!(academy_id_from_page_url(&page).as_str(), "default");
    }
}
