use reqwest::header::ACCEPT_LANGUAGE;
use reqwest_middleware::ClientWithMiddleware;

use crate::{
    domain::{CaptionTrack, VideoId},
    error::Error,
    parser::{parse_caption_tracks, parse_timed_text, timed_text_url, WatchPageDocument},
    types::{PlayerResponse, TimedText},
    yt::TranscriptProvider,
};

/// Reads caption tracks straight from the public watch page.
#[derive(Clone)]
pub struct CaptionScraper {
    client: ClientWithMiddleware,
    base_url: String,
}

impl CaptionScraper {
    pub const DEFAULT_BASE_URL: &'static str = "https://www.youtube.com";

    pub fn new(client: ClientWithMiddleware) -> Self {
        Self {
            client,
            base_url: Self::DEFAULT_BASE_URL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Loads the watch page html for `video_id`
    #[tracing::instrument(skip(self))]
    async fn fetch_watch_page(&self, video_id: &VideoId) -> Result<WatchPageDocument, Error> {
        let resp = self
            .client
            .get(format!("{}/watch?v={video_id}", self.base_url))
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            return Err(Error::Upstream(format!(
                "YouTube watch page returned {}",
                resp.status()
            )));
        }

        Ok(resp.text().await?.into())
    }

    fn timed_text_url(&self, track: &CaptionTrack) -> Result<String, Error> {
        timed_text_url(&self.base_url, &track.base_url)
    }
}

impl TranscriptProvider for CaptionScraper {
    #[tracing::instrument(skip(self))]
    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<CaptionTrack>, Error> {
        let page = self.fetch_watch_page(video_id).await?;

        if page.is_captcha() {
            return Err(Error::Upstream(
                "YouTube is asking for a captcha; too many requests from this address".into(),
            ));
        }

        let player = page.to_json::<PlayerResponse>()?;
        let tracks = parse_caption_tracks(&player, video_id)?;
        tracing::debug!(count = tracks.len(), "Found caption tracks");

        Ok(tracks)
    }

    #[tracing::instrument(skip_all, fields(language = %track.language_code, generated = track.is_generated))]
    async fn fetch_track(&self, track: &CaptionTrack) -> Result<String, Error> {
        let resp = self
            .client
            .get(self.timed_text_url(track)?)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch caption track"))?;

        if !resp.status().is_success() {
            return Err(Error::Upstream(format!(
                "Caption track request returned {}",
                resp.status()
            )));
        }

        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Err(Error::NoTranscript(format!(
                "Caption track '{}' is empty",
                track.language_code
            )));
        }

        let doc = serde_json::from_str::<TimedText>(&body)?;
        let text = parse_timed_text(&doc);
        if text.is_empty() {
            return Err(Error::NoTranscript(format!(
                "Caption track '{}' has no text",
                track.language_code
            )));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::build_http_client_with_retries;
    use std::time::Duration;

    fn track(base_url: &str) -> CaptionTrack {
        CaptionTrack {
            language_code: "en".into(),
            name: "English".into(),
            is_generated: false,
            base_url: base_url.into(),
        }
    }

    #[test]
    fn test_timed_text_url() {
        let scraper = CaptionScraper::new(build_http_client_with_retries(Duration::from_secs(1), 0))
            .with_base_url("http://mock");

        assert_eq!(
            scraper.timed_text_url(&track("https://yt/api/timedtext?v=x&lang=en")).unwrap(),
            "https://yt/api/timedtext?v=x&lang=en&fmt=json3"
        );
        assert_eq!(
            scraper.timed_text_url(&track("/api/timedtext?v=x")).unwrap(),
            "http://mock/api/timedtext?v=x&fmt=json3"
        );
        assert_eq!(
            scraper.timed_text_url(&track("/api/timedtext?fmt=srv3&v=x")).unwrap(),
            "http://mock/api/timedtext?v=x&fmt=json3"
        );
    }
}
