use reqwest_middleware::ClientWithMiddleware;

use crate::{
    domain::{VideoId, VideoMetadata},
    keypool::{FailureClass, KeyedFailure},
    parser::parse_iso8601_duration,
    types::{GoogleErrorEnvelope, VideoListResponse},
    yt::MetadataProvider,
};

/// YouTube Data API v3 client for title and duration.
#[derive(Clone)]
pub struct YouTubeDataClient {
    client: ClientWithMiddleware,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum YouTubeApiError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest_middleware::Error),
    #[error("Failed to decode response: {0}")]
    Decode(#[from] reqwest::Error),
    #[error("API error: {status} {reason} - {message}")]
    Api {
        status: u16,
        reason: String,
        message: String,
    },
    #[error("Video {0} not found")]
    NotFound(String),
}

impl KeyedFailure for YouTubeApiError {
    fn failure_class(&self) -> FailureClass {
        const KEY_REASONS: &[&str] = &[
            "quotaExceeded",
            "dailyLimitExceeded",
            "rateLimitExceeded",
            "userRateLimitExceeded",
            "keyInvalid",
            "keyExpired",
            "accessNotConfigured",
            "ipRefererBlocked",
        ];

        match self {
            YouTubeApiError::Api { status, .. } if matches!(status, 401 | 429 | 500..=599) => {
                FailureClass::Rotate
            }
            YouTubeApiError::Api { reason, .. } if KEY_REASONS.contains(&reason.as_str()) => {
                FailureClass::Rotate
            }
            _ => FailureClass::Fatal,
        }
    }
}

impl YouTubeDataClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://www.googleapis.com/youtube/v3";

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
}

impl MetadataProvider for YouTubeDataClient {
    type Error = YouTubeApiError;

    #[tracing::instrument(skip(self, api_key))]
    async fn fetch_metadata(
        &self,
        api_key: &str,
        video_id: &VideoId,
    ) -> Result<VideoMetadata, Self::Error> {
        let resp = self
            .client
            .get(format!(
                "{}/videos?part=contentDetails,snippet&id={video_id}",
                self.base_url
            ))
            .header("x-goog-api-key", api_key)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let raw = resp.text().await.unwrap_or_default();
            let (reason, message) = match serde_json::from_str::<GoogleErrorEnvelope>(&raw) {
                Ok(envelope) => (
                    envelope
                        .error
                        .errors
                        .first()
                        .map(|d| d.reason.clone())
                        .unwrap_or_default(),
                    envelope.error.message,
                ),
                Err(_) => (String::new(), raw),
            };
            return Err(YouTubeApiError::Api {
                status,
                reason,
                message,
            });
        }

        let list = resp.json::<VideoListResponse>().await?;
        let item = list
            .items
            .into_iter()
            .next()
            .ok_or_else(|| YouTubeApiError::NotFound(video_id.to_string()))?;

        let title = item
            .snippet
            .map(|s| s.title)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| YouTubeApiError::NotFound(video_id.to_string()))?;
        let duration_seconds = item
            .content_details
            .and_then(|d| parse_iso8601_duration(&d.duration));

        Ok(VideoMetadata {
            title,
            duration_seconds,
        })
    }
}
