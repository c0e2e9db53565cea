//! # Yt Parser
//!
//! This module provides the pure parsing pieces of the YouTube integration:
//! video identifiers from URLs, caption tracks from the watch page, timed-text
//! documents and ISO 8601 durations.

use std::{ops::Deref, sync::LazyLock};

use regex::Regex;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    domain::{CaptionTrack, VideoId},
    error::Error,
    types::{PlayerResponse, TimedText},
};

static YT_PLAYER_RESPONSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)var\s+ytInitialPlayerResponse\s*=\s*(\{.*?\});\s*(?:var\s|</script>|\(function)",
    )
    .unwrap()
});

static ISO_DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$").unwrap()
});

const YOUTUBE_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtube-nocookie.com",
    "www.youtube-nocookie.com",
];

/// Extracts the video identifier from any supported URL shape.
///
/// Accepts `watch?v=`, `youtu.be/<id>`, `/shorts/<id>`, `/embed/<id>`,
/// `/live/<id>`, `/v/<id>`, scheme-less URLs and bare identifiers.
pub fn extract_video_id(video_url: &str) -> Result<VideoId, Error> {
    let raw = video_url.trim();
    if raw.is_empty() {
        return Err(Error::invalid("video_url is required"));
    }

    if VideoId::is_valid(raw) {
        return VideoId::try_from(raw);
    }

    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    let url = Url::parse(&with_scheme).map_err(|_| Error::invalid("Invalid YouTube video URL"))?;
    let host = url
        .host_str()
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| Error::invalid("Invalid YouTube video URL"))?;

    let mut segments = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect::<Vec<_>>())
        .unwrap_or_default()
        .into_iter();

    let candidate = if host == "youtu.be" {
        segments.next().map(str::to_string)
    } else if YOUTUBE_HOSTS.contains(&host.as_str()) {
        match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            Some("shorts" | "embed" | "live" | "v") => segments.next().map(str::to_string),
            _ => None,
        }
    } else {
        None
    };

    candidate
        .as_deref()
        .map(VideoId::try_from)
        .unwrap_or_else(|| Err(Error::invalid("Invalid YouTube video URL")))
}

/// Lists caption tracks from a parsed player response.
///
/// # Returns
/// * `Ok(Vec<CaptionTrack>)` with at least one track, in listing order.
/// * `Err(Error::VideoUnavailable)` when the video cannot be played.
/// * `Err(Error::NoTranscript)` when captions are disabled or empty.
#[tracing::instrument(skip(player))]
pub fn parse_caption_tracks(
    player: &PlayerResponse,
    video_id: &VideoId,
) -> Result<Vec<CaptionTrack>, Error> {
    if let Some(status) = &player.playability_status {
        if status.status != "OK" {
            let reason = status
                .reason
                .clone()
                .unwrap_or_else(|| format!("status {}", status.status));
            return Err(Error::VideoUnavailable(format!("{video_id}: {reason}")));
        }
    }

    let tracks = player
        .captions
        .as_ref()
        .and_then(|c| c.player_captions_tracklist_renderer.as_ref())
        .map(|r| {
            r.caption_tracks
                .iter()
                .map(|raw| CaptionTrack {
                    language_code: raw.language_code.clone(),
                    name: raw
                        .name
                        .as_ref()
                        .and_then(|n| n.text())
                        .unwrap_or_else(|| raw.language_code.clone()),
                    is_generated: raw.kind.as_deref() == Some("asr"),
                    base_url: raw.base_url.clone(),
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(Error::NoTranscript(format!(
            "Transcripts are disabled for video {video_id}"
        )));
    }

    Ok(tracks)
}

/// Flattens a timed-text document into a single whitespace-normalised line.
pub fn parse_timed_text(doc: &TimedText) -> String {
    doc.events
        .iter()
        .flat_map(|event| event.segs.iter())
        .flat_map(|seg| seg.utf8.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses an ISO 8601 duration (`PT1H2M30S`, `P1DT2H`) into seconds.
pub fn parse_iso8601_duration(duration: &str) -> Option<u64> {
    if duration == "P" || duration.ends_with('T') {
        return None;
    }

    let caps = ISO_DURATION_RE.captures(duration)?;
    let part = |idx: usize| -> Option<u64> {
        caps.get(idx)
            .map(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(Some(0))
    };

    part(1)?
        .checked_mul(86_400)?
        .checked_add(part(2)?.checked_mul(3_600)?)?
        .checked_add(part(3)?.checked_mul(60)?)?
        .checked_add(part(4)?)
}

/// Absolute `fmt=json3` download url for a caption track.
///
/// Relative track urls resolve against `origin`. Any `fmt` pair already on the
/// track url is dropped.
pub fn timed_text_url(origin: &str, track_url: &str) -> Result<String, Error> {
    let mut url = Url::parse(origin)
        .and_then(|base| base.join(track_url))
        .map_err(|_| Error::ParseError("Invalid caption track URL"))?;

    let pairs = url
        .query_pairs()
        .filter(|(key, _)| key != "fmt")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect::<Vec<_>>();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("fmt", "json3");

    Ok(url.into())
}

pub struct WatchPageDocument(String);

impl Deref for WatchPageDocument {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl WatchPageDocument {
    pub fn to_json<T>(&self) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        YT_PLAYER_RESPONSE_RE
            .captures(self)
            .and_then(|cap| cap.get(1))
            .and_then(|m| serde_json::from_str(m.as_str()).ok())
            .ok_or(Error::ParseError(
                "Failed to extract ytInitialPlayerResponse from the watch page",
            ))
    }

    /// Bot-check interstitials have no player response at all.
    pub fn is_captcha(&self) -> bool {
        self.contains("g-recaptcha")
    }
}

impl From<String> for WatchPageDocument {
    fn from(value: String) -> Self {
        WatchPageDocument(value)
    }
}
