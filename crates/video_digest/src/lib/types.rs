//! Wire shapes of the YouTube payloads we read. Only the fields we use are
//! modelled; everything else is ignored by serde.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub playability_status: Option<PlayabilityStatus>,
    pub captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
pub struct PlayabilityStatus {
    pub status: String,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Captions {
    pub player_captions_tracklist_renderer: Option<CaptionsTracklist>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionsTracklist {
    #[serde(default)]
    pub caption_tracks: Vec<RawCaptionTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCaptionTrack {
    pub base_url: String,
    pub language_code: String,
    pub name: Option<TextRuns>,
    /// `"asr"` for auto-generated tracks
    pub kind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRuns {
    pub simple_text: Option<String>,
    #[serde(default)]
    pub runs: Vec<TextRun>,
}

impl TextRuns {
    pub fn text(&self) -> Option<String> {
        if let Some(simple) = &self.simple_text {
            return Some(simple.clone());
        }
        let joined: String = self.runs.iter().map(|r| r.text.as_str()).collect();
        (!joined.is_empty()).then_some(joined)
    }
}

#[derive(Debug, Deserialize)]
pub struct TextRun {
    pub text: String,
}

/// `fmt=json3` timed-text document
#[derive(Debug, Deserialize)]
pub struct TimedText {
    #[serde(default)]
    pub events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
pub struct TimedTextEvent {
    #[serde(default)]
    pub segs: Vec<TimedTextSegment>,
}

#[derive(Debug, Deserialize)]
pub struct TimedTextSegment {
    #[serde(default)]
    pub utf8: String,
}

/// YouTube Data API v3 `videos` list response
#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub snippet: Option<VideoSnippet>,
    pub content_details: Option<VideoContentDetails>,
}

#[derive(Debug, Deserialize)]
pub struct VideoSnippet {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct VideoContentDetails {
    /// ISO 8601, e.g. `PT1H2M30S`
    pub duration: String,
}

/// Google API error envelope, shared by the Data API and Gemini
#[derive(Debug, Deserialize)]
pub struct GoogleErrorEnvelope {
    pub error: GoogleError,
}

#[derive(Debug, Deserialize)]
pub struct GoogleError {
    #[serde(default)]
    pub message: String,
    pub status: Option<String>,
    #[serde(default)]
    pub errors: Vec<GoogleErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleErrorDetail {
    #[serde(default)]
    pub reason: String,
}
