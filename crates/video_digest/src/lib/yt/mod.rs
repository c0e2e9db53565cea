pub mod metadata;
pub mod transcript;

use std::{fmt::Display, future::Future};

use crate::{
    domain::{CaptionTrack, LanguagePreference, VideoId, VideoMetadata},
    error::Error,
    keypool::KeyedFailure,
};

/// Caption listing and download for a single video.
pub trait TranscriptProvider {
    fn list_tracks(
        &self,
        video_id: &VideoId,
    ) -> impl Future<Output = Result<Vec<CaptionTrack>, Error>> + Send;

    fn fetch_track(&self, track: &CaptionTrack) -> impl Future<Output = Result<String, Error>> + Send;
}

/// Title and duration lookup, keyed per call like the summarizer.
pub trait MetadataProvider {
    type Error: KeyedFailure + Display + Send;

    fn fetch_metadata(
        &self,
        api_key: &str,
        video_id: &VideoId,
    ) -> impl Future<Output = Result<VideoMetadata, Self::Error>> + Send;
}

/// Picks the caption track to summarize.
///
/// Order: exact code (manual before generated), then same base language
/// (manual before generated), then the first manual track, then the first
/// generated track. `Auto` skips straight to the last two steps.
pub fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    preference: &LanguagePreference,
) -> Option<&'a CaptionTrack> {
    let manual_first = move |pred: &dyn Fn(&CaptionTrack) -> bool| {
        tracks
            .iter()
            .find(|t| !t.is_generated && pred(t))
            .or_else(|| tracks.iter().find(|t| t.is_generated && pred(t)))
    };

    if let LanguagePreference::Code(code) = preference {
        let base = base_language(code);
        let exact = manual_first(&|t: &CaptionTrack| t.language_code.eq_ignore_ascii_case(code));
        let same_base = || manual_first(&|t: &CaptionTrack| base_language(&t.language_code) == base);

        if let Some(track) = exact.or_else(same_base) {
            return Some(track);
        }

        tracing::info!(requested = %code, "Requested transcript language unavailable, falling back");
    }

    manual_first(&|_: &CaptionTrack| true)
}

fn base_language(code: &str) -> String {
    code.split(['-', '_'])
        .next()
        .unwrap_or(code)
        .to_ascii_lowercase()
}
