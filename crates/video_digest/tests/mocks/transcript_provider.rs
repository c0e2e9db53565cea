use std::sync::{Arc, Mutex};

use video_digest::{
    domain::{CaptionTrack, VideoId},
    yt::TranscriptProvider,
    Error,
};

#[derive(Debug, Clone, Copy)]
pub enum ListingFailure {
    Unavailable,
    CaptionsDisabled,
}

#[derive(Clone)]
pub struct MockTranscriptProvider {
    pub tracks: Vec<CaptionTrack>,
    pub transcript: String,
    pub listing_failure: Option<ListingFailure>,
    pub list_calls: Arc<Mutex<Vec<String>>>,
    /// language codes of the downloaded tracks
    pub fetch_calls: Arc<Mutex<Vec<String>>>,
}

pub fn track(code: &str, generated: bool) -> CaptionTrack {
    CaptionTrack {
        language_code: code.to_string(),
        name: format!("{code} name"),
        is_generated: generated,
        base_url: format!("https://captions.test/{code}"),
    }
}

impl MockTranscriptProvider {
    pub fn new(transcript: &str) -> Self {
        Self::with_tracks(transcript, vec![track("en", false), track("es", true)])
    }

    pub fn with_tracks(transcript: &str, tracks: Vec<CaptionTrack>) -> Self {
        Self {
            tracks,
            transcript: transcript.to_string(),
            listing_failure: None,
            list_calls: Arc::new(Mutex::new(Vec::new())),
            fetch_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(failure: ListingFailure) -> Self {
        Self {
            listing_failure: Some(failure),
            ..Self::with_tracks("", Vec::new())
        }
    }

    pub fn call_count(&self) -> usize {
        self.list_calls.lock().unwrap().len() + self.fetch_calls.lock().unwrap().len()
    }
}

impl TranscriptProvider for MockTranscriptProvider {
    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<CaptionTrack>, Error> {
        self.list_calls.lock().unwrap().push(video_id.to_string());

        match self.listing_failure {
            Some(ListingFailure::Unavailable) => {
                Err(Error::VideoUnavailable(format!("{video_id}: Video is private")))
            }
            Some(ListingFailure::CaptionsDisabled) => Err(Error::NoTranscript(format!(
                "Transcripts are disabled for video {video_id}"
            ))),
            None => Ok(self.tracks.clone()),
        }
    }

    async fn fetch_track(&self, track: &CaptionTrack) -> Result<String, Error> {
        self.fetch_calls
            .lock()
            .unwrap()
            .push(track.language_code.clone());
        Ok(self.transcript.clone())
    }
}
