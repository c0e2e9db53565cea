use std::sync::Arc;

use digest_insights::{analyze, SummaryAnalytics};
use itertools::Itertools;

use crate::{
    domain::{
        LanguagePreference, SummaryOptions, TranscriptLanguage, VideoDetails, VideoId,
        VideoMetadata,
    },
    error::Error,
    keypool::{KeyPool, KeyPoolStatus},
    llm::prompt::{build_question_prompt, build_summary_prompt, QuestionContext},
    parser::extract_video_id,
    yt::{select_track, MetadataProvider, TranscriptProvider},
    Summarizer,
};

pub mod builder;

#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    pub summary: String,
    pub analytics: Option<SummaryAnalytics>,
}

/// Where a question's answer should come from.
#[derive(Debug, Clone)]
pub enum QuestionSource {
    Summary(String),
    Video {
        video_url: String,
        language: LanguagePreference,
    },
}

// Per-request orchestration of transcript, metadata and summarization calls
#[derive(Debug)]
pub struct DigestService<T, M, S>
where
    T: TranscriptProvider + Send + Sync + 'static,
    M: MetadataProvider + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    transcripts: T,
    metadata: M,
    summarizer: S,
    summary_keys: Arc<KeyPool>,
    metadata_keys: Arc<KeyPool>,
}

impl<T, M, S> DigestService<T, M, S>
where
    T: TranscriptProvider + Send + Sync + 'static,
    M: MetadataProvider + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    /// Lists the caption languages of the video behind `video_url`.
    #[tracing::instrument(skip(self))]
    pub async fn languages(&self, video_url: &str) -> Result<Vec<TranscriptLanguage>, Error> {
        let video_id = extract_video_id(video_url)?;
        self.list_languages(&video_id).await
    }

    async fn list_languages(&self, video_id: &VideoId) -> Result<Vec<TranscriptLanguage>, Error> {
        let tracks = self.transcripts.list_tracks(video_id).await?;

        Ok(tracks
            .iter()
            .unique_by(|t| t.language_code.as_str())
            .map(TranscriptLanguage::from)
            .collect())
    }

    /// Title, duration and caption languages.
    ///
    /// Metadata is best effort: when every key fails or the lookup errors the
    /// title falls back to [`VideoDetails::FALLBACK_TITLE`] and `duration` is
    /// `None`. Missing captions are an error.
    #[tracing::instrument(skip(self))]
    pub async fn video_details(&self, video_url: &str) -> Result<VideoDetails, Error> {
        let video_id = extract_video_id(video_url)?;

        let (languages, metadata) = futures::future::join(
            self.list_languages(&video_id),
            self.fetch_metadata(&video_id),
        )
        .await;
        let languages = languages?;

        let VideoMetadata {
            title,
            duration_seconds,
        } = metadata
            .inspect_err(|e| tracing::warn!(error = %e, %video_id, "Failed to fetch video metadata"))
            .unwrap_or_else(|_| VideoMetadata {
                title: VideoDetails::FALLBACK_TITLE.to_string(),
                duration_seconds: None,
            });

        Ok(VideoDetails {
            title,
            languages,
            duration: duration_seconds,
        })
    }

    async fn fetch_metadata(&self, video_id: &VideoId) -> Result<VideoMetadata, Error> {
        let metadata = &self.metadata;
        let metadata = self
            .metadata_keys
            .run(|key| async move { metadata.fetch_metadata(&key, video_id).await })
            .await?;
        Ok(metadata)
    }

    /// Downloads the transcript picked by the language fallback policy.
    #[tracing::instrument(skip(self))]
    pub async fn transcript(
        &self,
        video_id: &VideoId,
        language: &LanguagePreference,
    ) -> Result<String, Error> {
        let tracks = self.transcripts.list_tracks(video_id).await?;
        let track = select_track(&tracks, language)
            .ok_or_else(|| Error::NoTranscript(format!("No caption tracks for {video_id}")))?;

        tracing::info!(
            language = %track.language_code,
            generated = track.is_generated,
            "Selected caption track"
        );

        self.transcripts.fetch_track(track).await
    }

    /// Generates `prompt` through the summary key pool.
    async fn generate(&self, prompt: &str) -> Result<String, Error> {
        let summarizer = &self.summarizer;
        let text = self
            .summary_keys
            .run(|key| async move { summarizer.generate(&key, prompt).await })
            .await?;
        Ok(text)
    }

    /// Summarizes an already fetched transcript.
    ///
    /// Empty transcripts are rejected before any provider call.
    #[tracing::instrument(skip_all, fields(style = ?options.style, detail = ?options.detail_level))]
    pub async fn summarize_transcript(
        &self,
        transcript: &str,
        options: &SummaryOptions,
    ) -> Result<SummaryOutcome, Error> {
        if transcript.trim().is_empty() {
            return Err(Error::invalid("Transcript is empty"));
        }

        let prompt = build_summary_prompt(transcript, options);
        let summary = self
            .generate(&prompt)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to summarize transcript"))?;

        let analytics = analyze(&summary, options.analytics);

        Ok(SummaryOutcome { summary, analytics })
    }

    /// Full flow: URL → transcript → summary (+ analytics).
    ///
    /// The URL and `options` are validated before any network call.
    #[tracing::instrument(skip(self, options))]
    pub async fn summarize(
        &self,
        video_url: &str,
        language: &LanguagePreference,
        options: &SummaryOptions,
    ) -> Result<SummaryOutcome, Error> {
        let video_id = extract_video_id(video_url)?;

        let transcript = self
            .transcript(&video_id, language)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to retrieve transcript"))?;

        tracing::info!(chars = transcript.len(), "Fetched transcript");

        self.summarize_transcript(&transcript, options).await
    }

    #[tracing::instrument(skip(self, source))]
    pub async fn ask_question(&self, question: &str, source: QuestionSource) -> Result<String, Error> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::invalid("question is required"));
        }

        let prompt = match source {
            QuestionSource::Summary(summary) => {
                if summary.trim().is_empty() {
                    return Err(Error::invalid("summary is required"));
                }
                build_question_prompt(question, QuestionContext::Summary(&summary))
            }
            QuestionSource::Video {
                video_url,
                language,
            } => {
                let video_id = extract_video_id(&video_url)?;
                let transcript = self.transcript(&video_id, &language).await?;
                if transcript.trim().is_empty() {
                    return Err(Error::invalid("Transcript is empty"));
                }
                build_question_prompt(question, QuestionContext::Transcript(&transcript))
            }
        };

        self.generate(&prompt)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to answer question"))
    }

    pub fn api_status(&self) -> KeyPoolStatus {
        self.summary_keys.status()
    }

    pub fn model(&self) -> &str {
        self.summarizer.model()
    }
}
