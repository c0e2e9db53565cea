mod mocks;

use std::sync::Arc;

use digest_insights::AnalyticsToggles;
use mocks::{
    metadata_provider::MockMetadataProvider,
    summarizer::MockSummarizer,
    transcript_provider::{track, ListingFailure, MockTranscriptProvider},
};
use video_digest::{
    domain::{LanguagePreference, SummaryOptions, VideoDetails},
    keypool::KeyPool,
    DigestService, DigestServiceBuilder, Error, QuestionSource,
};

const VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
const SUMMARY: &str = "1. Opening\n   - greetings\n2. Main argument\n   - evidence";

type TestService = DigestService<MockTranscriptProvider, MockMetadataProvider, MockSummarizer>;

fn pool(provider: &'static str, keys: &[&str]) -> Arc<KeyPool> {
    Arc::new(KeyPool::new(provider, keys.iter().copied()).unwrap())
}

fn build_service(
    transcripts: MockTranscriptProvider,
    metadata: MockMetadataProvider,
    summarizer: MockSummarizer,
    gemini_keys: &[&str],
) -> TestService {
    DigestServiceBuilder::new(pool("gemini", gemini_keys), pool("youtube", &["y1", "y2"]))
        .transcripts(transcripts)
        .metadata(metadata)
        .summarizer(summarizer)
        .build()
}

fn default_options() -> SummaryOptions {
    SummaryOptions::default()
}

// ─── Key rotation ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_rotates_past_exhausted_keys_to_the_last_one() {
    let summarizer = MockSummarizer::new(SUMMARY).quota_exceeded_for(&["k1", "k2"]);
    let probe = summarizer.clone();

    let service = build_service(
        MockTranscriptProvider::new("a transcript about many things"),
        MockMetadataProvider::new("Title", Some(60)),
        summarizer,
        &["k1", "k2", "k3"],
    );

    let outcome = service
        .summarize(VIDEO_URL, &LanguagePreference::Auto, &default_options())
        .await
        .unwrap();

    assert_eq!(outcome.summary, SUMMARY);
    assert!(outcome.analytics.is_none(), "No analytics were requested");
    assert_eq!(probe.keys_tried(), vec!["k1", "k2", "k3"]);

    let status = service.api_status();
    assert_eq!(status.current_key_index, 3);
    assert_eq!(status.total_keys, 3);
    assert_eq!(status.remaining_keys, 0);
}

#[tokio::test]
async fn test_next_request_starts_at_last_good_key() {
    let summarizer = MockSummarizer::new(SUMMARY).quota_exceeded_for(&["k1"]);
    let probe = summarizer.clone();

    let service = build_service(
        MockTranscriptProvider::new("a transcript"),
        MockMetadataProvider::new("Title", None),
        summarizer,
        &["k1", "k2", "k3"],
    );

    for _ in 0..2 {
        service
            .summarize(VIDEO_URL, &LanguagePreference::Auto, &default_options())
            .await
            .unwrap();
    }

    assert_eq!(probe.keys_tried(), vec!["k1", "k2", "k2"]);
}

#[tokio::test]
async fn test_non_retryable_failure_stops_after_one_attempt() {
    let summarizer = MockSummarizer::new(SUMMARY).rejecting(&["k1"]);
    let probe = summarizer.clone();

    let service = build_service(
        MockTranscriptProvider::new("a transcript"),
        MockMetadataProvider::new("Title", None),
        summarizer,
        &["k1", "k2"],
    );

    let err = service
        .summarize(VIDEO_URL, &LanguagePreference::Auto, &default_options())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Upstream(_)), "got {err:?}");
    assert_eq!(probe.keys_tried(), vec!["k1"]);
    assert_eq!(service.api_status().current_key_index, 1);
}

#[tokio::test]
async fn test_exhausted_pool_is_service_unavailable() {
    let summarizer = MockSummarizer::new(SUMMARY).quota_exceeded_for(&["k1", "k2", "k3"]);
    let probe = summarizer.clone();

    let service = build_service(
        MockTranscriptProvider::new("a transcript"),
        MockMetadataProvider::new("Title", None),
        summarizer,
        &["k1", "k2", "k3"],
    );

    let err = service
        .summarize(VIDEO_URL, &LanguagePreference::Auto, &default_options())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ServiceUnavailable(_)), "got {err:?}");
    assert_eq!(probe.keys_tried().len(), 3);
}

// ─── Validation before network ───────────────────────────────────────────────

#[tokio::test]
async fn test_empty_transcript_never_reaches_the_summarizer() {
    let summarizer = MockSummarizer::new(SUMMARY);
    let probe = summarizer.clone();

    let service = build_service(
        MockTranscriptProvider::new("  \n\t "),
        MockMetadataProvider::new("Title", None),
        summarizer,
        &["k1"],
    );

    let err = service
        .summarize(VIDEO_URL, &LanguagePreference::Auto, &default_options())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidInput(_)), "got {err:?}");
    assert!(probe.calls.lock().unwrap().is_empty());

    let err = service
        .summarize_transcript("", &default_options())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(probe.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_url_makes_no_provider_calls() {
    let transcripts = MockTranscriptProvider::new("a transcript");
    let summarizer = MockSummarizer::new(SUMMARY);
    let (transcript_probe, summarizer_probe) = (transcripts.clone(), summarizer.clone());

    let service = build_service(
        transcripts,
        MockMetadataProvider::new("Title", None),
        summarizer,
        &["k1"],
    );

    for url in ["", "https://vimeo.com/12345", "https://www.youtube.com/watch?v=short"] {
        let err = service
            .summarize(url, &LanguagePreference::Auto, &default_options())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)), "{url}: got {err:?}");
    }

    assert_eq!(transcript_probe.call_count(), 0);
    assert!(summarizer_probe.calls.lock().unwrap().is_empty());
}

#[test]
fn test_invalid_style_is_rejected_during_parsing() {
    let err = SummaryOptions::parse(Some("haiku"), None, None, AnalyticsToggles::default())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

// ─── Transcript selection ────────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_language_falls_back_to_manual_track() {
    let transcripts = MockTranscriptProvider::with_tracks(
        "bonjour",
        vec![track("es", true), track("fr", false)],
    );
    let probe = transcripts.clone();

    let service = build_service(
        transcripts,
        MockMetadataProvider::new("Title", None),
        MockSummarizer::new(SUMMARY),
        &["k1"],
    );

    service
        .summarize(
            VIDEO_URL,
            &LanguagePreference::from_request(Some("de")),
            &default_options(),
        )
        .await
        .unwrap();

    assert_eq!(*probe.fetch_calls.lock().unwrap(), vec!["fr"]);
}

#[tokio::test]
async fn test_disabled_captions_are_no_transcript() {
    let service = build_service(
        MockTranscriptProvider::failing(ListingFailure::CaptionsDisabled),
        MockMetadataProvider::new("Title", None),
        MockSummarizer::new(SUMMARY),
        &["k1"],
    );

    let err = service
        .summarize(VIDEO_URL, &LanguagePreference::Auto, &default_options())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoTranscript(_)), "got {err:?}");
}

// ─── Analytics ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_requested_analytics_are_attached() {
    let service = build_service(
        MockTranscriptProvider::new("a transcript"),
        MockMetadataProvider::new("Title", None),
        MockSummarizer::new("The results were excellent and the team was happy."),
        &["k1"],
    );

    let options = SummaryOptions::parse(
        Some("paragraphs"),
        Some("brief"),
        None,
        AnalyticsToggles {
            sentiment: true,
            topics: false,
            readability: true,
        },
    )
    .unwrap();

    let analytics = service
        .summarize(VIDEO_URL, &LanguagePreference::Auto, &options)
        .await
        .unwrap()
        .analytics
        .expect("analytics requested");

    assert!(analytics.sentiment.is_some());
    assert!(analytics.topics.is_none());
    assert!(analytics.readability.is_some());
}

// ─── Video details ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_video_details_combines_metadata_and_languages() {
    let metadata = MockMetadataProvider::new("Never Gonna Give You Up", Some(213));
    let probe = metadata.clone();

    let service = build_service(
        MockTranscriptProvider::with_tracks(
            "",
            vec![track("en", false), track("en", true), track("de", true)],
        ),
        metadata,
        MockSummarizer::new(SUMMARY),
        &["k1"],
    );

    let details = service.video_details("youtu.be/dQw4w9WgXcQ").await.unwrap();

    assert_eq!(details.title, "Never Gonna Give You Up");
    assert_eq!(details.duration, Some(213));
    let codes: Vec<_> = details.languages.iter().map(|l| l.code.as_str()).collect();
    assert_eq!(codes, vec!["en", "de"]);

    let calls = probe.calls.lock().unwrap();
    assert_eq!(*calls, vec![("y1".to_string(), "dQw4w9WgXcQ".to_string())]);
}

#[tokio::test]
async fn test_video_details_degrades_when_metadata_fails() {
    let metadata = MockMetadataProvider::new("Unused", Some(1)).quota_exceeded_for(&["y1", "y2"]);
    let probe = metadata.clone();

    let service = build_service(
        MockTranscriptProvider::new(""),
        metadata,
        MockSummarizer::new(SUMMARY),
        &["k1"],
    );

    let details = service.video_details(VIDEO_URL).await.unwrap();

    assert_eq!(details.title, VideoDetails::FALLBACK_TITLE);
    assert_eq!(details.duration, None);
    assert_eq!(details.languages.len(), 2);
    assert_eq!(probe.calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_video_details_for_private_video() {
    let service = build_service(
        MockTranscriptProvider::failing(ListingFailure::Unavailable),
        MockMetadataProvider::new("Title", None),
        MockSummarizer::new(SUMMARY),
        &["k1"],
    );

    let err = service.video_details(VIDEO_URL).await.unwrap_err();
    assert!(matches!(err, Error::VideoUnavailable(_)), "got {err:?}");
}

// ─── Questions ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_question_uses_supplied_summary() {
    let transcripts = MockTranscriptProvider::new("the transcript");
    let summarizer = MockSummarizer::new("Because of the evidence.");
    let (transcript_probe, summarizer_probe) = (transcripts.clone(), summarizer.clone());

    let service = build_service(
        transcripts,
        MockMetadataProvider::new("Title", None),
        summarizer,
        &["k1"],
    );

    let answer = service
        .ask_question(
            "Why?",
            QuestionSource::Summary("The speaker cites evidence.".into()),
        )
        .await
        .unwrap();

    assert_eq!(answer, "Because of the evidence.");
    assert_eq!(transcript_probe.call_count(), 0);

    let calls = summarizer_probe.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].prompt.contains("The speaker cites evidence."));
    assert!(calls[0].prompt.contains("Why?"));
}

#[tokio::test]
async fn test_question_falls_back_to_truncated_transcript() {
    let long_transcript = "word ".repeat(4_000);
    let transcripts = MockTranscriptProvider::new(&long_transcript);
    let summarizer = MockSummarizer::new("An answer.");
    let (transcript_probe, summarizer_probe) = (transcripts.clone(), summarizer.clone());

    let service = build_service(
        transcripts,
        MockMetadataProvider::new("Title", None),
        summarizer,
        &["k1"],
    );

    service
        .ask_question(
            "What is repeated?",
            QuestionSource::Video {
                video_url: VIDEO_URL.into(),
                language: LanguagePreference::Auto,
            },
        )
        .await
        .unwrap();

    assert_eq!(*transcript_probe.fetch_calls.lock().unwrap(), vec!["en"]);

    let calls = summarizer_probe.calls.lock().unwrap();
    assert!(calls[0].prompt.len() < long_transcript.len());
    assert!(calls[0].prompt.contains("..."));
}

#[tokio::test]
async fn test_blank_question_is_rejected() {
    let summarizer = MockSummarizer::new("An answer.");
    let probe = summarizer.clone();

    let service = build_service(
        MockTranscriptProvider::new("the transcript"),
        MockMetadataProvider::new("Title", None),
        summarizer,
        &["k1"],
    );

    let err = service
        .ask_question("   ", QuestionSource::Summary("summary".into()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(probe.calls.lock().unwrap().is_empty());
}
