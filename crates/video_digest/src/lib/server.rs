use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use digest_insights::{build_mind_map, AnalyticsToggles, LabelBudget, MindMapNode, SummaryAnalytics};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    domain::{LanguagePreference, SummaryOptions, TranscriptLanguage, VideoDetails},
    error::Error,
    keypool::KeyPoolStatus,
    yt::{MetadataProvider, TranscriptProvider},
    DigestService, QuestionSource, Summarizer,
};

type SharedService<T, M, S> = Arc<DigestService<T, M, S>>;

/// Error body returned by every endpoint: `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let status = match &error {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NoTranscript(_) | Error::VideoUnavailable(_) => StatusCode::NOT_FOUND,
            Error::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Upstream(_) | Error::ParseError(_) | Error::Json(_) | Error::Http(_) => {
                StatusCode::BAD_GATEWAY
            }
        };

        let message = match error {
            Error::InvalidInput(message) => message,
            other => other.to_string(),
        };

        Self { status, message }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "Request failed");
        } else {
            tracing::info!(status = %self.status, error = %self.message, "Request rejected");
        }

        (
            self.status,
            Json(ErrorBody {
                error: &self.message,
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct VideoRequest {
    pub video_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub video_url: Option<String>,
    pub language_code: Option<String>,
    pub summary_style: Option<String>,
    pub detail_level: Option<String>,
    pub translate_to: Option<String>,
    #[serde(default)]
    pub include_sentiment: bool,
    #[serde(default)]
    pub include_topics: bool,
    #[serde(default)]
    pub include_readability: bool,
}

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub question: Option<String>,
    pub summary: Option<String>,
    pub video_url: Option<String>,
    pub language_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MindMapRequest {
    pub summary: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub languages: Vec<TranscriptLanguage>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics: Option<SummaryAnalytics>,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("{field} is required")))
}

pub fn router<T, M, S>(service: SharedService<T, M, S>) -> Router
where
    T: TranscriptProvider + Send + Sync + 'static,
    M: MetadataProvider + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api-status", get(api_status::<T, M, S>))
        .route("/video-details", post(video_details::<T, M, S>))
        .route("/get-languages", post(languages::<T, M, S>))
        .route("/summarize", post(summarize::<T, M, S>))
        .route("/ask-question", post(ask_question::<T, M, S>))
        .route("/mind-map", post(mind_map))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

/// Serves `router` until Ctrl-C.
pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown signal received");
        })
        .await
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "video-digest",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn api_status<T, M, S>(State(service): State<SharedService<T, M, S>>) -> Json<KeyPoolStatus>
where
    T: TranscriptProvider + Send + Sync + 'static,
    M: MetadataProvider + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    Json(service.api_status())
}

async fn video_details<T, M, S>(
    State(service): State<SharedService<T, M, S>>,
    payload: Result<Json<VideoRequest>, JsonRejection>,
) -> Result<Json<VideoDetails>, ApiError>
where
    T: TranscriptProvider + Send + Sync + 'static,
    M: MetadataProvider + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    let Json(request) = payload?;
    let video_url = required(request.video_url, "video_url")?;

    Ok(Json(service.video_details(&video_url).await?))
}

async fn languages<T, M, S>(
    State(service): State<SharedService<T, M, S>>,
    payload: Result<Json<VideoRequest>, JsonRejection>,
) -> Result<Json<LanguagesResponse>, ApiError>
where
    T: TranscriptProvider + Send + Sync + 'static,
    M: MetadataProvider + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    let Json(request) = payload?;
    let video_url = required(request.video_url, "video_url")?;
    let languages = service.languages(&video_url).await?;

    Ok(Json(LanguagesResponse { languages }))
}

async fn summarize<T, M, S>(
    State(service): State<SharedService<T, M, S>>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError>
where
    T: TranscriptProvider + Send + Sync + 'static,
    M: MetadataProvider + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    let Json(request) = payload?;
    let video_url = required(request.video_url, "video_url")?;

    let options = SummaryOptions::parse(
        request.summary_style.as_deref(),
        request.detail_level.as_deref(),
        request.translate_to.as_deref(),
        AnalyticsToggles {
            sentiment: request.include_sentiment,
            topics: request.include_topics,
            readability: request.include_readability,
        },
    )?;
    let language = LanguagePreference::from_request(request.language_code.as_deref());

    let outcome = service.summarize(&video_url, &language, &options).await?;

    Ok(Json(SummaryResponse {
        summary: outcome.summary,
        analytics: outcome.analytics,
    }))
}

async fn ask_question<T, M, S>(
    State(service): State<SharedService<T, M, S>>,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> Result<Json<AnswerResponse>, ApiError>
where
    T: TranscriptProvider + Send + Sync + 'static,
    M: MetadataProvider + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    let Json(request) = payload?;
    let question = required(request.question, "question")?;

    let source = match (
        request.summary.filter(|s| !s.trim().is_empty()),
        request.video_url.filter(|u| !u.trim().is_empty()),
    ) {
        (Some(summary), _) => QuestionSource::Summary(summary),
        (None, Some(video_url)) => QuestionSource::Video {
            video_url,
            language: LanguagePreference::from_request(request.language_code.as_deref()),
        },
        (None, None) => {
            return Err(ApiError::bad_request(
                "Either summary or video_url is required",
            ))
        }
    };

    let answer = service.ask_question(&question, source).await?;

    Ok(Json(AnswerResponse { answer }))
}

async fn mind_map(
    payload: Result<Json<MindMapRequest>, JsonRejection>,
) -> Result<Json<MindMapNode>, ApiError> {
    let Json(request) = payload?;
    let summary = required(request.summary, "summary")?;
    let title = request.title.unwrap_or_default();

    Ok(Json(build_mind_map(&title, &summary, LabelBudget::default())))
}
