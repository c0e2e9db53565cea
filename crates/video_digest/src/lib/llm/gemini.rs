use reqwest::header::CONTENT_TYPE;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;

use crate::{
    keypool::{FailureClass, KeyedFailure},
    types::GoogleErrorEnvelope,
    Summarizer,
};

#[derive(Clone)]
pub struct GeminiClient {
    client: ClientWithMiddleware,
    base_url: String,
    model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest_middleware::Error),
    #[error("Failed to decode response: {0}")]
    Decode(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Content blocked by safety filter")]
    Blocked,
    #[error("Empty response. Finish reason: {0}")]
    Empty(String),
}

impl KeyedFailure for GeminiError {
    fn failure_class(&self) -> FailureClass {
        match self {
            GeminiError::Api { status, .. } if matches!(status, 401 | 403 | 429 | 500..=599) => {
                FailureClass::Rotate
            }
            GeminiError::Api {
                status: 400,
                message,
            } if message.contains("API key") || message.contains("API_KEY_INVALID") => {
                FailureClass::Rotate
            }
            _ => FailureClass::Fatal,
        }
    }
}

impl GeminiClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";

    pub fn new(model: impl Into<String>, client: ClientWithMiddleware) -> Self {
        Self {
            client,
            base_url: Self::DEFAULT_BASE_URL.into(),
            model: model.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn request_body(prompt: &str) -> serde_json::Value {
        let safety_settings = [
            "HARM_CATEGORY_HARASSMENT",
            "HARM_CATEGORY_HATE_SPEECH",
            "HARM_CATEGORY_SEXUALLY_EXPLICIT",
            "HARM_CATEGORY_DANGEROUS_CONTENT",
        ]
        .map(|category| {
            serde_json::json!({
                "category": category,
                "threshold": "BLOCK_MEDIUM_AND_ABOVE"
            })
        });

        serde_json::json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }
            ],
            "generationConfig": {
                "temperature": 0.7,
                "topP": 0.8,
                "topK": 1,
                "maxOutputTokens": 1024
            },
            "safetySettings": safety_settings
        })
    }

    #[tracing::instrument(skip_all, fields(model = %self.model))]
    pub async fn send_generate_request(
        &self,
        api_key: &str,
        prompt: &str,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let resp = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(Self::request_body(prompt).to_string())
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let raw = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GoogleErrorEnvelope>(&raw)
                .map(|envelope| {
                    let label = envelope.error.status.unwrap_or_default();
                    format!("{label} {}", envelope.error.message).trim().to_string()
                })
                .unwrap_or(raw);
            return Err(GeminiError::Api { status, message });
        }

        Ok(resp.json::<GenerateContentResponse>().await?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
pub struct ContentPart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Joins the text parts of the first candidate.
    pub fn into_text(self) -> Result<String, GeminiError> {
        if self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
            .is_some()
        {
            return Err(GeminiError::Blocked);
        }

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(GeminiError::Empty("NO_CANDIDATES".into()));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if !text.trim().is_empty() {
            return Ok(text);
        }

        match candidate.finish_reason.as_deref() {
            Some("SAFETY") => Err(GeminiError::Blocked),
            reason => Err(GeminiError::Empty(reason.unwrap_or("UNKNOWN").to_string())),
        }
    }
}

impl Summarizer for GeminiClient {
    const SUMMARIZER_MODEL: &'static str = "gemini-1.5-flash";
    type Error = GeminiError;

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, Self::Error> {
        let response = self
            .send_generate_request(api_key, prompt)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to generate content"))?;

        response.into_text()
    }
}
