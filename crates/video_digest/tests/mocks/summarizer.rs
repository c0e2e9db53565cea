use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use video_digest::Summarizer;

use super::{MockFailure, MockProviderError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateCall {
    pub api_key: String,
    pub prompt: String,
}

#[derive(Clone)]
pub struct MockSummarizer {
    pub reply: String,
    pub calls: Arc<Mutex<Vec<GenerateCall>>>,
    pub failures: HashMap<String, MockFailure>,
}

impl MockSummarizer {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: HashMap::new(),
        }
    }

    pub fn quota_exceeded_for(mut self, keys: &[&str]) -> Self {
        for key in keys {
            self.failures.insert(key.to_string(), MockFailure::Quota);
        }
        self
    }

    pub fn rejecting(mut self, keys: &[&str]) -> Self {
        for key in keys {
            self.failures.insert(key.to_string(), MockFailure::Fatal);
        }
        self
    }

    pub fn keys_tried(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.api_key.clone())
            .collect()
    }
}

impl Summarizer for MockSummarizer {
    const SUMMARIZER_MODEL: &'static str = "mock-gemini";
    type Error = MockProviderError;

    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, Self::Error> {
        self.calls.lock().unwrap().push(GenerateCall {
            api_key: api_key.to_string(),
            prompt: prompt.to_string(),
        });

        match self.failures.get(api_key) {
            Some(failure) => Err(MockProviderError::new(*failure, api_key)),
            None => Ok(self.reply.clone()),
        }
    }
}
