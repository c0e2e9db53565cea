#![allow(dead_code)]

pub mod metadata_provider;
pub mod summarizer;
pub mod transcript_provider;

use video_digest::keypool::{FailureClass, KeyedFailure};

/// How a mocked keyed provider fails for a given key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Quota,
    Fatal,
}

#[derive(Debug, thiserror::Error)]
pub enum MockProviderError {
    #[error("quota exceeded for key {0}")]
    Quota(String),
    #[error("request rejected for key {0}")]
    Fatal(String),
}

impl MockProviderError {
    pub fn new(failure: MockFailure, key: &str) -> Self {
        match failure {
            MockFailure::Quota => MockProviderError::Quota(key.to_string()),
            MockFailure::Fatal => MockProviderError::Fatal(key.to_string()),
        }
    }
}

impl KeyedFailure for MockProviderError {
    fn failure_class(&self) -> FailureClass {
        match self {
            MockProviderError::Quota(_) => FailureClass::Rotate,
            MockProviderError::Fatal(_) => FailureClass::Fatal,
        }
    }
}
