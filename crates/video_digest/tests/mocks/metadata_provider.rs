use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use video_digest::{
    domain::{VideoId, VideoMetadata},
    yt::MetadataProvider,
};

use super::{MockFailure, MockProviderError};

#[derive(Clone)]
pub struct MockMetadataProvider {
    pub metadata: VideoMetadata,
    /// `(api_key, video_id)` per call
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
    pub failures: HashMap<String, MockFailure>,
}

impl MockMetadataProvider {
    pub fn new(title: &str, duration_seconds: Option<u64>) -> Self {
        Self {
            metadata: VideoMetadata {
                title: title.to_string(),
                duration_seconds,
            },
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
}

impl MetadataProvider for MockMetadataProvider {
    type Error = MockProviderError;

    async fn fetch_metadata(
        &self,
        api_key: &str,
        video_id: &VideoId,
    ) -> Result<VideoMetadata, Self::Error> {
        self.calls
            .lock()
            .unwrap()
            .push((api_key.to_string(), video_id.to_string()));

        match self.failures.get(api_key) {
            Some(failure) => Err(MockProviderError::new(*failure, api_key)),
            None => Ok(self.metadata.clone()),
        }
    }
}
