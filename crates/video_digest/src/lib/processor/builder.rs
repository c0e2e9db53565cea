use std::sync::Arc;

use crate::{
    keypool::KeyPool,
    yt::{MetadataProvider, TranscriptProvider},
    DigestService, Summarizer,
};

pub struct DigestServiceBuilder<T = (), M = (), S = ()> {
    summary_keys: Arc<KeyPool>,
    metadata_keys: Arc<KeyPool>,
    transcripts: T,
    metadata: M,
    summarizer: S,
}

impl DigestServiceBuilder {
    pub fn new(summary_keys: Arc<KeyPool>, metadata_keys: Arc<KeyPool>) -> Self {
        Self {
            summary_keys,
            metadata_keys,
            transcripts: (),
            metadata: (),
            summarizer: (),
        }
    }
}

impl<T, M, S> DigestServiceBuilder<T, M, S> {
    pub fn transcripts<T2: TranscriptProvider + Send + Sync + 'static>(
        self,
        transcripts: T2,
    ) -> DigestServiceBuilder<T2, M, S> {
        DigestServiceBuilder {
            summary_keys: self.summary_keys,
            metadata_keys: self.metadata_keys,
            transcripts,
            metadata: self.metadata,
            summarizer: self.summarizer,
        }
    }

    pub fn metadata<M2: MetadataProvider + Send + Sync + 'static>(
        self,
        metadata: M2,
    ) -> DigestServiceBuilder<T, M2, S> {
        DigestServiceBuilder {
            summary_keys: self.summary_keys,
            metadata_keys: self.metadata_keys,
            transcripts: self.transcripts,
            metadata,
            summarizer: self.summarizer,
        }
    }

    pub fn summarizer<S2: Summarizer + Send + Sync + 'static>(
        self,
        summarizer: S2,
    ) -> DigestServiceBuilder<T, M, S2> {
        DigestServiceBuilder {
            summary_keys: self.summary_keys,
            metadata_keys: self.metadata_keys,
            transcripts: self.transcripts,
            metadata: self.metadata,
            summarizer,
        }
    }
}

impl<T, M, S> DigestServiceBuilder<T, M, S>
where
    T: TranscriptProvider + Send + Sync + 'static,
    M: MetadataProvider + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    pub fn build(self) -> DigestService<T, M, S> {
        DigestService {
            transcripts: self.transcripts,
            metadata: self.metadata,
            summarizer: self.summarizer,
            summary_keys: self.summary_keys,
            metadata_keys: self.metadata_keys,
        }
    }
}
