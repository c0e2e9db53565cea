use std::{fmt::Display, future::Future};

use crate::keypool::KeyedFailure;

/// A generative-language backend addressed with one API key per call.
///
/// Key selection is the caller's job (see [`crate::keypool::KeyPool`]);
/// implementations only classify their failures.
pub trait Summarizer {
    const SUMMARIZER_MODEL: &'static str;

    type Error: KeyedFailure + Display + Send;

    fn model(&self) -> &str {
        Self::SUMMARIZER_MODEL
    }

    fn generate(
        &self,
        api_key: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
