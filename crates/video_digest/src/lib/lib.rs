pub mod config;
pub mod domain;
mod error;
pub mod http;
pub mod keypool;
mod llm;
pub mod parser;
mod processor;
pub mod server;
pub mod tracing;
pub mod types;
pub mod yt;

pub use error::Error;
pub use llm::{gemini, prompt, summarizer::Summarizer};
pub use processor::{builder::DigestServiceBuilder, DigestService, QuestionSource, SummaryOutcome};
