use std::{net::SocketAddr, time::Duration};

use clap::Parser;
use itertools::Itertools;

use crate::error::Error;

/// Numbered fallback variables read when `GEMINI_API_KEYS` is empty.
pub const GOOGLE_KEY_PREFIX: &str = "GOOGLE_API_KEY";
const MAX_NUMBERED_KEYS: usize = 5;

#[derive(Debug, Parser)]
#[command(
    name = "video-digest",
    about = "Summarize YouTube videos from their transcripts"
)]
pub struct Cli {
    /// Address the HTTP server listens on
    #[arg(long = "bind", env = "BIND_ADDR", default_value = "127.0.0.1:5000")]
    pub bind_addr: String,

    /// Comma separated Gemini API keys, tried in order
    #[arg(long, env = "GEMINI_API_KEYS")]
    pub gemini_api_keys: Option<String>,

    /// Gemini model used for summaries and answers
    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-1.5-flash")]
    pub gemini_model: String,

    /// YouTube Data API key for titles and durations
    #[arg(long, env = "YOUTUBE_API_KEY")]
    pub youtube_api_key: Option<String>,

    /// Comma separated fallback YouTube Data API keys
    #[arg(long, env = "YOUTUBE_API_KEY_FALLBACKS")]
    pub youtube_fallback_keys: Option<String>,

    /// Per request timeout for upstream calls
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "60")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub gemini_keys: Vec<String>,
    pub gemini_model: String,
    pub youtube_keys: Vec<String>,
    pub request_timeout: Duration,
}

impl Cli {
    /// Resolves the final configuration.
    ///
    /// `lookup` reads the numbered `GOOGLE_API_KEY*` variables and is only
    /// consulted when no Gemini keys were passed explicitly.
    pub fn into_config(self, lookup: impl Fn(&str) -> Option<String>) -> Result<Config, Error> {
        let bind_addr = self
            .bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("invalid bind address '{}': {e}", self.bind_addr)))?;

        let mut gemini_keys = split_keys(self.gemini_api_keys.iter().map(String::as_str));
        if gemini_keys.is_empty() {
            gemini_keys = collect_numbered_keys(GOOGLE_KEY_PREFIX, lookup);
        }
        if gemini_keys.is_empty() {
            return Err(Error::Config(
                "no Gemini API keys configured (GEMINI_API_KEYS or GOOGLE_API_KEY)".into(),
            ));
        }

        let youtube_keys = split_keys(
            self.youtube_api_key
                .iter()
                .chain(self.youtube_fallback_keys.iter())
                .map(String::as_str),
        );
        if youtube_keys.is_empty() {
            return Err(Error::Config("YOUTUBE_API_KEY is not set".into()));
        }

        if self.request_timeout_secs == 0 {
            return Err(Error::Config("request timeout must be at least 1 second".into()));
        }

        let gemini_model = self.gemini_model.trim().to_string();
        if gemini_model.is_empty() {
            return Err(Error::Config("GEMINI_MODEL is empty".into()));
        }

        Ok(Config {
            bind_addr,
            gemini_keys,
            gemini_model,
            youtube_keys,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }
}

/// Splits comma separated key lists, dropping blanks and duplicates.
pub fn split_keys<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    raw.into_iter()
        .flat_map(|chunk| chunk.split(','))
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .unique()
        .map(String::from)
        .collect()
}

/// Reads `PREFIX`, `PREFIX_2` … `PREFIX_5`; gaps are skipped.
pub fn collect_numbered_keys(prefix: &str, lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
    let values = std::iter::once(prefix.to_string())
        .chain((2..=MAX_NUMBERED_KEYS).map(|n| format!("{prefix}_{n}")))
        .filter_map(|name| lookup(&name))
        .collect::<Vec<_>>();

    split_keys(values.iter().map(String::as_str))
}
