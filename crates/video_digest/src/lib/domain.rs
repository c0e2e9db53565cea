use std::{fmt, ops::Deref, str::FromStr};

use digest_insights::AnalyticsToggles;
use serde::Serialize;

use crate::error::Error;

/// An 11 character YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub const LEN: usize = 11;

    pub fn is_valid(candidate: &str) -> bool {
        candidate.len() == Self::LEN
            && candidate
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }
}

impl TryFrom<&str> for VideoId {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if VideoId::is_valid(value) {
            Ok(VideoId(value.to_string()))
        } else {
            Err(Error::invalid("Invalid YouTube video URL"))
        }
    }
}

impl Deref for VideoId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A caption track as listed on the watch page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    pub language_code: String,
    pub name: String,
    pub is_generated: bool,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptLanguage {
    pub code: String,
    pub name: String,
}

impl From<&CaptionTrack> for TranscriptLanguage {
    fn from(track: &CaptionTrack) -> Self {
        TranscriptLanguage {
            code: track.language_code.clone(),
            name: track.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMetadata {
    pub title: String,
    pub duration_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoDetails {
    pub title: String,
    pub languages: Vec<TranscriptLanguage>,
    pub duration: Option<u64>,
}

impl VideoDetails {
    pub const FALLBACK_TITLE: &'static str = "Video Summary";
}

/// Requested transcript language; `Auto` lets the fallback policy pick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LanguagePreference {
    #[default]
    Auto,
    Code(String),
}

impl LanguagePreference {
    pub fn from_request(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            None | Some("") => LanguagePreference::Auto,
            Some(c) if c.eq_ignore_ascii_case("auto") => LanguagePreference::Auto,
            Some(c) => LanguagePreference::Code(c.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryStyle {
    #[default]
    Default,
    BulletPoints,
    Paragraphs,
    Qa,
    Timeline,
}

impl FromStr for SummaryStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(SummaryStyle::Default),
            "bullet-points" => Ok(SummaryStyle::BulletPoints),
            "paragraphs" => Ok(SummaryStyle::Paragraphs),
            "qa" => Ok(SummaryStyle::Qa),
            "timeline" => Ok(SummaryStyle::Timeline),
            other => Err(Error::invalid(format!(
                "Invalid summary_style '{other}'; expected one of: default, bullet-points, paragraphs, qa, timeline"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetailLevel {
    Brief,
    #[default]
    Medium,
    Detailed,
}

impl DetailLevel {
    /// Transcript characters kept before prompting.
    pub fn transcript_budget(&self) -> usize {
        match self {
            DetailLevel::Brief => 6_000,
            DetailLevel::Medium => 8_000,
            DetailLevel::Detailed => 12_000,
        }
    }
}

impl FromStr for DetailLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brief" => Ok(DetailLevel::Brief),
            "medium" => Ok(DetailLevel::Medium),
            "detailed" => Ok(DetailLevel::Detailed),
            other => Err(Error::invalid(format!(
                "Invalid detail_level '{other}'; expected one of: brief, medium, detailed"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TranslateTo {
    #[default]
    None,
    Language(String),
}

impl TranslateTo {
    /// Display name used in the prompt; unknown codes pass through unchanged.
    pub fn language_name(&self) -> Option<&str> {
        let TranslateTo::Language(code) = self else {
            return None;
        };
        let name = match code.as_str() {
            "es" => "Spanish",
            "fr" => "French",
            "de" => "German",
            "it" => "Italian",
            "pt" => "Portuguese",
            "ru" => "Russian",
            "ja" => "Japanese",
            "ko" => "Korean",
            "zh" => "Chinese",
            "ar" => "Arabic",
            "hi" => "Hindi",
            other => other,
        };
        Some(name)
    }
}

impl FromStr for TranslateTo {
    type Err = Error;

    /// `none` or a language tag such as `es`, `pt-BR`, `zh-Hant`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "none" {
            return Ok(TranslateTo::None);
        }

        let mut parts = s.splitn(2, '-');
        let primary = parts.next().unwrap_or_default();
        let primary_ok =
            (2..=3).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_lowercase());
        let region_ok = parts.next().map_or(true, |r| {
            (2..=4).contains(&r.len()) && r.chars().all(|c| c.is_ascii_alphanumeric())
        });

        if primary_ok && region_ok {
            Ok(TranslateTo::Language(s.to_string()))
        } else {
            Err(Error::invalid(format!(
                "Invalid translate_to '{s}'; expected 'none' or a language code"
            )))
        }
    }
}

/// Validated summary configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryOptions {
    pub style: SummaryStyle,
    pub detail_level: DetailLevel,
    pub translate_to: TranslateTo,
    pub analytics: AnalyticsToggles,
}

impl SummaryOptions {
    /// Parses the raw wire values, defaulting the absent ones.
    pub fn parse(
        style: Option<&str>,
        detail_level: Option<&str>,
        translate_to: Option<&str>,
        analytics: AnalyticsToggles,
    ) -> Result<Self, Error> {
        Ok(SummaryOptions {
            style: style.map(str::parse::<SummaryStyle>).transpose()?.unwrap_or_default(),
            detail_level: detail_level
                .map(str::parse::<DetailLevel>)
                .transpose()?.unwrap_or_default(),
            translate_to: translate_to
                .map(str::parse::<TranslateTo>)
                .transpose()?.unwrap_or_default(),
            analytics,
        })
    }
}
