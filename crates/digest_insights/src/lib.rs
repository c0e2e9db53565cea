//! # Digest Insights
//!
//! Presentation-side derivations over a generated video summary: the
//! mind-map tree handed to the frontend renderer and the optional summary
//! analytics (sentiment, key topics, readability).
//!
//! Everything here is pure and synchronous; the HTTP layer in `video_digest`
//! calls into it after the summary text is available.

mod analytics;
mod mind_map;
mod text;

pub use analytics::{
    analyze, AnalyticsToggles, Readability, Sentiment, SentimentLabel, SummaryAnalytics, Topic,
};
pub use mind_map::{build_mind_map, LabelBudget, MindMapNode, NodeKind};
