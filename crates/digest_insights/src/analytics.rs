use std::collections::HashMap;

use itertools::Itertools;
use serde::Serialize;

use crate::text::words;

const POSITIVE_WORDS: &[&str] = &[
    "amazing", "benefit", "benefits", "best", "better", "clear", "effective", "efficient",
    "enjoy", "excellent", "excited", "exciting", "fantastic", "good", "great", "happy",
    "helpful", "improve", "improved", "improvement", "innovative", "interesting", "love",
    "positive", "powerful", "progress", "recommend", "success", "successful", "useful",
    "valuable", "win", "wonderful",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "broken", "challenge", "concern", "concerns", "crisis", "danger", "dangerous",
    "decline", "difficult", "disappointing", "fail", "failed", "failure", "fear", "hard",
    "harm", "issue", "issues", "lose", "loss", "negative", "poor", "problem", "problems",
    "risk", "risks", "sad", "terrible", "threat", "worse", "worst", "wrong",
];

const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "also", "answer", "because", "been", "before",
    "being", "between", "both", "could", "does", "doing", "during", "each", "even", "every",
    "from", "further", "have", "having", "here", "into", "just", "like", "main", "many",
    "more", "most", "much", "only", "other", "over", "point", "points", "same", "should",
    "some", "such", "summary", "than", "that", "their", "them", "then", "there", "these",
    "they", "this", "those", "through", "topic", "under", "until", "very", "video", "were",
    "what", "when", "where", "which", "while", "will", "with", "would", "your",
];

const TOP_TOPICS: usize = 5;
const MIN_TOPIC_LEN: usize = 4;

/// Which analytics to compute; all off means no analytics at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyticsToggles {
    pub sentiment: bool,
    pub topics: bool,
    pub readability: bool,
}

impl AnalyticsToggles {
    pub fn any(&self) -> bool {
        self.sentiment || self.topics || self.readability
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryAnalytics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<Topic>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readability: Option<Readability>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Sentiment {
    pub label: SentimentLabel,
    /// (positive - negative) / (positive + negative), in [-1, 1]
    pub score: f64,
    pub positive_words: usize,
    pub negative_words: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Topic {
    pub term: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Readability {
    pub flesch_reading_ease: f64,
    pub grade: &'static str,
    pub words: usize,
    pub sentences: usize,
    pub avg_sentence_length: f64,
}

/// Computes the toggled analytics over `text`; `None` when nothing is toggled.
pub fn analyze(text: &str, toggles: AnalyticsToggles) -> Option<SummaryAnalytics> {
    if !toggles.any() {
        return None;
    }

    Some(SummaryAnalytics {
        sentiment: toggles.sentiment.then(|| sentiment(text)),
        topics: toggles.topics.then(|| topics(text)),
        readability: toggles.readability.then(|| readability(text)),
    })
}

fn sentiment(text: &str) -> Sentiment {
    let (positive_words, negative_words) =
        words(text).fold((0, 0), |(pos, neg), w| {
            if POSITIVE_WORDS.contains(&w.as_str()) {
                (pos + 1, neg)
            } else if NEGATIVE_WORDS.contains(&w.as_str()) {
                (pos, neg + 1)
            } else {
                (pos, neg)
            }
        });

    let total = positive_words + negative_words;
    let score = if total == 0 {
        0.0
    } else {
        (positive_words as f64 - negative_words as f64) / total as f64
    };

    let label = if score > 0.1 {
        SentimentLabel::Positive
    } else if score < -0.1 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    Sentiment {
        label,
        score,
        positive_words,
        negative_words,
    }
}

fn topics(text: &str) -> Vec<Topic> {
    let counts: HashMap<String, usize> = words(text)
        .filter(|w| w.chars().count() >= MIN_TOPIC_LEN)
        .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .counts();

    counts
        .into_iter()
        .sorted_by(|(a_term, a_count), (b_term, b_count)| {
            b_count.cmp(a_count).then_with(|| a_term.cmp(b_term))
        })
        .take(TOP_TOPICS)
        .map(|(term, count)| Topic { term, count })
        .collect()
}

/// Vowel-group heuristic; every word has at least one syllable.
fn syllables(word: &str) -> usize {
    let lower = word.to_lowercase();
    let mut count = 0;
    let mut prev_vowel = false;
    for c in lower.chars() {
        let vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }
    if lower.ends_with('e') && !lower.ends_with("le") && count > 1 {
        count -= 1;
    }
    count.max(1)
}

fn readability(text: &str) -> Readability {
    let word_list: Vec<String> = words(text).collect();
    let word_count = word_list.len();
    let sentences = text
        .split(['.', '!', '?', '\n'])
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .count();

    if word_count == 0 || sentences == 0 {
        return Readability {
            flesch_reading_ease: 0.0,
            grade: grade(0.0),
            words: word_count,
            sentences,
            avg_sentence_length: 0.0,
        };
    }

    let syllable_count: usize = word_list.iter().map(|w| syllables(w)).sum();
    let avg_sentence_length = word_count as f64 / sentences as f64;
    let avg_syllables = syllable_count as f64 / word_count as f64;
    let score = (206.835 - 1.015 * avg_sentence_length - 84.6 * avg_syllables).clamp(0.0, 100.0);
    let score = (score * 10.0).round() / 10.0;

    Readability {
        flesch_reading_ease: score,
        grade: grade(score),
        words: word_count,
        sentences,
        avg_sentence_length: (avg_sentence_length * 10.0).round() / 10.0,
    }
}

fn grade(score: f64) -> &'static str {
    match score {
        s if s >= 90.0 => "very easy",
        s if s >= 70.0 => "easy",
        s if s >= 60.0 => "standard",
        s if s >= 50.0 => "fairly difficult",
        s if s >= 30.0 => "difficult",
        _ => "very difficult",
    }
}
