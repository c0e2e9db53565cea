use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::domain::{DetailLevel, SummaryOptions, SummaryStyle};

const SUMMARY_TEMPLATE: &str = include_str!("./prompts/summary.txt");
const QUESTION_TEMPLATE: &str = include_str!("./prompts/question.txt");

static QUESTION_PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(context_kind|context_label|context|question)\}").unwrap()
});

/// Transcript budget for question answering without a summary
pub const QUESTION_TRANSCRIPT_BUDGET: usize = 8_000;

impl SummaryStyle {
    fn instruction(&self) -> &'static str {
        match self {
            SummaryStyle::Default => {
                "Provide a clear summary covering:
1. Main Topic
2. Key Points (3-5 points)
3. Important Details
4. Conclusions"
            }
            SummaryStyle::BulletPoints => {
                "Provide a bullet-point summary with:
• Main topic and overview
• Key points (use bullet points throughout)
• Important details (as sub-bullets)
• Final conclusions"
            }
            SummaryStyle::Paragraphs => {
                "Provide a well-structured paragraph summary with:
- Opening paragraph: Main topic and context
- Body paragraphs: Key points and details (2-3 paragraphs)
- Closing paragraph: Conclusions and takeaways"
            }
            SummaryStyle::Qa => {
                "Provide a Q&A format summary with:
Q: What is the main topic of this video?
A: [Answer]

Q: What are the key points discussed?
A: [Answer]

Q: What are the most important details?
A: [Answer]

Q: What conclusions are drawn?
A: [Answer]"
            }
            SummaryStyle::Timeline => {
                "Provide a timeline-style summary with:
🕐 Beginning: [What starts the discussion]
🕕 Early Discussion: [Initial key points]
🕘 Middle: [Main content and details]
🕛 End: [Conclusions and final thoughts]"
            }
        }
    }
}

impl DetailLevel {
    fn instruction(&self) -> &'static str {
        match self {
            DetailLevel::Brief => "Keep it concise and focus only on the most essential information.",
            DetailLevel::Medium => "Provide a balanced level of detail with key information.",
            DetailLevel::Detailed => {
                "Include comprehensive details, examples, and thorough explanations."
            }
        }
    }
}

/// Cuts `transcript` to `max_chars` characters, marking the cut with `...`.
pub fn truncate_transcript(transcript: &str, max_chars: usize) -> String {
    match transcript.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &transcript[..byte_idx]),
        None => transcript.to_string(),
    }
}

pub fn build_summary_prompt(transcript: &str, options: &SummaryOptions) -> String {
    let transcript = truncate_transcript(transcript, options.detail_level.transcript_budget());
    let translation_instruction = options
        .translate_to
        .language_name()
        .map(|name| format!("\n\nIMPORTANT: Translate the entire summary to {name}."))
        .unwrap_or_default();

    SUMMARY_TEMPLATE
        .replace("{style_instruction}", options.style.instruction())
        .replace("{detail_instruction}", options.detail_level.instruction())
        .replace("{translation_instruction}", &translation_instruction)
        // last, so placeholders inside the transcript stay untouched
        .replace("{transcript}", &transcript)
}

/// What the answer is grounded on.
#[derive(Debug, Clone, Copy)]
pub enum QuestionContext<'a> {
    Summary(&'a str),
    Transcript(&'a str),
}

pub fn build_question_prompt(question: &str, context: QuestionContext<'_>) -> String {
    let (kind, label, text) = match context {
        QuestionContext::Summary(text) => ("summary", "Summary", text.to_string()),
        QuestionContext::Transcript(text) => (
            "transcript",
            "Transcript",
            truncate_transcript(text, QUESTION_TRANSCRIPT_BUDGET),
        ),
    };

    // single pass: substituted text is never scanned for placeholders again
    QUESTION_PLACEHOLDER_RE
        .replace_all(QUESTION_TEMPLATE, |caps: &Captures| match &caps[1] {
            "context_kind" => kind.to_string(),
            "context_label" => label.to_string(),
            "context" => text.clone(),
            _ => question.to_string(),
        })
        .into_owned()
}
