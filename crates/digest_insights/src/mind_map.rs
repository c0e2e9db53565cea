//! Mind-map construction from free-form summary text.
//!
//! The summary is walked line by line through a three-state machine:
//!
//! ```text
//!   Idle ──topic──▶ TopicOpen ──detail──▶ DetailCollect
//!    ▲ plain          ▲  │ topic               │ detail
//!    └─(ignored)      └──┴──────◀──── topic ───┘
//! ```
//!
//! Blank lines never change state. The result is a two-level tree:
//! `root → topic → detail`.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::text::{strip_markdown, truncate_chars};

/// `1. Topic`, `2) Topic`, `- Topic`, `* Topic`, `• Topic`, `## Topic`, also
/// wrapped in bold (`**1. Topic:**`)
static TOPIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\*\*|__)?(?:\d{1,3}[.)]|[-*•]|#{1,6})\s+(?P<label>\S.*)$")
        .expect("topic regex is valid")
});

/// Indented bullets are sub-points of the open topic.
static SUB_BULLET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+(?:[-*•◦▪]|\d{1,3}[.)])\s+(?P<label>\S.*)$")
        .expect("sub-bullet regex is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Root,
    Topic,
    Detail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MindMapNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub children: Vec<MindMapNode>,
}

impl MindMapNode {
    fn new(name: String, kind: NodeKind) -> Self {
        Self {
            name,
            kind,
            children: Vec::new(),
        }
    }

    pub fn topics(&self) -> impl Iterator<Item = &MindMapNode> {
        self.children.iter().filter(|c| c.kind == NodeKind::Topic)
    }
}

/// Per-depth character budget for node labels.
#[derive(Debug, Clone, Copy)]
pub struct LabelBudget {
    pub root: usize,
    pub topic: usize,
    pub detail: usize,
}

impl Default for LabelBudget {
    fn default() -> Self {
        Self {
            root: 40,
            topic: 30,
            detail: 50,
        }
    }
}

impl LabelBudget {
    fn for_kind(&self, kind: NodeKind) -> usize {
        match kind {
            NodeKind::Root => self.root,
            NodeKind::Topic => self.topic,
            NodeKind::Detail => self.detail,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    TopicOpen,
    DetailCollect,
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Topic(&'a str),
    Detail(&'a str),
}

fn classify(raw: &str) -> Line<'_> {
    if raw.trim().is_empty() {
        return Line::Blank;
    }

    if let Some(caps) = SUB_BULLET_RE.captures(raw) {
        let label = caps.name("label").map_or(raw, |m| m.as_str());
        return Line::Detail(label.trim());
    }

    let trimmed = raw.trim();
    match TOPIC_RE.captures(trimmed) {
        Some(caps) => Line::Topic(caps.name("label").map_or(trimmed, |m| m.as_str()).trim()),
        None => Line::Detail(trimmed),
    }
}

struct Builder {
    state: State,
    budget: LabelBudget,
    root: MindMapNode,
}

impl Builder {
    fn label(&self, text: &str, kind: NodeKind) -> Option<String> {
        let clean = strip_markdown(text);
        let clean = clean.trim_end_matches(':').trim();
        if clean.is_empty() {
            return None;
        }
        Some(truncate_chars(clean, self.budget.for_kind(kind)))
    }

    fn feed(&mut self, line: Line<'_>) {
        self.state = match (self.state, line) {
            (state, Line::Blank) => state,
            (state, Line::Topic(text)) => match self.label(text, NodeKind::Topic) {
                Some(name) => {
                    self.root
                        .children
                        .push(MindMapNode::new(name, NodeKind::Topic));
                    State::TopicOpen
                }
                None => state,
            },
            (State::Idle, Line::Detail(_)) => State::Idle,
            (State::TopicOpen | State::DetailCollect, Line::Detail(text)) => {
                let Some(name) = self.label(text, NodeKind::Detail) else {
                    return;
                };
                if let Some(topic) = self.root.children.last_mut() {
                    topic.children.push(MindMapNode::new(name, NodeKind::Detail));
                }
                State::DetailCollect
            }
        };
    }
}

/// Builds the mind-map tree for `summary`, rooted at `title`.
///
/// Best effort: text without any numbered, bulleted or heading line yields a
/// root with no children.
pub fn build_mind_map(title: &str, summary: &str, budget: LabelBudget) -> MindMapNode {
    let root_name = strip_markdown(title);
    let root_name = if root_name.is_empty() {
        "Summary".to_string()
    } else {
        truncate_chars(&root_name, budget.root)
    };

    let mut builder = Builder {
        state: State::Idle,
        budget,
        root: MindMapNode::new(root_name, NodeKind::Root),
    };

    for line in summary.lines() {
        builder.feed(classify(line));
    }

    tracing::debug!(
        topics = builder.root.children.len(),
        "Built mind map from summary"
    );

    builder.root
}
