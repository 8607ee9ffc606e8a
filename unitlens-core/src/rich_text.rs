//! Tooltip content built from markdown and plain-text segments

use serde::{Deserialize, Serialize};

/// One piece of tooltip content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Segment {
    /// Already-formatted markdown, emitted verbatim
    Markdown(String),
    /// Literal text, escaped when rendered as markdown
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    segments: Vec<Segment>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_markdown(mut self, markdown: impl Into<String>) -> Self {
        self.segments.push(Segment::Markdown(markdown.into()));
        self
    }

    pub fn append_text(mut self, text: impl Into<String>) -> Self {
        self.segments.push(Segment::Text(text.into()));
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Markdown(md) => out.push_str(md),
                Segment::Text(text) => out.push_str(&escape_markdown(text)),
            }
        }
        out
    }

    /// Content with markdown emphasis markers stripped, for hosts that
    /// cannot render markdown.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Markdown(md) => out.push_str(&md.replace("**", "")),
                Segment::Text(text) => out.push_str(text),
            }
        }
        out
    }
}

const MARKDOWN_SPECIAL: &[char] = &[
    '\\', '`', '*', '_', '{', '}', '[', ']', '(', ')', '#', '+', '-', '!', '~', '>',
];

/// Render literal text as markdown the way editor hover text does: syntax
/// characters and `>` are backslash-escaped and each newline becomes a
/// paragraph break. Runs of spaces are left as they are.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\n\n"),
            c if MARKDOWN_SPECIAL.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
