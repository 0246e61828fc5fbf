//! Reply and result types.
//!
//! The service answers with an ordered list of content blocks. Only some of
//! them carry text; [`Fragment`] makes that distinction explicit so turning a
//! reply into the final CSV string is a plain `match`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One block of the service reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Fragment {
    /// A block exposing a `text` field.
    Text(String),
    /// Any other block, kept as received.
    Opaque(Value),
}

impl Fragment {
    /// Classify a raw content block.
    pub fn from_block(block: Value) -> Self {
        match block.get("text").and_then(Value::as_str) {
            Some(text) => Fragment::Text(text.to_string()),
            None => Fragment::Opaque(block),
        }
    }

    /// Plain-text form of the fragment.
    pub fn to_text(&self) -> String {
        match self {
            Fragment::Text(text) => text.clone(),
            Fragment::Opaque(value) => value_to_string(value),
        }
    }
}

/// The `content` of a reply: normally a list of fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReplyContent {
    Fragments(Vec<Fragment>),
    /// Content that was not a list; its string form is used as-is.
    Other(Value),
}

impl ReplyContent {
    pub fn from_value(content: Value) -> Self {
        match content {
            Value::Array(blocks) => {
                ReplyContent::Fragments(blocks.into_iter().map(Fragment::from_block).collect())
            }
            other => ReplyContent::Other(other),
        }
    }

    /// Concatenate fragments in order, no separators.
    pub fn to_text(&self) -> String {
        match self {
            ReplyContent::Fragments(fragments) => {
                fragments.iter().map(Fragment::to_text).collect()
            }
            ReplyContent::Other(value) => value_to_string(value),
        }
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Token accounting reported by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

/// Everything the service returned for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReply {
    pub content: ReplyContent,
    pub usage: Usage,
    /// Model that actually served the request, if reported.
    pub model: Option<String>,
    /// Why generation stopped (`end_turn`, `max_tokens`, …), if reported.
    pub stop_reason: Option<String>,
}

impl ExtractionReply {
    /// Reply made of text fragments only, with no usage data.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            content: ReplyContent::Fragments(
                texts.into_iter().map(|t| Fragment::Text(t.into())).collect(),
            ),
            usage: Usage::default(),
            model: None,
            stop_reason: None,
        }
    }
}

/// Numbers about one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub input_bytes: usize,
    pub encoded_bytes: usize,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub duration_ms: u64,
}

/// Result of [`crate::extract::extract`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// Concatenated reply text, written verbatim to the output file.
    pub csv: String,
    pub reply: ExtractionReply,
    pub stats: ExtractionStats,
}
