//! The normalized response envelope every dispatched tool call resolves to,
//! on both success and failure paths.

use serde::{Deserialize, Serialize};

/// One typed content item inside a [`ToolResponse`]. Currently always text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl ToolContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

/// The single normalized shape returned for every tool call.
///
/// Success and failure share the same structure; failure carries the error's
/// message text and sets `is_error`. Callers inspect the content (or the
/// flag) to tell the two apart — there is no separate transport-level signal
/// except for routing errors, which never produce an envelope at all.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

impl ToolResponse {
    /// A success envelope with a single text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            is_error: false,
        }
    }

    /// A failure envelope carrying an error message as text.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(message)],
            is_error: true,
        }
    }

    /// The first text item, if any. Convenience for callers and tests.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|c| c.text.as_str())
    }
}
