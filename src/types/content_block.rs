use serde::{Deserialize, Serialize};

/// A block of content in a provider response.
///
/// Only text matters here; any other block type the provider sends is kept as `Other` and
/// skipped when the reply is flattened to text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ContentBlock {
    /// A block of text content
    #[serde(rename = "text")]
    Text {
        /// The text content.
        text: String,
    },

    /// Any block type this crate does not render.
    #[serde(other)]
    Other,
}

impl ContentBlock {
    /// Returns the text of a text block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Other => None,
        }
    }
}
