use serde::{Deserialize, Serialize};

use crate::types::{ContentBlock, MessageRole, Model, Usage};

/// A message returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Unique object identifier.
    pub id: String,

    /// Content generated by the model.
    pub content: Vec<ContentBlock>,

    /// The model that handled the request.
    pub model: Model,

    /// Conversational role of the generated message.  Always `assistant`.
    pub role: MessageRole,

    /// The reason generation stopped, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,

    /// Billing and rate-limit usage.
    #[serde(default)]
    pub usage: Usage,
}

impl Message {
    /// Concatenates every text block, or returns `None` when the reply holds no text.
    pub fn text(&self) -> Option<String> {
        let mut text = String::new();
        let mut saw_text = false;
        for block in &self.content {
            if let Some(t) = block.as_text() {
                text.push_str(t);
                saw_text = true;
            }
        }
        if saw_text { Some(text) } else { None }
    }
}
