use serde::{Deserialize, Serialize};

use crate::types::{MessageParam, Model};

/// The body of one `POST /messages` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageCreateParams {
    /// The model that will complete the prompt.
    pub model: Model,

    /// The maximum number of tokens to generate before stopping.
    pub max_tokens: u32,

    /// System prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Input messages, alternating user and assistant and ending on a user turn.
    pub messages: Vec<MessageParam>,

    /// Amount of randomness injected into the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl MessageCreateParams {
    /// Create a new `MessageCreateParams` with the required fields.
    pub fn new(max_tokens: u32, messages: Vec<MessageParam>, model: Model) -> Self {
        Self {
            model,
            max_tokens,
            system: None,
            messages,
            temperature: None,
        }
    }

    /// Add a system prompt.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Add a temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn serializes_without_optional_fields() {
        let params = MessageCreateParams::new(
            1024,
            vec![MessageParam::user("Hello")],
            Model::default(),
        );
        assert_eq!(
            to_value(&params).unwrap(),
            json!({
                "model": "claude-haiku-4-5",
                "max_tokens": 1024,
                "messages": [{"role": "user", "content": "Hello"}]
            })
        );
    }

    #[test]
    fn serializes_system_and_temperature() {
        let params = MessageCreateParams::new(
            256,
            vec![MessageParam::user("Hello")],
            Model::default(),
        )
        .with_system("Be kind.")
        .with_temperature(0.5);
        let json = to_value(&params).unwrap();
        assert_eq!(json["system"], "Be kind.");
        assert_eq!(json["temperature"], 0.5);
    }
}
