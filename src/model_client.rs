//! The seam between a session and the language model.

use crate::client::Anthropic;
use crate::error::{Error, ProviderFailure, Result};
use crate::prompt::PromptRequest;
use crate::types::{MessageCreateParams, Model};

/// Sampling temperature for every reframing request.
pub const TEMPERATURE: f32 = 0.7;

/// Default cap on generated tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Something that turns a composed prompt into generated text.
///
/// The production implementation is [`HostedModel`]; tests substitute stubs.
#[async_trait::async_trait]
pub trait ModelClient: Send + Sync {
    /// Perform one generation call.
    async fn generate(&self, prompt: &PromptRequest) -> Result<String>;
}

/// A [`ModelClient`] backed by the Messages API.
#[derive(Clone, Debug)]
pub struct HostedModel {
    client: Anthropic,
    model: Model,
    max_tokens: u32,
}

impl HostedModel {
    /// Wrap `client`, sending every request to `model`.
    pub fn new(client: Anthropic, model: Model) -> Self {
        Self {
            client,
            model,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Set the cap on generated tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// The model requests are sent to.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Build the request body for `prompt`.
    pub fn params(&self, prompt: &PromptRequest) -> MessageCreateParams {
        MessageCreateParams::new(self.max_tokens, prompt.messages.clone(), self.model.clone())
            .with_system(prompt.system.clone())
            .with_temperature(TEMPERATURE)
    }
}

#[async_trait::async_trait]
impl ModelClient for HostedModel {
    async fn generate(&self, prompt: &PromptRequest) -> Result<String> {
        let message = self.client.send(self.params(prompt)).await?;
        message
            .text()
            .ok_or_else(|| Error::provider(ProviderFailure::Malformed, "reply contained no text"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptComposer;
    use crate::types::{KnownModel, MessageParam};

    #[test]
    fn params_carry_prompt_and_temperature() {
        let client = Anthropic::new("test-key").unwrap();
        let model = HostedModel::new(client, Model::Known(KnownModel::ClaudeHaiku45))
            .with_max_tokens(256);
        let prompt = PromptComposer::cbt().compose("Nobody likes me.");
        let params = model.params(&prompt);

        assert_eq!(params.max_tokens, 256);
        assert_eq!(params.temperature, Some(TEMPERATURE));
        assert_eq!(params.system.as_deref(), Some(prompt.system.as_str()));
        assert_eq!(params.messages, vec![MessageParam::user("Nobody likes me.")]);
        assert_eq!(model.model(), &Model::Known(KnownModel::ClaudeHaiku45));
    }
}
