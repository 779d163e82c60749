//! Prompt composition.
//!
//! A [`PromptComposer`] turns one user-typed thought into the message list sent to the model.
//! It holds a fixed instruction and, optionally, a few worked exchanges that show the model
//! the tone to take.  When a thought template is set, the examples' thoughts and the user's
//! text are both rendered through it so the model sees one format throughout.  Composition is
//! a pure function of those inputs and the user's text.

use crate::types::{MessageParam, MessageRole};

/// The instruction every reframing request starts with.
pub const CBT_INSTRUCTION: &str =
    "You are a supportive therapist who uses CBT to help reframe negative thoughts.";

/// How [`PromptComposer::cbt_few_shot`] presents each thought.
pub const CBT_THOUGHT_TEMPLATE: &str = "Negative Thought: \"{thought}\"";

/// Where a thought goes inside a template.
pub const THOUGHT_PLACEHOLDER: &str = "{thought}";

/// One worked example: a thought and the reframing the model should imitate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exchange {
    /// What the user said, before any template is applied.
    pub thought: String,
    /// How the assistant answered.
    pub reframing: String,
}

impl Exchange {
    /// Create an exchange from a thought and its reframing.
    pub fn new(thought: impl Into<String>, reframing: impl Into<String>) -> Self {
        Self {
            thought: thought.into(),
            reframing: reframing.into(),
        }
    }
}

/// The worked examples used by [`PromptComposer::cbt_few_shot`].
pub fn cbt_examples() -> Vec<Exchange> {
    vec![
        Exchange::new(
            "I always mess things up.",
            "It sounds like you're being really hard on yourself. Everyone makes mistakes \
             sometimes, and that doesn't mean you always fail. What matters is learning and \
             growing.",
        ),
        Exchange::new(
            "Nobody likes me.",
            "It's easy to feel that way when we're down, but the truth is usually more \
             nuanced. Some people do care about you, even if it's not obvious right now.",
        ),
    ]
}

/// The ordered request for one model call.
///
/// `system` carries the instruction; `messages` carries any worked examples followed by
/// exactly one user message holding the typed text, rendered through the composer's thought
/// template when it has one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptRequest {
    /// Instruction text for the model.
    pub system: String,
    /// Role-tagged segments, ending with the user's text.
    pub messages: Vec<MessageParam>,
}

impl PromptRequest {
    /// Every segment of the request in order, the instruction first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.system.as_str())
            .chain(self.messages.iter().map(|m| m.content.as_str()))
    }

    /// The final user segment: the typed text as the model receives it.
    pub fn user_text(&self) -> Option<&str> {
        self.messages
            .last()
            .filter(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
    }
}

/// Builds a [`PromptRequest`] from a fixed instruction, optional examples, and user text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptComposer {
    instruction: String,
    examples: Vec<Exchange>,
    thought_template: Option<String>,
}

impl PromptComposer {
    /// A composer with the given instruction and no examples.
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            examples: Vec::new(),
            thought_template: None,
        }
    }

    /// Replace the worked examples.
    pub fn with_examples(mut self, examples: Vec<Exchange>) -> Self {
        self.examples = examples;
        self
    }

    /// Render every thought, examples and user text alike, through `template`.
    ///
    /// Each occurrence of `{thought}` is replaced by the thought.
    pub fn with_thought_template(mut self, template: impl Into<String>) -> Self {
        self.thought_template = Some(template.into());
        self
    }

    /// The instruction-only CBT composer.
    pub fn cbt() -> Self {
        Self::new(CBT_INSTRUCTION)
    }

    /// The CBT composer with worked examples ahead of the user's text.
    pub fn cbt_few_shot() -> Self {
        Self::cbt()
            .with_examples(cbt_examples())
            .with_thought_template(CBT_THOUGHT_TEMPLATE)
    }

    /// The instruction text.
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// The worked examples, possibly empty.
    pub fn examples(&self) -> &[Exchange] {
        &self.examples
    }

    /// The thought template, if any.
    pub fn thought_template(&self) -> Option<&str> {
        self.thought_template.as_deref()
    }

    /// `thought` as the model will see it.
    pub fn render_thought(&self, thought: &str) -> String {
        match &self.thought_template {
            Some(template) => template.replace(THOUGHT_PLACEHOLDER, thought),
            None => thought.to_string(),
        }
    }

    /// Compose the request for `user_text`.
    pub fn compose(&self, user_text: &str) -> PromptRequest {
        let mut messages = Vec::with_capacity(self.examples.len() * 2 + 1);
        for example in &self.examples {
            messages.push(MessageParam::user(self.render_thought(&example.thought)));
            messages.push(MessageParam::assistant(example.reframing.clone()));
        }
        messages.push(MessageParam::user(self.render_thought(user_text)));
        PromptRequest {
            system: self.instruction.clone(),
            messages,
        }
    }
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::cbt()
    }
}
