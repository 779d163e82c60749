use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Represents a hosted model identifier.
///
/// This can be a predefined model version or a custom string value for models that are
/// newer than this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Model {
    /// Known model versions
    Known(KnownModel),

    /// Custom model identifier
    Custom(String),
}

/// Known model versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModel {
    /// Claude Haiku 4.5
    #[serde(rename = "claude-haiku-4-5")]
    ClaudeHaiku45,

    /// Claude Sonnet 4.5
    #[serde(rename = "claude-sonnet-4-5")]
    ClaudeSonnet45,

    /// Claude Sonnet 4.0
    #[serde(rename = "claude-sonnet-4-0")]
    ClaudeSonnet40,

    /// Claude 3.5 Haiku (latest version)
    #[serde(rename = "claude-3-5-haiku-latest")]
    Claude35HaikuLatest,
}

impl KnownModel {
    const ALL: [KnownModel; 4] = [
        KnownModel::ClaudeHaiku45,
        KnownModel::ClaudeSonnet45,
        KnownModel::ClaudeSonnet40,
        KnownModel::Claude35HaikuLatest,
    ];

    /// The identifier the provider expects on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownModel::ClaudeHaiku45 => "claude-haiku-4-5",
            KnownModel::ClaudeSonnet45 => "claude-sonnet-4-5",
            KnownModel::ClaudeSonnet40 => "claude-sonnet-4-0",
            KnownModel::Claude35HaikuLatest => "claude-3-5-haiku-latest",
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Known(KnownModel::ClaudeHaiku45)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Known(known_model) => write!(f, "{}", known_model),
            Model::Custom(custom) => write!(f, "{}", custom),
        }
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Model::from(s))
    }
}

impl From<KnownModel> for Model {
    fn from(model: KnownModel) -> Self {
        Model::Known(model)
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        Model::from(model.as_str())
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        KnownModel::ALL
            .iter()
            .find(|known| known.as_str() == model)
            .map(|known| Model::Known(*known))
            .unwrap_or_else(|| Model::Custom(model.to_string()))
    }
}
