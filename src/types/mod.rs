//! Wire types for the Messages API.

pub mod content_block;
pub mod message;
pub mod message_create_params;
pub mod message_param;
pub mod model;
pub mod usage;

pub use content_block::ContentBlock;
pub use message::Message;
pub use message_create_params::MessageCreateParams;
pub use message_param::{MessageParam, MessageRole};
pub use model::{KnownModel, Model};
pub use usage::Usage;
