//! reframe: a small web page that turns a negative thought into a supportive, CBT-style
//! reframing from a hosted language model.

pub mod client;
pub mod client_logger;
pub mod config;
pub mod error;
pub mod model_client;
pub mod observability;
pub mod prompt;
pub mod session;
pub mod types;
pub mod web;

pub use client::Anthropic;
pub use client_logger::{ClientLogger, TracingClientLogger};
pub use config::{Config, ServerArgs, ServerConfig, bootstrap, hosted_model};
pub use error::{Error, ErrorKind, ProviderFailure, Result};
pub use model_client::{HostedModel, ModelClient};
pub use observability::register_biometrics;
pub use prompt::{Exchange, PromptComposer, PromptRequest};
pub use session::{ChatSession, Reframer, SessionStore};
pub use types::*;
