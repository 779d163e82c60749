//! Logging trait for provider client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows callers to observe every
//! exchange passing through the [`Anthropic`](crate::Anthropic) client.

use crate::{Error, Message, MessageCreateParams};

/// A trait for logging provider client operations.
///
/// # Example
///
/// ```rust,ignore
/// use reframe::{ClientLogger, Error, Message, MessageCreateParams};
///
/// struct Stderr;
///
/// impl ClientLogger for Stderr {
///     fn log_request(&self, params: &MessageCreateParams) {
///         eprintln!("sending {} messages", params.messages.len());
///     }
///
///     fn log_response(&self, message: &Message) {
///         eprintln!("received {}", message.id);
///     }
///
///     fn log_error(&self, error: &Error) {
///         eprintln!("failed: {error}");
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log an outbound request just before it is sent.
    fn log_request(&self, params: &MessageCreateParams);

    /// Log a complete response from a successful `send` call.
    fn log_response(&self, message: &Message);

    /// Log a failed `send` call.
    fn log_error(&self, error: &Error);
}

/// A [`ClientLogger`] that forwards to `tracing`.
///
/// Requests and responses go out at debug level; failures at warn.  Message content is never
/// logged, only its shape.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingClientLogger;

impl ClientLogger for TracingClientLogger {
    fn log_request(&self, params: &MessageCreateParams) {
        tracing::debug!(
            model = %params.model,
            messages = params.messages.len(),
            max_tokens = params.max_tokens,
            "sending request to provider"
        );
    }

    fn log_response(&self, message: &Message) {
        tracing::debug!(
            id = %message.id,
            stop_reason = message.stop_reason.as_deref().unwrap_or("none"),
            input_tokens = message.usage.input_tokens,
            output_tokens = message.usage.output_tokens,
            "provider responded"
        );
    }

    fn log_error(&self, error: &Error) {
        tracing::warn!(error = %error, "provider request failed");
    }
}
