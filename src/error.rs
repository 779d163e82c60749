//! Error types for reframe.
//!
//! Every failure falls into one of two kinds.  Configuration errors halt startup; provider
//! errors are shown inline on the page and the session carries on.  A provider error carries
//! a [`ProviderFailure`] saying what went wrong, so the page and the logs can tell a refused
//! key from an overloaded service without matching on HTTP codes.

use std::error;
use std::fmt;
use std::io;
use std::sync::Arc;

type Source = Arc<dyn error::Error + Send + Sync>;

/// The two ways a reframe operation can fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The process cannot start: a missing credential, a bad option, or an unbuildable client.
    Configuration,
    /// A call to the language-model provider failed.
    Provider,
}

/// What went wrong talking to the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderFailure {
    /// The credential was refused (401).
    Rejected,
    /// The credential is valid but may not use this model (403).
    Denied,
    /// The request itself was invalid (400).
    InvalidRequest,
    /// Too many requests (429).
    Throttled,
    /// The provider failed or is overloaded (5xx).
    Unavailable,
    /// No connection could be made.
    Unreachable,
    /// The request ran past the client timeout, or the provider reported one (408).
    TimedOut,
    /// The request failed in transit for some other reason.
    Transport,
    /// The reply could not be parsed, or held no text.
    Malformed,
    /// Any other non-success status.
    Other,
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ProviderFailure::Rejected => "the provider did not accept the API key",
            ProviderFailure::Denied => "the API key may not use this model",
            ProviderFailure::InvalidRequest => "the provider rejected the request",
            ProviderFailure::Throttled => "the provider is rate limiting requests",
            ProviderFailure::Unavailable => "the provider is unavailable",
            ProviderFailure::Unreachable => "could not reach the provider",
            ProviderFailure::TimedOut => "the provider took too long to answer",
            ProviderFailure::Transport => "the request to the provider failed",
            ProviderFailure::Malformed => "the provider sent an unusable reply",
            ProviderFailure::Other => "the provider returned an error",
        };
        f.write_str(text)
    }
}

/// The main error type for reframe.
#[derive(Clone, Debug)]
pub enum Error {
    /// Required configuration is missing or unusable.
    Configuration {
        message: String,
        /// The setting at fault, if one can be named.
        key: Option<String>,
        source: Option<Source>,
    },

    /// The provider call failed.
    Provider {
        failure: ProviderFailure,
        /// HTTP status, when the provider answered at all.
        status: Option<u16>,
        message: String,
        source: Option<Source>,
    },

    /// The listener could not be bound or the server stopped abnormally.
    Io { message: String, source: Arc<io::Error> },
}

impl Error {
    /// A configuration error, optionally naming the setting at fault.
    pub fn configuration(message: impl Into<String>, key: Option<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            key,
            source: None,
        }
    }

    /// A provider error with no HTTP status.
    pub fn provider(failure: ProviderFailure, message: impl Into<String>) -> Self {
        Error::Provider {
            failure,
            status: None,
            message: message.into(),
            source: None,
        }
    }

    /// The provider answered `status`; classify it.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let failure = match status {
            400 => ProviderFailure::InvalidRequest,
            401 => ProviderFailure::Rejected,
            403 => ProviderFailure::Denied,
            408 => ProviderFailure::TimedOut,
            429 => ProviderFailure::Throttled,
            500..=599 => ProviderFailure::Unavailable,
            _ => ProviderFailure::Other,
        };
        Error::Provider {
            failure,
            status: Some(status),
            message: message.into(),
            source: None,
        }
    }

    /// An I/O error from serving the page.
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            message: message.into(),
            source: Arc::new(source),
        }
    }

    /// Attach the underlying cause.  I/O errors already carry theirs.
    pub fn with_source(mut self, cause: impl error::Error + Send + Sync + 'static) -> Self {
        match &mut self {
            Error::Configuration { source, .. } | Error::Provider { source, .. } => {
                *source = Some(Arc::new(cause));
            }
            Error::Io { .. } => {}
        }
        self
    }

    /// Classifies this error as fatal configuration or recoverable provider failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration { .. } | Error::Io { .. } => ErrorKind::Configuration,
            Error::Provider { .. } => ErrorKind::Provider,
        }
    }

    /// Returns true if this error must halt startup.
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    /// What went wrong with the provider, for provider errors.
    pub fn failure(&self) -> Option<ProviderFailure> {
        match self {
            Error::Provider { failure, .. } => Some(*failure),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration { message, key, .. } => match key {
                Some(key) => write!(f, "Configuration error: {message} (key: {key})"),
                None => write!(f, "Configuration error: {message}"),
            },
            Error::Provider {
                failure,
                status,
                message,
                ..
            } => {
                write!(f, "{failure}")?;
                if let Some(status) = status {
                    write!(f, " (HTTP {status})")?;
                }
                if !message.is_empty() {
                    write!(f, ": {message}")?;
                }
                Ok(())
            }
            Error::Io { message, source } => write!(f, "{message}: {source}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Configuration { source, .. } | Error::Provider { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Io { source, .. } => Some(source),
        }
    }
}

/// A specialized Result type for reframe operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_configuration() {
        let err = Error::configuration(
            "credential not set",
            Some("REFRAME_API_KEY".to_string()),
        );
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.is_configuration());
        assert_eq!(err.failure(), None);
        assert_eq!(
            err.to_string(),
            "Configuration error: credential not set (key: REFRAME_API_KEY)"
        );
    }

    #[test]
    fn statuses_classify() {
        let cases = [
            (400, ProviderFailure::InvalidRequest),
            (401, ProviderFailure::Rejected),
            (403, ProviderFailure::Denied),
            (408, ProviderFailure::TimedOut),
            (418, ProviderFailure::Other),
            (429, ProviderFailure::Throttled),
            (500, ProviderFailure::Unavailable),
            (503, ProviderFailure::Unavailable),
            (529, ProviderFailure::Unavailable),
        ];
        for (status, failure) in cases {
            let err = Error::from_status(status, "nope");
            assert_eq!(err.failure(), Some(failure), "{status}");
            assert_eq!(err.kind(), ErrorKind::Provider);
        }
    }

    #[test]
    fn provider_display_names_failure_once() {
        let err = Error::provider(ProviderFailure::Unreachable, "connection refused");
        assert_eq!(
            err.to_string(),
            "could not reach the provider: connection refused"
        );
        let err = Error::from_status(401, "invalid x-api-key");
        assert_eq!(
            err.to_string(),
            "the provider did not accept the API key (HTTP 401): invalid x-api-key"
        );
    }

    #[test]
    fn source_is_kept() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::provider(ProviderFailure::Malformed, "bad body").with_source(json_err);
        assert!(error::Error::source(&err).is_some());

        let err = Error::io("failed to bind", io::Error::other("in use"));
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "failed to bind: in use");
        assert!(error::Error::source(&err).is_some());
    }
}
