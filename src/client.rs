use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;

use crate::client_logger::ClientLogger;
use crate::error::{Error, ProviderFailure, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{Message, MessageCreateParams};

/// Where requests go unless told otherwise.
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/";
const ANTHROPIC_API_VERSION: &str = "2023-06-01";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the Messages API.
///
/// One client is built at startup and shared by every session; cloning is cheap.
#[derive(Clone)]
pub struct Anthropic {
    api_key: HeaderValue,
    client: ReqwestClient,
    base_url: String,
    timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl Anthropic {
    /// Create a new client with the given credential and default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    ///
    /// Every failure here is a configuration error: an empty or non-header-safe key, a base
    /// URL that does not parse, or an HTTP client that cannot be built.
    pub fn with_options(
        api_key: impl Into<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::configuration("API key is empty", None));
        }
        let mut api_key = HeaderValue::from_str(&api_key).map_err(|_| {
            Error::configuration("API key contains characters not allowed in a header", None)
        })?;
        api_key.set_sensitive(true);

        let base_url = normalize_base_url(base_url.as_deref().unwrap_or(DEFAULT_API_URL))?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::configuration("Failed to build HTTP client", None).with_source(e)
            })?;

        Ok(Self {
            api_key,
            client,
            base_url,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that observes every request.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The base URL requests are sent to, always ending in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("x-api-key", self.api_key.clone());
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_API_VERSION),
        );
        headers
    }

    /// Turn a non-success response into a provider error carrying the provider's message.
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(Deserialize)]
        struct ErrorDetail {
            #[serde(rename = "type")]
            error_type: Option<String>,
            message: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::from_status(status_code, "error body could not be read")
                    .with_source(e);
            }
        };

        let detail = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.error);
        let error_type = detail.as_ref().and_then(|e| e.error_type.clone());
        let error_message = detail
            .and_then(|e| e.message)
            .unwrap_or_else(|| error_body.clone());

        let error_message = match error_type {
            Some(error_type) => format!("{error_type}: {error_message}"),
            None => error_message,
        };
        Error::from_status(status_code, error_message)
    }

    /// Send a message to the API and wait for the whole response.
    pub async fn send(&self, params: MessageCreateParams) -> Result<Message> {
        CLIENT_REQUESTS.click();
        if let Some(logger) = &self.logger {
            logger.log_request(&params);
        }
        let start = Instant::now();
        let result = self.send_inner(&params).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        match &result {
            Ok(message) => {
                if let Some(logger) = &self.logger {
                    logger.log_response(message);
                }
            }
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                if let Some(logger) = &self.logger {
                    logger.log_error(err);
                }
            }
        }
        result
    }

    async fn send_inner(&self, params: &MessageCreateParams) -> Result<Message> {
        let url = format!("{}messages", self.base_url);

        let response = self
            .client
            .post(&url)
            .headers(self.default_headers())
            .json(params)
            .send()
            .await
            .map_err(|e| {
                let failure = if e.is_timeout() {
                    ProviderFailure::TimedOut
                } else if e.is_connect() {
                    ProviderFailure::Unreachable
                } else {
                    ProviderFailure::Transport
                };
                Error::provider(failure, e.to_string()).with_source(e)
            })?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response.json::<Message>().await.map_err(|e| {
            Error::provider(ProviderFailure::Malformed, e.to_string()).with_source(e)
        })
    }
}

impl fmt::Debug for Anthropic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Anthropic")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

fn normalize_base_url(base_url: &str) -> Result<String> {
    let mut url = url::Url::parse(base_url).map_err(|e| {
        Error::configuration(format!("invalid base URL {base_url:?}: {e}"), None).with_source(e)
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn client_creation() {
        let client = Anthropic::new("test-key").unwrap();
        assert_eq!(client.base_url(), DEFAULT_API_URL);
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);

        let client = Anthropic::with_options(
            "test-key",
            Some("https://custom-api.example.com/v1".to_string()),
            Some(Duration::from_secs(30)),
        )
        .unwrap();
        assert_eq!(client.base_url(), "https://custom-api.example.com/v1/");
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn empty_key_is_configuration_error() {
        let err = Anthropic::new("   ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn unprintable_key_is_configuration_error() {
        let err = Anthropic::new("bad\nkey").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn bad_base_url_is_configuration_error() {
        let err = Anthropic::with_options("test-key", Some("not a url".to_string()), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn debug_redacts_key() {
        let client = Anthropic::new("sk-secret").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn headers_carry_key_and_version() {
        let client = Anthropic::new("test-key").unwrap();
        let headers = client.default_headers();
        assert_eq!(headers.get("x-api-key").unwrap(), "test-key");
        assert_eq!(
            headers.get("anthropic-version").unwrap(),
            ANTHROPIC_API_VERSION
        );
    }
}
