//! Configuration: the credential from the environment and server options from the command
//! line.
//!
//! Nothing here has a fallback for the credential.  If it is missing, [`bootstrap`] fails
//! before any client is built and the binary halts.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::client::Anthropic;
use crate::client_logger::TracingClientLogger;
use crate::error::{Error, Result};
use crate::model_client::{DEFAULT_MAX_TOKENS, HostedModel, ModelClient};
use crate::observability::CONFIG_HALTS;
use crate::prompt::PromptComposer;
use crate::session::{DEFAULT_IDLE_TIMEOUT, Reframer};
use crate::types::Model;

/// The environment variable holding the provider credential.
pub const API_KEY_VAR: &str = "REFRAME_API_KEY";

/// Default address the page is served on.
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// The credential read from the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    api_key: String,
}

impl Config {
    /// Read the credential from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the credential through `lookup`.
    ///
    /// An unset or blank value is a configuration error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        match lookup(API_KEY_VAR) {
            Some(api_key) if !api_key.trim().is_empty() => Ok(Self { api_key }),
            _ => Err(Error::configuration(
                format!(
                    "API key not found. Please set {API_KEY_VAR} in your environment or .env file."
                ),
                Some(API_KEY_VAR.to_string()),
            )),
        }
    }

    /// The provider credential.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Command-line arguments for the reframe-web tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ServerArgs {
    /// Address to serve the page on.
    #[arrrg(optional, "Address to listen on (default: 127.0.0.1:8501)", "ADDR")]
    pub bind: Option<String>,

    /// Model to send reframing requests to.
    #[arrrg(optional, "Model to use (default: claude-haiku-4-5)", "MODEL")]
    pub model: Option<String>,

    /// Provider base URL.
    #[arrrg(optional, "Provider base URL (default: https://api.anthropic.com/v1/)", "URL")]
    pub base_url: Option<String>,

    /// Maximum tokens per reply.
    #[arrrg(optional, "Max tokens per reply (default: 1024)", "TOKENS")]
    pub max_tokens: Option<u32>,

    /// Precede the user's text with worked examples.
    #[arrrg(flag, "Include worked examples in every prompt")]
    pub few_shot: bool,

    /// Seconds a session may sit unused before it is dropped.
    #[arrrg(optional, "Drop sessions idle this long (default: 1800)", "SECONDS")]
    pub idle_secs: Option<u64>,
}

/// Resolved server settings.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind: String,
    /// Model to send requests to.
    pub model: Model,
    /// Provider base URL; `None` uses the client default.
    pub base_url: Option<String>,
    /// Maximum tokens per reply.
    pub max_tokens: u32,
    /// Whether prompts carry worked examples.
    pub few_shot: bool,
    /// Per-request timeout; `None` uses the client default.
    pub timeout: Option<Duration>,
    /// How long a session may sit unused before it is dropped.
    pub idle_timeout: Duration,
}

impl ServerConfig {
    /// The composer these settings call for.
    pub fn composer(&self) -> PromptComposer {
        if self.few_shot {
            PromptComposer::cbt_few_shot()
        } else {
            PromptComposer::cbt()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            model: Model::default(),
            base_url: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            few_shot: false,
            timeout: None,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

impl From<ServerArgs> for ServerConfig {
    fn from(args: ServerArgs) -> Self {
        let defaults = ServerConfig::default();
        ServerConfig {
            bind: args.bind.unwrap_or(defaults.bind),
            model: args.model.map(Model::from).unwrap_or(defaults.model),
            base_url: args.base_url,
            max_tokens: args.max_tokens.unwrap_or(defaults.max_tokens),
            few_shot: args.few_shot,
            timeout: None,
            idle_timeout: args
                .idle_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.idle_timeout),
        }
    }
}

/// Build the hosted model client for `config` and `server`.
pub fn hosted_model(config: &Config, server: &ServerConfig) -> Result<HostedModel> {
    let client =
        Anthropic::with_options(config.api_key(), server.base_url.clone(), server.timeout)?
            .with_logger(Arc::new(TracingClientLogger));
    Ok(HostedModel::new(client, server.model.clone()).with_max_tokens(server.max_tokens))
}

/// Assemble the reframer, or fail with a configuration error.
///
/// `make_client` is only called once the credential is known to be present.
pub fn bootstrap<M, F>(
    config: Result<Config>,
    server: &ServerConfig,
    make_client: F,
) -> Result<Reframer>
where
    M: ModelClient + 'static,
    F: FnOnce(&Config, &ServerConfig) -> Result<M>,
{
    let model = config.and_then(|config| {
        make_client(&config, server).map_err(|err| {
            if err.is_configuration() {
                err
            } else {
                Error::configuration(format!("Model init failed: {err}"), None)
            }
        })
    });
    match model {
        Ok(model) => Ok(Reframer::new(server.composer(), Arc::new(model))),
        Err(err) => {
            CONFIG_HALTS.click();
            Err(err)
        }
    }
}
