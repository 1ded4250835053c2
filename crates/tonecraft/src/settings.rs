//! Process-wide generation settings.
//!
//! [`Settings`] is built once at startup and shared read-only with the
//! completion client and the request handler. The only value read from the
//! environment is the OpenRouter credential; everything else is a deployment
//! constant that callers may override when constructing the struct.

use std::time::Duration;

use crate::{DEFAULT_MODEL, OPENROUTER_URL};

/// Environment variable holding the OpenRouter API key.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// System message sent ahead of every assembled prompt.
pub const SYSTEM_PROMPT: &str = "You are an expert creative content generator. \
Follow the user's instructions precisely to control the tone, style, and \
constraints of the output.";

/// Immutable configuration for content generation.
#[derive(Debug, Clone)]
pub struct Settings {
    /// OpenRouter API key. `None` means generation requests are refused.
    pub api_key: Option<String>,
    /// Chat-completions endpoint. Default: [`OPENROUTER_URL`].
    pub endpoint: String,
    /// Model identifier. Default: `"openai/gpt-4o"`.
    pub model: String,
    /// System message paired with every prompt.
    pub system_prompt: String,
    /// Maximum output tokens. Default: `50`.
    pub max_tokens: u32,
    /// Sampling temperature. Default: `0.7`.
    pub temperature: f32,
    /// Upper bound on a single upstream call. Default: 60 seconds.
    pub request_timeout: Duration,
    /// Value of the `HTTP-Referer` attribution header.
    pub referer: String,
    /// Value of the `X-Title` attribution header.
    pub title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: OPENROUTER_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            max_tokens: 50,
            temperature: 0.7,
            request_timeout: Duration::from_secs(60),
            referer: "https://github.com/tonecraft/tonecraft".to_string(),
            title: "tonecraft".to_string(),
        }
    }
}

impl Settings {
    /// Build settings from the process environment.
    ///
    /// Loads a `.env` file from the working directory first if one exists.
    /// An unset or blank `OPENROUTER_API_KEY` leaves [`api_key`](Self::api_key)
    /// empty rather than failing, so the server can still start and report a
    /// configuration error per request.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!("loaded environment from {}", path.display());
        }
        Self::default().with_api_key(std::env::var(API_KEY_ENV).ok())
    }

    /// Replace the credential. Blank keys are treated as absent.
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Whether a credential is available for upstream calls.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}
