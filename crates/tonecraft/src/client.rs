//! OpenRouter chat-completions client.
//!
//! [`CompletionClient`] is the seam between request handling and the remote
//! model: the server holds an `Arc<dyn CompletionClient>` so tests can swap in
//! a stub. [`OpenRouterClient`] is the production implementation.

use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::settings::{API_KEY_ENV, Settings};

/// Any failure talking to the completion provider.
///
/// The message is the upstream error text; failure kinds are not
/// distinguished further.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CompletionError(pub String);

impl CompletionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Boxed future returned by [`CompletionClient::complete`].
pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, CompletionError>> + Send + 'a>>;

/// Inputs for one completion call.
#[derive(Debug, Clone)]
pub struct CompletionParams {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionParams {
    /// Pair a user prompt with the system prompt and sampling settings.
    pub fn from_settings(settings: &Settings, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: settings.system_prompt.clone(),
            user_prompt: user_prompt.into(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }
}

/// Something that can turn a system + user prompt pair into generated text.
pub trait CompletionClient: Send + Sync {
    /// Run one completion. The returned text is trimmed.
    fn complete(&self, params: &CompletionParams) -> CompletionFuture<'_>;
}

// ── Wire types ─────────────────────────────────────────────────────

/// Role of a message in the conversation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Chat completion request body.
#[derive(Serialize, Debug)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Deserialize, Debug)]
struct RawChatResponse {
    choices: Option<Vec<RawChoice>>,
    error: Option<ApiErrorResponse>,
    #[serde(default)]
    usage: Option<UsageInfo>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    message: RawResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    message: String,
}

#[derive(Deserialize, Debug, Clone)]
struct UsageInfo {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for an OpenRouter-compatible chat completions API.
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
    referer: String,
    title: String,
}

impl OpenRouterClient {
    /// Build a client from settings.
    ///
    /// Fails only if the HTTP client cannot be built. A missing credential is
    /// not an error here; calls made without one fail with a
    /// [`CompletionError`] naming the environment variable.
    pub fn new(settings: &Settings) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tonecraft/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;
        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            referer: settings.referer.clone(),
            title: settings.title.clone(),
        })
    }

    /// Send a chat completion request and return the first choice's text.
    pub async fn chat(&self, body: &ChatRequest) -> Result<String, CompletionError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            CompletionError::new(format!("{API_KEY_ENV} is not set"))
        })?;

        debug!(
            "LLM request: model={}, messages={}, max_tokens={}, temp={}",
            body.model,
            body.messages.len(),
            body.max_tokens,
            body.temperature,
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(body)
            .send()
            .await
            .map_err(|e| CompletionError::new(format!("request failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| CompletionError::new(format!("failed to read response: {e}")))?;

        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(CompletionError::new(format!(
                "OpenRouter API HTTP {status}: {text}"
            )));
        }

        parse_completion(&text)
    }
}

impl CompletionClient for OpenRouterClient {
    fn complete(&self, params: &CompletionParams) -> CompletionFuture<'_> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system(&params.system_prompt),
                Message::user(&params.user_prompt),
            ],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };
        Box::pin(async move { self.chat(&body).await })
    }
}

/// Extract the trimmed content of the first choice from a response body.
fn parse_completion(text: &str) -> Result<String, CompletionError> {
    let parsed: RawChatResponse = serde_json::from_str(text)
        .map_err(|e| CompletionError::new(format!("failed to parse response: {e}")))?;

    if let Some(err) = parsed.error {
        return Err(CompletionError::new(format!(
            "OpenRouter API error: {}",
            err.message
        )));
    }

    if let Some(ref usage) = parsed.usage {
        debug!(
            "Token usage: prompt={}, completion={}, total={}",
            usage.prompt_tokens.unwrap_or(0),
            usage.completion_tokens.unwrap_or(0),
            usage.total_tokens.unwrap_or(0),
        );
    }

    let choice = parsed
        .choices
        .and_then(|c| c.into_iter().next())
        .ok_or_else(|| CompletionError::new("response contained no choices"))?;

    if let Some(reason) = &choice.finish_reason {
        debug!("finish_reason={reason}");
    }

    choice
        .message
        .content
        .map(|c| c.trim().to_string())
        .ok_or_else(|| CompletionError::new("response message had no content"))
}
