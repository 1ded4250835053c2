//! HTTP endpoint handlers.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tonecraft::prompt::{DEFAULT_CONTENT_FORMAT, DEFAULT_STYLE, DEFAULT_TONE};
use tonecraft::{
    CompletionClient, CompletionParams, ExampleTable, GenerationRequest, PromptVariant, Settings,
    VariantSource, prompt,
};
use tracing::{info, warn};

use crate::error::ApiError;

const INDEX_HTML: &str = include_str!("../static/index.html");
const SCRIPT_JS: &str = include_str!("../static/js/script.js");

/// Shared application state passed to all handlers via axum's `State` extractor.
///
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub examples: Arc<ExampleTable>,
    pub completer: Arc<dyn CompletionClient>,
    pub variants: Arc<dyn VariantSource>,
}

/// GET / — Landing page with the generation form.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /static/js/script.js — Form logic for the landing page.
pub async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        SCRIPT_JS,
    )
}

/// Request body for POST /generate.
///
/// Kept as a raw JSON object: only the presence of `base_request` is
/// checked. Scalar values of any type are accepted as text.
#[derive(Debug)]
pub struct GenerateBody(Map<String, Value>);

impl GenerateBody {
    /// Field as text. Strings are taken as-is, any other value as its JSON
    /// text. `None` only when the key is absent.
    fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Optional field with a default. `null` counts as absent.
    fn text_or(&self, key: &str, default: &str) -> String {
        match self.0.get(key) {
            None | Some(Value::Null) => default.to_string(),
            Some(_) => self.text(key).unwrap_or_default(),
        }
    }

    /// Constraint field. Only strings take effect.
    fn constraint(&self, key: &str) -> Option<String> {
        match self.0.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        }
    }

    fn into_request(self) -> Result<GenerationRequest, ApiError> {
        let base_request = self
            .text("base_request")
            .ok_or_else(|| ApiError::missing_field("base_request"))?;
        Ok(GenerationRequest {
            base_request,
            tone: self.text_or("tone", DEFAULT_TONE),
            style: self.text_or("style", DEFAULT_STYLE),
            content_format: self.text_or("content_format", DEFAULT_CONTENT_FORMAT),
            keywords: self.constraint("keywords"),
            char_limit: self.constraint("char_limit"),
        })
    }
}

/// Response body for a successful POST /generate.
#[derive(Serialize, Deserialize, Debug)]
pub struct GenerateResponse {
    pub generated_text: String,
    pub prompt_variation_used: PromptVariant,
    pub full_prompt_sent: String,
}

/// POST /generate — Build a prompt and relay the model's answer.
///
/// Returns 500 if no credential is configured, 400 if the body is not a JSON
/// object with `base_request`, and 500 with the upstream error text if the
/// completion call fails.
pub async fn generate(
    State(app): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, ApiError> {
    if !app.settings.has_credential() {
        warn!("generate refused: no API key configured");
        return Err(ApiError::Configuration);
    }

    let request = parse_body(&body)?.into_request()?;

    let assembled = prompt::assemble(&request, &app.examples, app.variants.as_ref());
    let params = CompletionParams::from_settings(&app.settings, assembled.text.clone());

    let generated_text = app.completer.complete(&params).await.map_err(|e| {
        warn!(variant = %assembled.variant, "completion failed: {e}");
        ApiError::from(e)
    })?;

    info!(
        variant = %assembled.variant,
        format = %request.content_format,
        style = %request.style,
        chars = generated_text.chars().count(),
        "generated content"
    );

    Ok(Json(GenerateResponse {
        generated_text,
        prompt_variation_used: assembled.variant,
        full_prompt_sent: assembled.text,
    }))
}

fn parse_body(body: &[u8]) -> Result<GenerateBody, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::missing_field("base_request"));
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::Validation(format!("Invalid request body: {e}")))?;
    match value {
        Value::Object(map) => Ok(GenerateBody(map)),
        // `null` and other non-object JSON carry no fields at all.
        _ => Err(ApiError::missing_field("base_request")),
    }
}

/// Request body for POST /feedback.
#[derive(Deserialize, Debug)]
pub struct FeedbackRequest {
    pub variation: PromptVariant,
    pub rating: String,
}

/// POST /feedback — Record a rating for a prompt variant.
///
/// The rating is emitted as a structured log event; nothing is stored.
/// Returns 204 on success, 400 on a malformed body.
pub async fn post_feedback(body: Bytes) -> Result<StatusCode, ApiError> {
    let feedback: FeedbackRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Validation(format!("Invalid feedback: {e}")))?;
    info!(
        target: "tonecraft::feedback",
        variant = %feedback.variation,
        rating = %feedback.rating,
        "variant feedback"
    );
    Ok(StatusCode::NO_CONTENT)
}
