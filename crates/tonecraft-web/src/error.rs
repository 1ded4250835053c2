//! Request-level failures and their HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tonecraft::CompletionError;
use tonecraft::settings::API_KEY_ENV;

/// Everything that can go wrong while serving one request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No credential is configured; an operator has to fix the environment.
    #[error(
        "OpenRouter API key is not configured. Please set the {} environment variable.",
        API_KEY_ENV
    )]
    Configuration,
    /// The request body is missing or lacks a required field.
    #[error("{0}")]
    Validation(String),
    /// The completion provider failed.
    #[error("An error occurred with the API call: {0}")]
    Completion(#[from] CompletionError),
}

impl ApiError {
    pub fn missing_field(field: &str) -> Self {
        ApiError::Validation(format!("Invalid request. \"{field}\" is required."))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Configuration | ApiError::Completion(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
