//! Browser front end for tonecraft content generation.
//!
//! `tonecraft-web` exposes an axum server with a landing page and a JSON
//! endpoint that assembles a prompt from the submitted form and relays the
//! model's answer.
//!
//! # Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use tonecraft::prelude::*;
//! use tonecraft_web::{AppState, WebConfig, spawn_web};
//!
//! let settings = Settings::from_env();
//! let state = AppState {
//!     completer: Arc::new(OpenRouterClient::new(&settings)?),
//!     examples: Arc::new(ExampleTable::load("examples.json")?),
//!     settings: Arc::new(settings),
//!     variants: Arc::new(RandomVariant),
//! };
//! let addr = spawn_web(state, WebConfig::default()).await?;
//! println!("Web UI: http://{addr}");
//! ```
//!
//! # Endpoints
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /` | Landing page |
//! | `POST /generate` | `{base_request, tone?, style?, content_format?, keywords?, char_limit?}` → `{generated_text, prompt_variation_used, full_prompt_sent}` |
//! | `POST /feedback` | `{variation, rating}` → 204 |
//!
//! Errors are returned as `{"error": "..."}` with status 400 (missing
//! `base_request`) or 500 (no API key, upstream failure).

mod api;
pub mod error;
mod server;

pub use api::{AppState, GenerateResponse};
pub use error::ApiError;
pub use server::build_router;

use std::net::SocketAddr;
use std::path::PathBuf;

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:5000`.
    pub bind_addr: SocketAddr,
    /// Extra static files served for paths no route matches.
    pub static_dir: Option<PathBuf>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            static_dir: None,
        }
    }
}

/// Spawn the web server on a Tokio task and return the bound address.
///
/// The server runs until the Tokio runtime shuts down.
pub async fn spawn_web(state: AppState, config: WebConfig) -> std::io::Result<SocketAddr> {
    let router = server::build_router(state, config.static_dir);
    server::start_server(router, config.bind_addr).await
}
