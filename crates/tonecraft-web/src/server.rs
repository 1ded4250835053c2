//! Axum server setup and router construction.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::{self, AppState};

/// Build the full axum router.
///
/// The router serves:
/// - the landing page at `/` and its script at `/static/js/script.js`
/// - `POST /generate` and `POST /feedback`
/// - optional extra static files from `static_dir` as a fallback
pub fn build_router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    // CORS layer for browser clients served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/", get(api::index))
        .route("/static/js/script.js", get(api::script))
        .route("/generate", post(api::generate))
        .route("/feedback", post(api::post_feedback))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
}

/// Bind the listener, spawn the server on a Tokio task, and return the
/// bound address.
pub async fn start_server(router: Router, bind_addr: SocketAddr) -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!("server stopped: {e}");
        }
    });

    Ok(addr)
}
