//! Tonecraft web server.
//!
//! Serves the generation form at `/` and the JSON API at `/generate`.
//! Reads the API key from `OPENROUTER_API_KEY`, loading a `.env` file from
//! the working directory first if one exists.
//!
//! # Usage
//!
//! ```bash
//! OPENROUTER_API_KEY=sk-or-... cargo run -p tonecraft-web
//! cargo run -p tonecraft-web -- --port 8080 --examples data/examples.json
//! RUST_LOG=tonecraft=debug cargo run -p tonecraft-web
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tonecraft::prelude::*;
use tonecraft_web::{AppState, WebConfig, spawn_web};
use tracing::{error, info, warn};

/// Tone- and style-controlled content generation server.
#[derive(Parser)]
#[command(about = "Web server for tone- and style-controlled content generation")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on.
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Path to the few-shot examples file.
    #[arg(long, default_value = tonecraft::DEFAULT_EXAMPLES_PATH)]
    examples: PathBuf,

    /// Directory of extra static files to serve.
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Seconds to wait for the completion provider before giving up.
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    tonecraft::init_tracing("info,tower_http=info");
    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), String> {
    // 1. Settings and credential.
    let settings = Settings::from_env()
        .with_request_timeout(Duration::from_secs(args.timeout_secs));
    if !settings.has_credential() {
        warn!(
            "{} is not set; /generate will answer with a configuration error",
            tonecraft::settings::API_KEY_ENV
        );
    }

    // 2. Few-shot examples. The server is useless without them.
    let examples = ExampleTable::load(&args.examples).map_err(|e| e.to_string())?;
    info!(
        "loaded {} example set(s): {}",
        examples.len(),
        examples.keys().join(", ")
    );

    // 3. Completion client.
    let client = OpenRouterClient::new(&settings)?;

    let state = AppState {
        settings: Arc::new(settings),
        examples: Arc::new(examples),
        completer: Arc::new(client),
        variants: Arc::new(RandomVariant),
    };

    // 4. Serve until interrupted.
    let config = WebConfig {
        bind_addr: SocketAddr::new(args.host, args.port),
        static_dir: args.static_dir,
    };
    let addr = spawn_web(state, config)
        .await
        .map_err(|e| format!("failed to bind: {e}"))?;
    info!("listening on http://{addr}");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("failed to listen for shutdown signal: {e}"))?;
    info!("shutting down");
    Ok(())
}
