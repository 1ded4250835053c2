//! Tone- and style-controlled content generation on top of the
//! [OpenRouter](https://openrouter.ai/) chat completions API.
//!
//! A [`GenerationRequest`] (base text, tone, style, output format, keyword and
//! length constraints) is turned into a prompt by [`prompt::assemble`], which
//! also picks one of two opening phrasings for informal A/B comparison and
//! splices in few-shot examples from an [`ExampleTable`]. The prompt is then
//! sent through a [`CompletionClient`], normally the [`OpenRouterClient`].
//!
//! ```ignore
//! use tonecraft::prelude::*;
//!
//! let settings = Settings::from_env();
//! let examples = ExampleTable::load("examples.json")?;
//! let client = OpenRouterClient::new(&settings)?;
//!
//! let request = GenerationRequest::new("write a tagline")
//!     .with_tone("playful")
//!     .with_keywords("fresh, fun");
//! let prompt = assemble(&request, &examples, &RandomVariant);
//! let text = client
//!     .complete(&CompletionParams::from_settings(&settings, &prompt.text))
//!     .await?;
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`few_shot`] | Example table keyed by `"{content_format}_{style}"` |
//! | [`prompt`] | Request type, A/B variants, prompt assembly |
//! | [`client`] | [`CompletionClient`] trait and the OpenRouter implementation |
//! | [`settings`] | Process-wide [`Settings`] built once at startup |

pub mod client;
pub mod few_shot;
pub mod prelude;
pub mod prompt;
pub mod settings;

pub use client::{
    CompletionClient, CompletionError, CompletionFuture, CompletionParams, OpenRouterClient,
};
pub use few_shot::{ExampleStoreError, ExampleTable};
pub use prompt::{
    AssembledPrompt, FixedVariant, GenerationRequest, PromptVariant, RandomVariant, VariantSource,
};
pub use settings::Settings;

// ── Constants ──────────────────────────────────────────────────────

pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Model used for all generation calls.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o";

/// Default location of the few-shot examples file, relative to the working
/// directory.
pub const DEFAULT_EXAMPLES_PATH: &str = "examples.json";

/// Install the `tracing` subscriber used by the binaries.
///
/// Honors `RUST_LOG`; falls back to `default_filter` when it is unset or
/// invalid.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
