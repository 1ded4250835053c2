//! Build a content-generation prompt and send it to OpenRouter.
//!
//! Reads the API key from `OPENROUTER_API_KEY` (a `.env` file in the working
//! directory is loaded first if present).
//!
//! # Examples
//!
//! ```sh
//! # Generate with defaults (neutral tone, professional style, text format)
//! tonecraft "write a tagline for a lemonade stand"
//!
//! # Full control over the prompt
//! tonecraft "announce the spring sale" --tone playful --style casual \
//!   --format tweet --keywords "urgent, sale" --char-limit 280
//!
//! # Inspect the assembled prompt without calling the API
//! tonecraft "write a tagline" --variant b --dry-run
//! ```

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tonecraft::prelude::*;
use tonecraft::prompt::{DEFAULT_CONTENT_FORMAT, DEFAULT_STYLE, DEFAULT_TONE};

/// Generate tone- and style-controlled content through OpenRouter.
#[derive(Parser)]
#[command(name = "tonecraft")]
struct Cli {
    /// What to generate
    base_request: String,

    /// Desired tone of the output
    #[arg(long, default_value = DEFAULT_TONE)]
    tone: String,

    /// Desired writing style
    #[arg(long, default_value = DEFAULT_STYLE)]
    style: String,

    /// Output format (selects few-shot examples together with --style)
    #[arg(long = "format", default_value = DEFAULT_CONTENT_FORMAT)]
    content_format: String,

    /// Comma-separated keywords the output must include
    #[arg(long)]
    keywords: Option<String>,

    /// Maximum output length in characters (digits only)
    #[arg(long)]
    char_limit: Option<String>,

    /// Path to the few-shot examples file
    #[arg(long, default_value = tonecraft::DEFAULT_EXAMPLES_PATH)]
    examples: PathBuf,

    /// Force prompt variant A or B instead of drawing at random
    #[arg(long)]
    variant: Option<PromptVariant>,

    /// Print the assembled prompt and exit without calling the API
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn generation_request(&self) -> GenerationRequest {
        GenerationRequest {
            base_request: self.base_request.clone(),
            tone: self.tone.clone(),
            style: self.style.clone(),
            content_format: self.content_format.clone(),
            keywords: self.keywords.clone(),
            char_limit: self.char_limit.clone(),
        }
    }
}

async fn run(cli: &Cli) -> Result<String, String> {
    let examples = ExampleTable::load(&cli.examples).map_err(|e| e.to_string())?;
    let request = cli.generation_request();

    let prompt = match cli.variant {
        Some(v) => assemble(&request, &examples, &FixedVariant(v)),
        None => assemble(&request, &examples, &RandomVariant),
    };

    if cli.dry_run {
        return Ok(format!("[variant {}]\n{}", prompt.variant, prompt.text));
    }

    let settings = Settings::from_env();
    let client = OpenRouterClient::new(&settings)?;
    eprintln!("  [variant {}] sending to {}", prompt.variant, settings.model);

    client
        .complete(&CompletionParams::from_settings(&settings, prompt.text))
        .await
        .map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() {
    tonecraft::init_tracing("warn");
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
