//! Convenience re-exports for common `tonecraft` types.
//!
//! ```ignore
//! use tonecraft::prelude::*;
//! ```

pub use crate::client::{
    CompletionClient, CompletionError, CompletionFuture, CompletionParams, OpenRouterClient,
};
pub use crate::few_shot::{ExampleStoreError, ExampleTable};
pub use crate::prompt::{
    AssembledPrompt, FixedVariant, GenerationRequest, PromptVariant, RandomVariant, VariantSource,
    assemble, build_prompt,
};
pub use crate::settings::Settings;
