//! Prompt assembly.
//!
//! [`build_prompt`] turns a [`GenerationRequest`] into the user message sent to
//! the model. The output is a fixed sequence of lines:
//!
//! ```text
//! <variant instruction>
//! The output must have a '<tone>' tone and a '<style>' style.
//! Follow these rules:
//! <constraint line>                      (omitted when there are no constraints)
//! Here are some examples of the desired output:   (omitted without examples)
//! Example:
//! <example>
//! ---
//! Now, generate the content based on all the above instructions:
//! ```
//!
//! The only nondeterministic input is the [`PromptVariant`], which comes from a
//! caller-supplied [`VariantSource`] so tests can force either phrasing.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::few_shot::ExampleTable;

pub const DEFAULT_TONE: &str = "neutral";
pub const DEFAULT_STYLE: &str = "professional";
pub const DEFAULT_CONTENT_FORMAT: &str = "text";

pub const RULES_HEADER: &str = "Follow these rules:";
pub const EXAMPLES_HEADER: &str = "Here are some examples of the desired output:";
pub const CLOSING_INSTRUCTION: &str =
    "Now, generate the content based on all the above instructions:";

// ── Request ────────────────────────────────────────────────────────

/// A single content-generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub base_request: String,
    pub tone: String,
    pub style: String,
    pub content_format: String,
    /// Comma-separated keywords the output must contain.
    pub keywords: Option<String>,
    /// Maximum length in characters. Ignored unless it is all digits.
    pub char_limit: Option<String>,
}

impl GenerationRequest {
    /// Create a request with default tone, style, and format.
    pub fn new(base_request: impl Into<String>) -> Self {
        Self {
            base_request: base_request.into(),
            tone: DEFAULT_TONE.to_string(),
            style: DEFAULT_STYLE.to_string(),
            content_format: DEFAULT_CONTENT_FORMAT.to_string(),
            keywords: None,
            char_limit: None,
        }
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = tone.into();
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_content_format(mut self, content_format: impl Into<String>) -> Self {
        self.content_format = content_format.into();
        self
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    pub fn with_char_limit(mut self, char_limit: impl Into<String>) -> Self {
        self.char_limit = Some(char_limit.into());
        self
    }
}

// ── Variants ───────────────────────────────────────────────────────

/// Alternate phrasings of the leading instruction, for A/B comparison.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PromptVariant {
    A,
    B,
}

impl PromptVariant {
    /// The opening sentence for this variant.
    pub fn instruction(self, base_request: &str) -> String {
        match self {
            PromptVariant::A => {
                format!("Generate content based on the following request: '{base_request}'.")
            }
            PromptVariant::B => format!(
                "As a creative assistant, please compose content for this request: '{base_request}'."
            ),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PromptVariant::A => "A",
            PromptVariant::B => "B",
        }
    }
}

impl fmt::Display for PromptVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(PromptVariant::A),
            "B" | "b" => Ok(PromptVariant::B),
            other => Err(format!("unknown prompt variant '{other}', expected A or B")),
        }
    }
}

/// Source of the per-request variant draw.
///
/// Implemented for [`RandomVariant`], [`FixedVariant`], and any
/// `Fn() -> PromptVariant` closure.
pub trait VariantSource: Send + Sync {
    fn pick(&self) -> PromptVariant;
}

/// Uniform draw from the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomVariant;

impl VariantSource for RandomVariant {
    fn pick(&self) -> PromptVariant {
        if rand::rng().random_bool(0.5) {
            PromptVariant::A
        } else {
            PromptVariant::B
        }
    }
}

/// Always returns the same variant.
#[derive(Debug, Clone, Copy)]
pub struct FixedVariant(pub PromptVariant);

impl VariantSource for FixedVariant {
    fn pick(&self) -> PromptVariant {
        self.0
    }
}

impl<F> VariantSource for F
where
    F: Fn() -> PromptVariant + Send + Sync,
{
    fn pick(&self) -> PromptVariant {
        self()
    }
}

// ── Assembly ───────────────────────────────────────────────────────

/// A finished prompt and the variant that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPrompt {
    pub text: String,
    pub variant: PromptVariant,
}

/// Draw a variant and build the prompt.
pub fn assemble(
    request: &GenerationRequest,
    examples: &ExampleTable,
    variants: &dyn VariantSource,
) -> AssembledPrompt {
    let variant = variants.pick();
    AssembledPrompt {
        text: build_prompt(request, examples, variant),
        variant,
    }
}

/// Build the prompt for a fixed variant.
pub fn build_prompt(
    request: &GenerationRequest,
    examples: &ExampleTable,
    variant: PromptVariant,
) -> String {
    let parts = [
        variant.instruction(&request.base_request),
        format!(
            "The output must have a '{}' tone and a '{}' style.",
            request.tone, request.style
        ),
        RULES_HEADER.to_string(),
        constraint_line(request),
        few_shot_block(examples.lookup(&request.content_format, &request.style)),
        CLOSING_INSTRUCTION.to_string(),
    ];

    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keyword and length constraints joined by a single space. Empty when
/// neither applies.
pub fn constraint_line(request: &GenerationRequest) -> String {
    let mut constraints = Vec::new();

    if let Some(keywords) = request.keywords.as_deref() {
        // Empty tokens between commas are kept in place.
        let keywords: Vec<&str> = keywords.split(',').map(str::trim).collect();
        if keywords.iter().any(|k| !k.is_empty()) {
            constraints.push(format!(
                "It must include the following keywords: {}.",
                keywords.join(", ")
            ));
        }
    }

    if let Some(limit) = request.char_limit.as_deref()
        && is_digits(limit)
    {
        constraints.push(format!(
            "The total length must not exceed {limit} characters."
        ));
    }

    constraints.join(" ")
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn few_shot_block(examples: &[String]) -> String {
    if examples.is_empty() {
        return String::new();
    }
    let mut lines = vec![EXAMPLES_HEADER.to_string()];
    for example in examples {
        lines.push(format!("Example:\n{example}\n---"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const OPENING_A: &str = "Generate content based on the following request:";
    const OPENING_B: &str = "As a creative assistant, please compose content for this request:";

    fn table() -> ExampleTable {
        [("text_professional", vec!["Hi there!"])]
            .into_iter()
            .collect()
    }

    #[test]
    fn minimal_prompt_layout() {
        let req = GenerationRequest::new("write a tagline");
        let prompt = build_prompt(&req, &ExampleTable::default(), PromptVariant::A);
        assert_eq!(
            prompt,
            "Generate content based on the following request: 'write a tagline'.\n\
             The output must have a 'neutral' tone and a 'professional' style.\n\
             Follow these rules:\n\
             Now, generate the content based on all the above instructions:"
        );
    }

    #[test]
    fn variant_b_opening() {
        let req = GenerationRequest::new("a haiku");
        let prompt = build_prompt(&req, &ExampleTable::default(), PromptVariant::B);
        assert!(prompt.starts_with(
            "As a creative assistant, please compose content for this request: 'a haiku'."
        ));
        assert!(!prompt.contains(OPENING_A));
    }

    #[test]
    fn exactly_one_opening_and_closing_last() {
        for variant in [PromptVariant::A, PromptVariant::B] {
            let req = GenerationRequest::new("x")
                .with_keywords("a, b")
                .with_char_limit("10");
            let prompt = build_prompt(&req, &table(), variant);
            let openings = [OPENING_A, OPENING_B]
                .iter()
                .filter(|o| prompt.contains(*o))
                .count();
            assert_eq!(openings, 1);
            assert!(prompt.ends_with(CLOSING_INSTRUCTION));
        }
    }

    #[test]
    fn empty_constraints_omitted() {
        let req = GenerationRequest::new("x")
            .with_keywords("")
            .with_char_limit("");
        let prompt = build_prompt(&req, &ExampleTable::default(), PromptVariant::A);
        assert!(!prompt.contains("must include"));
        assert!(!prompt.contains("must not exceed"));
        assert!(!prompt.contains("\n\n"), "no blank constraint line");
        assert!(prompt.contains("Follow these rules:\nNow, generate"));
    }

    #[test]
    fn keywords_and_limit_on_one_line() {
        let req = GenerationRequest::new("x")
            .with_keywords("urgent, sale")
            .with_char_limit("280");
        let prompt = build_prompt(&req, &ExampleTable::default(), PromptVariant::A);
        assert!(prompt.contains(
            "Follow these rules:\nIt must include the following keywords: urgent, sale. \
             The total length must not exceed 280 characters.\n"
        ));
    }

    #[test]
    fn keywords_are_trimmed() {
        let req = GenerationRequest::new("x").with_keywords("  alpha ,beta, gamma ");
        assert_eq!(
            constraint_line(&req),
            "It must include the following keywords: alpha, beta, gamma."
        );

        let req = GenerationRequest::new("x").with_keywords("a,,b");
        assert_eq!(
            constraint_line(&req),
            "It must include the following keywords: a, , b."
        );

        let req = GenerationRequest::new("x").with_keywords(" , ");
        assert_eq!(constraint_line(&req), "");
    }

    #[test]
    fn non_numeric_char_limit_ignored() {
        for limit in ["fifty", "abc", "100px", "-5", "1.5", " 280"] {
            let req = GenerationRequest::new("x").with_char_limit(limit);
            assert_eq!(constraint_line(&req), "", "limit {limit:?}");
        }
        let req = GenerationRequest::new("x").with_char_limit("0");
        assert_eq!(
            constraint_line(&req),
            "The total length must not exceed 0 characters."
        );
    }

    #[test]
    fn few_shot_block_included() {
        let req = GenerationRequest::new("x");
        let prompt = build_prompt(&req, &table(), PromptVariant::A);
        assert!(prompt.contains(
            "Here are some examples of the desired output:\nExample:\nHi there!\n---"
        ));
        assert!(prompt.ends_with("---\nNow, generate the content based on all the above instructions:"));
    }

    #[test]
    fn few_shot_block_omitted_for_unknown_key() {
        let req = GenerationRequest::new("x").with_style("casual");
        let prompt = build_prompt(&req, &table(), PromptVariant::A);
        assert!(!prompt.contains(EXAMPLES_HEADER));
        assert!(!prompt.contains("Example:"));
    }

    #[test]
    fn multiple_examples_in_order() {
        let examples: ExampleTable = [("tweet_casual", vec!["one", "two"])].into_iter().collect();
        let req = GenerationRequest::new("x")
            .with_content_format("tweet")
            .with_style("casual");
        let prompt = build_prompt(&req, &examples, PromptVariant::B);
        assert!(prompt.contains("Example:\none\n---\nExample:\ntwo\n---"));
    }

    #[test]
    fn assemble_uses_injected_source() {
        let req = GenerationRequest::new("x");
        let a = assemble(&req, &ExampleTable::default(), &FixedVariant(PromptVariant::A));
        assert_eq!(a.variant, PromptVariant::A);
        assert!(a.text.starts_with(OPENING_A));

        let b = assemble(&req, &ExampleTable::default(), &|| PromptVariant::B);
        assert_eq!(b.variant, PromptVariant::B);
        assert!(b.text.starts_with(OPENING_B));
    }

    #[test]
    fn random_source_reaches_both_variants() {
        let seen: HashSet<PromptVariant> = (0..200).map(|_| RandomVariant.pick()).collect();
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn variant_parse_and_display() {
        assert_eq!("a".parse::<PromptVariant>(), Ok(PromptVariant::A));
        assert_eq!("B".parse::<PromptVariant>(), Ok(PromptVariant::B));
        assert!("C".parse::<PromptVariant>().is_err());
        assert_eq!(PromptVariant::B.to_string(), "B");
        assert_eq!(serde_json::to_value(PromptVariant::A).unwrap(), "A");
    }
}
