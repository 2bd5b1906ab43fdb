//! Placeholder substitution for narrative templates
//!
//! Templates embed `{token}` markers. Each token resolves to either a fixed
//! list of candidate strings (one chosen at random per occurrence) or a
//! generator function (for dynamic values like a date within the last 30
//! days). Tokens with no registered value degrade to a generic filler phrase
//! instead of failing, so a new template referencing a not-yet-defined token
//! never crashes a batch run.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::rng::SeedRng;

/// Word-character tokens only; `{not a token}` is left as-is.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("token pattern is valid"));

/// Substituted for tokens with no registered value.
const FILLER: &str = "the relevant details";

/// Value source for one placeholder token.
pub enum PlaceholderValue {
    /// One element chosen uniformly at random per occurrence.
    Fixed(Vec<String>),
    /// Generator invoked per occurrence. Takes the run's RNG so dynamic values
    /// stay deterministic under a fixed seed.
    Dynamic(Box<dyn Fn(&mut SeedRng) -> String + Send + Sync>),
}

impl std::fmt::Debug for PlaceholderValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(options) => f.debug_tuple("Fixed").field(options).finish(),
            Self::Dynamic(_) => f.debug_tuple("Dynamic").field(&"<fn>").finish(),
        }
    }
}

/// Token-name → value registry used when expanding a template.
#[derive(Debug, Default)]
pub struct PlaceholderSet {
    values: HashMap<String, PlaceholderValue>,
}

impl PlaceholderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixed candidate list for `token`.
    pub fn fixed(mut self, token: &str, options: &[&str]) -> Self {
        self.values.insert(
            token.to_string(),
            PlaceholderValue::Fixed(options.iter().map(|s| s.to_string()).collect()),
        );
        self
    }

    /// Register a generator function for `token`.
    pub fn dynamic(
        mut self,
        token: &str,
        f: impl Fn(&mut SeedRng) -> String + Send + Sync + 'static,
    ) -> Self {
        self.values
            .insert(token.to_string(), PlaceholderValue::Dynamic(Box::new(f)));
        self
    }

    /// Expand every `{token}` occurrence in `text`.
    ///
    /// Single pass: replacement text is never rescanned, so expansion always
    /// terminates even if a value itself contains braces. Repeated occurrences
    /// of one token are resolved independently.
    pub fn expand(&self, text: &str, rng: &mut SeedRng) -> String {
        TOKEN_RE
            .replace_all(text, |caps: &Captures| {
                let token = &caps[1];
                match self.values.get(token) {
                    Some(PlaceholderValue::Fixed(options)) => rng
                        .pick(options)
                        .cloned()
                        .unwrap_or_else(|| FILLER.to_string()),
                    Some(PlaceholderValue::Dynamic(f)) => f(rng),
                    None => FILLER.to_string(),
                }
            })
            .into_owned()
    }
}
