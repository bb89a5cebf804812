use crate::error::{GraphError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Suffixes that mark an identifier as a graph entity reference.
pub const DEFAULT_REFERENCE_SUFFIXES: [&str; 3] = ["Service", "Advisor", "Controller"];

static DEFAULT_REFERENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&suffix_pattern(&DEFAULT_REFERENCE_SUFFIXES))
        .expect("builtin reference pattern must compile")
});

/// Pulls candidate entity references out of source text.
///
/// Implementations return matches in order of appearance; duplicates are allowed
/// and collapsed by the builder.
pub trait ReferenceExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Vec<String>;
}

/// Matches `UpperCamelCase` identifiers that end in one of a fixed set of suffixes.
#[derive(Debug, Clone)]
pub struct SuffixReferenceExtractor {
    pattern: Regex,
}

impl SuffixReferenceExtractor {
    pub fn new<S: AsRef<str>>(suffixes: &[S]) -> Result<Self> {
        if suffixes.is_empty() {
            return Err(GraphError::InvalidPattern(
                "at least one reference suffix is required".to_string(),
            ));
        }
        if let Some(bad) = suffixes
            .iter()
            .map(AsRef::as_ref)
            .find(|s| s.is_empty() || !s.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            return Err(GraphError::InvalidPattern(format!(
                "reference suffix {bad:?} must be a non-empty alphanumeric word"
            )));
        }

        let pattern = Regex::new(&suffix_pattern(suffixes))
            .map_err(|e| GraphError::InvalidPattern(e.to_string()))?;
        Ok(Self { pattern })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for SuffixReferenceExtractor {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_REFERENCE_PATTERN.clone(),
        }
    }
}

impl ReferenceExtractor for SuffixReferenceExtractor {
    fn extract(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

fn suffix_pattern<S: AsRef<str>>(suffixes: &[S]) -> String {
    let alternation = suffixes
        .iter()
        .map(|s| regex::escape(s.as_ref()))
        .collect::<Vec<_>>()
        .join("|");
    format!(r"\b[A-Z][A-Za-z0-9]*(?:{alternation})\b")
}
