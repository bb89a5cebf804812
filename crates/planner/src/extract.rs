use crate::error::{PlannerError, Result};
use crate::vocabulary::{words, Vocabulary};
use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_ENTITIES: usize = 8;
pub const MAX_KEYWORDS: usize = 6;
/// Keywords must be longer than this many characters
pub const MIN_KEYWORD_CHARS: usize = 2;

static BUILTIN_EXTRACTOR: Lazy<PatternEntityExtractor> = Lazy::new(|| {
    PatternEntityExtractor::from_vocabulary(&Vocabulary::builtin())
        .expect("builtin vocabulary patterns must compile")
});

/// Finds candidate code entities mentioned in a query.
///
/// Implementations return candidates in order of discovery; the planner dedupes
/// and caps the result.
pub trait EntityExtractor: Send + Sync {
    fn extract(&self, query: &str) -> Vec<String>;
}

/// Regex-driven extractor built from [`Vocabulary`] word lists
#[derive(Debug, Clone)]
pub struct PatternEntityExtractor {
    suffixed: Regex,
    verb_prefixed: Regex,
    technical_terms: Vec<String>,
}

impl PatternEntityExtractor {
    pub fn builtin() -> Self {
        BUILTIN_EXTRACTOR.clone()
    }

    pub fn from_vocabulary(vocabulary: &Vocabulary) -> Result<Self> {
        let suffixes = alternation(&vocabulary.entity_suffixes);
        let verbs = alternation(&vocabulary.verb_prefixes);
        let compile = |pattern: String| {
            Regex::new(&pattern).map_err(|e| PlannerError::InvalidVocabulary(e.to_string()))
        };

        Ok(Self {
            suffixed: compile(format!(r"\b[A-Z][A-Za-z0-9]*(?:{suffixes})\b"))?,
            verb_prefixed: compile(format!(r"\b(?:{verbs})[A-Z][A-Za-z0-9]*\b"))?,
            technical_terms: vocabulary
                .technical_terms
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
        })
    }
}

impl EntityExtractor for PatternEntityExtractor {
    /// Suffixed type names first, then verb-prefixed methods, then technical terms.
    fn extract(&self, query: &str) -> Vec<String> {
        let mut found: Vec<String> = self
            .suffixed
            .find_iter(query)
            .chain(self.verb_prefixed.find_iter(query))
            .map(|m| m.as_str().to_string())
            .collect();

        let lowered = query.to_lowercase();
        found.extend(
            words(&lowered)
                .filter(|w| self.technical_terms.iter().any(|t| t == w))
                .map(str::to_string),
        );
        found
    }
}

/// Append `item` unless present or `out` is already at `cap`.
pub(crate) fn push_unique(out: &mut Vec<String>, item: String, cap: usize) {
    if out.len() < cap && !out.contains(&item) {
        out.push(item);
    }
}

/// Lowercased, alphanumeric-only tokens that are neither short nor stop words.
pub fn extract_keywords(query: &str, stop_words: &[String]) -> Vec<String> {
    let mut keywords = Vec::new();
    for token in query.split_whitespace() {
        let cleaned: String = token
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        if cleaned.chars().count() <= MIN_KEYWORD_CHARS || stop_words.contains(&cleaned) {
            continue;
        }
        push_unique(&mut keywords, cleaned, MAX_KEYWORDS);
        if keywords.len() == MAX_KEYWORDS {
            break;
        }
    }
    keywords
}

fn alternation(words: &[String]) -> String {
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_suffixed_verbs_and_terms_in_order() {
        let extractor = PatternEntityExtractor::builtin();
        let found = extractor.extract(
            "Why does processPayment in BillingService call the ai memory via CacheManager?",
        );
        assert_eq!(
            found,
            vec!["BillingService", "CacheManager", "processPayment", "ai", "memory"]
        );
    }

    #[test]
    fn technical_terms_need_whole_tokens() {
        let extractor = PatternEntityExtractor::builtin();
        assert!(extractor.extract("explain the maintenance plan").is_empty());
    }

    #[test]
    fn keywords_drop_short_and_stop_words() {
        let stop = Vocabulary::builtin().stop_words;
        assert_eq!(
            extract_keywords("How does the ChatService handle errors? Is it ok?", &stop),
            vec!["chatservice", "handle", "errors"]
        );
    }

    #[test]
    fn keywords_dedupe_and_cap() {
        let stop = Vocabulary::builtin().stop_words;
        let keywords = extract_keywords(
            "alpha beta alpha gamma delta epsilon zeta theta iota",
            &stop,
        );
        assert_eq!(
            keywords,
            vec!["alpha", "beta", "gamma", "delta", "epsilon", "zeta"]
        );
    }

    #[test]
    fn push_unique_honours_cap() {
        let mut out = vec!["a".to_string()];
        push_unique(&mut out, "a".to_string(), 3);
        push_unique(&mut out, "b".to_string(), 2);
        push_unique(&mut out, "c".to_string(), 2);
        assert_eq!(out, vec!["a", "b"]);
    }
}
