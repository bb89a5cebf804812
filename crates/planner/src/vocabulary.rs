use crate::error::{PlannerError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUILTIN_VOCABULARY: &str = include_str!("../vocabulary/builtin.toml");

static BUILTIN: Lazy<Vocabulary> = Lazy::new(|| {
    toml::from_str(BUILTIN_VOCABULARY).expect("builtin vocabulary must parse")
});

/// Word lists the planner matches queries against.
///
/// Thresholds and confidences are not part of the vocabulary; they are fixed in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub source_extension: String,
    pub conjunctions: Vec<String>,
    pub code_keywords: Vec<String>,
    pub tool_keywords: Vec<String>,
    pub entity_suffixes: Vec<String>,
    pub verb_prefixes: Vec<String>,
    pub technical_terms: Vec<String>,
    pub stop_words: Vec<String>,
    pub facets: FacetTerms,
    pub starting_file_hints: Vec<StartingFileHint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetTerms {
    pub how_question: Vec<String>,
    pub what_question: Vec<String>,
    pub where_question: Vec<String>,
    pub explain: Vec<String>,
    pub architecture: Vec<String>,
    pub implementation: Vec<String>,
    pub config: Vec<String>,
    pub debugging: Vec<String>,
}

/// Maps query substrings to a starting entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingFileHint {
    pub needles: Vec<String>,
    pub entity: String,
}

impl StartingFileHint {
    pub fn matches(&self, lowered_query: &str) -> bool {
        contains_any(lowered_query, &self.needles)
    }
}

impl Vocabulary {
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Overlay the lists present in `raw` on the builtin vocabulary.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let overlay: RawVocabulary = toml::from_str(raw)?;
        let vocabulary = overlay.apply(Self::builtin());
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let vocabulary = Self::from_toml_str(&raw)?;
        log::info!("Loaded planner vocabulary from {}", path.display());
        Ok(vocabulary)
    }

    pub fn validate(&self) -> Result<()> {
        let ext = self.source_extension.trim();
        if ext.is_empty() || ext.starts_with('.') {
            return Err(PlannerError::InvalidVocabulary(format!(
                "source_extension {:?} must be non-empty and given without a leading dot",
                self.source_extension
            )));
        }
        validate_words("entity_suffixes", &self.entity_suffixes)?;
        validate_words("verb_prefixes", &self.verb_prefixes)?;

        let facets = &self.facets;
        for (field, terms) in [
            ("conjunctions", &self.conjunctions),
            ("code_keywords", &self.code_keywords),
            ("tool_keywords", &self.tool_keywords),
            ("technical_terms", &self.technical_terms),
            ("facets.how_question", &facets.how_question),
            ("facets.what_question", &facets.what_question),
            ("facets.where_question", &facets.where_question),
            ("facets.explain", &facets.explain),
            ("facets.architecture", &facets.architecture),
            ("facets.implementation", &facets.implementation),
            ("facets.config", &facets.config),
            ("facets.debugging", &facets.debugging),
        ] {
            validate_terms(field, terms)?;
        }

        for hint in &self.starting_file_hints {
            if hint.entity.trim().is_empty() || hint.needles.is_empty() {
                return Err(PlannerError::InvalidVocabulary(
                    "starting_file_hints entries need an entity and at least one needle"
                        .to_string(),
                ));
            }
            validate_terms("starting_file_hints.needles", &hint.needles)?;
        }
        Ok(())
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Identifier fragments end up inside regexes, so only plain words are allowed.
fn validate_words(field: &str, words: &[String]) -> Result<()> {
    if words.is_empty() {
        return Err(PlannerError::InvalidVocabulary(format!(
            "{field} must not be empty"
        )));
    }
    if let Some(bad) = words
        .iter()
        .find(|w| w.is_empty() || !w.chars().all(|c| c.is_ascii_alphanumeric()))
    {
        return Err(PlannerError::InvalidVocabulary(format!(
            "{field} entry {bad:?} must be a non-empty alphanumeric word"
        )));
    }
    Ok(())
}

/// A blank term is a substring of every query, so it would match everything.
fn validate_terms(field: &str, terms: &[String]) -> Result<()> {
    if let Some(bad) = terms.iter().find(|t| t.trim().is_empty()) {
        return Err(PlannerError::InvalidVocabulary(format!(
            "{field} entry {bad:?} must not be blank"
        )));
    }
    Ok(())
}

pub(crate) fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}

/// Lowercase whitespace tokens with surrounding punctuation trimmed
pub(crate) fn words(lowered: &str) -> impl Iterator<Item = &str> {
    lowered
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| !token.is_empty())
}

#[derive(Debug, Default, Deserialize)]
struct RawVocabulary {
    source_extension: Option<String>,
    conjunctions: Option<Vec<String>>,
    code_keywords: Option<Vec<String>>,
    tool_keywords: Option<Vec<String>>,
    entity_suffixes: Option<Vec<String>>,
    verb_prefixes: Option<Vec<String>>,
    technical_terms: Option<Vec<String>>,
    stop_words: Option<Vec<String>>,
    #[serde(default)]
    facets: RawFacetTerms,
    starting_file_hints: Option<Vec<StartingFileHint>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFacetTerms {
    how_question: Option<Vec<String>>,
    what_question: Option<Vec<String>>,
    where_question: Option<Vec<String>>,
    explain: Option<Vec<String>>,
    architecture: Option<Vec<String>>,
    implementation: Option<Vec<String>>,
    config: Option<Vec<String>>,
    debugging: Option<Vec<String>>,
}

fn lowered(list: Vec<String>) -> Vec<String> {
    list.into_iter().map(|s| s.to_lowercase()).collect()
}

impl RawVocabulary {
    fn apply(self, mut base: Vocabulary) -> Vocabulary {
        if let Some(v) = self.source_extension {
            base.source_extension = v;
        }
        if let Some(v) = self.conjunctions {
            base.conjunctions = lowered(v);
        }
        if let Some(v) = self.code_keywords {
            base.code_keywords = lowered(v);
        }
        if let Some(v) = self.tool_keywords {
            base.tool_keywords = lowered(v);
        }
        if let Some(v) = self.entity_suffixes {
            base.entity_suffixes = v;
        }
        if let Some(v) = self.verb_prefixes {
            base.verb_prefixes = v;
        }
        if let Some(v) = self.technical_terms {
            base.technical_terms = lowered(v);
        }
        if let Some(v) = self.stop_words {
            base.stop_words = lowered(v);
        }
        if let Some(hints) = self.starting_file_hints {
            base.starting_file_hints = hints
                .into_iter()
                .map(|hint| StartingFileHint {
                    needles: lowered(hint.needles),
                    entity: hint.entity,
                })
                .collect();
        }

        let facets = &mut base.facets;
        let raw = self.facets;
        for (slot, value) in [
            (&mut facets.how_question, raw.how_question),
            (&mut facets.what_question, raw.what_question),
            (&mut facets.where_question, raw.where_question),
            (&mut facets.explain, raw.explain),
            (&mut facets.architecture, raw.architecture),
            (&mut facets.implementation, raw.implementation),
            (&mut facets.config, raw.config),
            (&mut facets.debugging, raw.debugging),
        ] {
            if let Some(value) = value {
                *slot = lowered(value);
            }
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_vocabulary_is_valid() {
        let vocabulary = Vocabulary::builtin();
        vocabulary.validate().expect("builtin validates");
        assert_eq!(vocabulary.source_extension, "java");
        assert_eq!(
            vocabulary.entity_suffixes,
            vec!["Service", "Controller", "Config", "Manager", "Advisor", "Builder"]
        );
        assert!(vocabulary.facets.debugging.contains(&"bug".to_string()));
    }

    #[test]
    fn overlay_replaces_only_given_lists() {
        let vocabulary = Vocabulary::from_toml_str(
            r#"
source_extension = "kt"
tool_keywords = ["Deploy"]

[facets]
debugging = ["crash"]
"#,
        )
        .expect("overlay parses");
        let builtin = Vocabulary::builtin();
        assert_eq!(vocabulary.source_extension, "kt");
        assert_eq!(vocabulary.tool_keywords, vec!["deploy"]);
        assert_eq!(vocabulary.facets.debugging, vec!["crash"]);
        assert_eq!(vocabulary.facets.config, builtin.facets.config);
        assert_eq!(vocabulary.stop_words, builtin.stop_words);
    }

    #[test]
    fn rejects_regex_unsafe_suffixes() {
        let err = Vocabulary::from_toml_str(r#"entity_suffixes = ["Serv.*"]"#)
            .expect_err("suffix must be rejected");
        assert!(err.to_string().contains("entity_suffixes"));
        assert!(Vocabulary::from_toml_str(r#"source_extension = ".java""#).is_err());
    }

    #[test]
    fn rejects_blank_terms_and_needles() {
        let err = Vocabulary::from_toml_str(
            r#"
[[starting_file_hints]]
needles = [""]
entity = "Everything"
"#,
        )
        .expect_err("blank needle must be rejected");
        assert!(err.to_string().contains("starting_file_hints.needles"));

        let err = Vocabulary::from_toml_str(r#"code_keywords = ["spring", "  "]"#)
            .expect_err("blank keyword must be rejected");
        assert!(err.to_string().contains("code_keywords"));

        let err = Vocabulary::from_toml_str("[facets]\ndebugging = [\"\"]")
            .expect_err("blank facet term must be rejected");
        assert!(err.to_string().contains("facets.debugging"));

        assert!(Vocabulary::from_toml_str(r#"tool_keywords = [""]"#).is_err());
    }

    #[test]
    fn words_trim_punctuation() {
        let tokens: Vec<&str> = words("how does (chatservice) handle errors?").collect();
        assert_eq!(tokens, vec!["how", "does", "chatservice", "handle", "errors"]);
    }
}
