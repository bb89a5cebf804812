use crate::vocabulary::{contains_any, words, Vocabulary};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Queries longer than this (in whitespace tokens) are `High` complexity
pub const HIGH_COMPLEXITY_TOKENS: usize = 20;
/// Queries longer than this (in whitespace tokens) are at least `Medium` complexity
pub const MEDIUM_COMPLEXITY_TOKENS: usize = 8;

/// Coarse classification of what a query asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    Debug,
    Config,
    Architecture,
    Implementation,
    Code,
    Tools,
    General,
}

impl Intent {
    /// Fixed per-intent confidence; not derived from query features.
    #[must_use]
    pub const fn confidence(self) -> f32 {
        match self {
            Intent::Debug => 0.9,
            Intent::Config => 0.85,
            Intent::Architecture => 0.9,
            Intent::Implementation => 0.8,
            Intent::Code => 0.75,
            Intent::Tools => 0.8,
            Intent::General => 0.6,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Intent::Debug => "DEBUG",
            Intent::Config => "CONFIG",
            Intent::Architecture => "ARCHITECTURE",
            Intent::Implementation => "IMPLEMENTATION",
            Intent::Code => "CODE",
            Intent::Tools => "TOOLS",
            Intent::General => "GENERAL",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    /// `High` for long or compound queries, `Medium` for moderately long or
    /// architectural ones, `Low` otherwise.
    pub fn assess(query: &str, intent: Intent, vocabulary: &Vocabulary) -> Self {
        let token_count = query.split_whitespace().count();
        let lowered = query.to_lowercase();
        let compound = words(&lowered).any(|w| vocabulary.conjunctions.iter().any(|c| c == w));

        if token_count > HIGH_COMPLEXITY_TOKENS || compound {
            Complexity::High
        } else if token_count > MEDIUM_COMPLEXITY_TOKENS || intent == Intent::Architecture {
            Complexity::Medium
        } else {
            Complexity::Low
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Complexity::Low => "LOW",
            Complexity::Medium => "MEDIUM",
            Complexity::High => "HIGH",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean features detected in a query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFacets {
    pub is_how_question: bool,
    pub is_what_question: bool,
    pub is_where_question: bool,
    pub wants_explanation: bool,
    pub mentions_architecture: bool,
    pub mentions_implementation: bool,
    pub mentions_config: bool,
    pub mentions_debugging: bool,
    pub matches_code_keywords: bool,
    pub matches_tool_keywords: bool,
}

impl QueryFacets {
    pub fn detect(query: &str, vocabulary: &Vocabulary) -> Self {
        let lowered = query.trim().to_lowercase();
        let leader: String = words(&lowered)
            .next()
            .unwrap_or_default()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        let leads_with = |terms: &[String]| terms.iter().any(|t| *t == leader);
        let terms = &vocabulary.facets;

        Self {
            is_how_question: leads_with(&terms.how_question),
            is_what_question: leads_with(&terms.what_question),
            is_where_question: leads_with(&terms.where_question),
            wants_explanation: contains_any(&lowered, &terms.explain),
            mentions_architecture: contains_any(&lowered, &terms.architecture),
            mentions_implementation: contains_any(&lowered, &terms.implementation),
            mentions_config: contains_any(&lowered, &terms.config),
            mentions_debugging: contains_any(&lowered, &terms.debugging),
            matches_code_keywords: contains_any(&lowered, &vocabulary.code_keywords),
            matches_tool_keywords: contains_any(&lowered, &vocabulary.tool_keywords),
        }
    }

    /// Exactly one intent, by strict priority:
    /// DEBUG > CONFIG > ARCHITECTURE > IMPLEMENTATION > CODE > TOOLS > GENERAL.
    #[must_use]
    pub const fn resolve_intent(&self) -> Intent {
        if self.mentions_debugging {
            Intent::Debug
        } else if self.mentions_config {
            Intent::Config
        } else if self.mentions_architecture {
            Intent::Architecture
        } else if self.mentions_implementation {
            Intent::Implementation
        } else if self.matches_code_keywords {
            Intent::Code
        } else if self.matches_tool_keywords {
            Intent::Tools
        } else {
            Intent::General
        }
    }
}

/// Planner-side view of a query before a strategy is chosen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryAnalysis {
    pub facets: QueryFacets,
    pub intent: Intent,
    pub confidence: f32,
    pub complexity: Complexity,
}

impl QueryAnalysis {
    pub fn analyze(query: &str, vocabulary: &Vocabulary) -> Self {
        let facets = QueryFacets::detect(query, vocabulary);
        let intent = facets.resolve_intent();
        Self {
            facets,
            intent,
            confidence: intent.confidence(),
            complexity: Complexity::assess(query, intent, vocabulary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(query: &str) -> QueryAnalysis {
        QueryAnalysis::analyze(query, &Vocabulary::builtin())
    }

    #[test]
    fn debugging_outranks_config() {
        let analysis = analyze("config bug after upgrade");
        assert!(analysis.facets.mentions_config);
        assert_eq!(analysis.intent, Intent::Debug);
        assert_eq!(analysis.confidence, 0.9);
    }

    #[test]
    fn priority_chain_falls_through_in_order() {
        assert_eq!(analyze("setup of the provider config").intent, Intent::Config);
        assert_eq!(analyze("overall design of modules").intent, Intent::Architecture);
        assert_eq!(analyze("implement retry method").intent, Intent::Implementation);
        assert_eq!(analyze("which spring bean wires this").intent, Intent::Code);
        assert_eq!(analyze("book a meeting on my calendar").intent, Intent::Tools);
        assert_eq!(analyze("hello there").intent, Intent::General);
    }

    #[test]
    fn confidence_is_constant_per_intent() {
        assert_eq!(analyze("setup").confidence, 0.85);
        assert_eq!(analyze("implement it").confidence, 0.8);
        assert_eq!(analyze("spring").confidence, 0.75);
        assert_eq!(analyze("weather tomorrow").confidence, 0.8);
        assert_eq!(analyze("").confidence, 0.6);
    }

    #[test]
    fn complexity_thresholds() {
        assert_eq!(analyze("short question here").complexity, Complexity::Low);
        assert_eq!(
            analyze("one two three four five six seven eight nine").complexity,
            Complexity::Medium
        );
        assert_eq!(analyze("explain the architecture").complexity, Complexity::Medium);
        assert_eq!(analyze("chat and memory").complexity, Complexity::High);
        assert_eq!(analyze("Also, the memory").complexity, Complexity::High);
        let long = vec!["word"; 21].join(" ");
        assert_eq!(analyze(&long).complexity, Complexity::High);
    }

    #[test]
    fn conjunction_must_be_a_whole_word() {
        assert_eq!(analyze("handle the brand landing").complexity, Complexity::Low);
    }

    #[test]
    fn question_leaders_are_detected() {
        let facets = analyze("How does it work?").facets;
        assert!(facets.is_how_question);
        assert!(!facets.is_what_question);
        assert!(analyze("What's new").facets.is_what_question);
        assert!(analyze("where is it").facets.is_where_question);
        assert!(analyze("please show me the flow").facets.wants_explanation);
        assert!(!analyze("somehow").facets.is_how_question);
    }

    #[test]
    fn empty_query_is_general_and_low() {
        let analysis = analyze("   ");
        assert_eq!(analysis.intent, Intent::General);
        assert_eq!(analysis.complexity, Complexity::Low);
        assert_eq!(analysis.facets, QueryFacets::default());
    }

    #[test]
    fn facets_match_only_their_listed_terms() {
        let facets = analyze("NullPointerException thrown").facets;
        assert!(!facets.mentions_debugging);
        assert!(!analyze("the build keeps failing").facets.mentions_debugging);
        assert!(!analyze("project overview please").facets.mentions_architecture);
        assert!(!analyze("which function parses dates").facets.mentions_implementation);
        assert!(!analyze("change the settings page").facets.mentions_config);

        assert_eq!(analyze("NullPointerException thrown").intent, Intent::General);
        assert_eq!(analyze("project overview please").intent, Intent::General);
    }
}
