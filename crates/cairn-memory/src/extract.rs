//! Heuristic keyword, entity, and summary extraction
//!
//! Deterministic lexical extraction applied to every appended message.
//! Keywords come from a domain allow list; entities from a small set of
//! patterns (currency amounts, street addresses, proper names). No
//! model calls, no network.

use cairn_core::constants::{
    EXTRACT_ENTITY_MATCHES_COUNT_MAX, EXTRACT_KEYWORD_LENGTH_CHARS_MIN,
    EXTRACT_SUMMARY_LENGTH_CHARS_MAX,
};
use regex::Regex;
use std::collections::HashSet;

/// Domain vocabulary recognized as keywords
const DOMAIN_TERMS: &[&str] = &[
    "sell", "selling", "seller", "sold", "buyer", "buying", "house", "home", "property",
    "condo", "townhouse", "listing", "list", "price", "asking", "offer", "counteroffer",
    "mortgage", "closing", "escrow", "inspection", "appraisal", "agent", "commission", "rent",
    "rental", "lease", "tenant", "qualify", "qualified", "budget", "timeline", "preapproval",
    "preapproved", "showing", "viewing", "tour", "negotiate", "contract", "deed", "title",
    "equity", "refinance", "downpayment", "bedroom", "bathroom", "square", "acre",
    "neighborhood", "school", "relocate", "relocating", "move", "moving",
];

/// Result of extracting structured signals from one message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub keywords: Vec<String>,
    pub entities: Vec<String>,
    pub summary: String,
}

/// Lexical extractor with precompiled patterns
pub struct Extractor {
    terms: HashSet<String>,
    currency_re: Regex,
    address_re: Regex,
    proper_re: Regex,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self::with_terms(DOMAIN_TERMS.iter().map(|t| t.to_string()))
    }

    /// Extractor with a custom keyword vocabulary. Terms shorter than
    /// the minimum keyword length will never match.
    pub fn with_terms(terms: impl IntoIterator<Item = String>) -> Self {
        Self {
            terms: terms.into_iter().map(|t| t.to_lowercase()).collect(),
            currency_re: Regex::new(r"\$\d[\d,]*(?:\.\d+)?")
                .expect("Failed to compile currency pattern"),
            address_re: Regex::new(
                r"\d+\s+(?:[A-Z][A-Za-z]*\s)*[A-Z][A-Za-z]*\s(?:St|Street|Ave|Avenue|Rd|Road|Blvd|Boulevard|Dr|Drive|Ln|Lane|Ct|Court|Way|Pl|Place)\b",
            )
            .expect("Failed to compile address pattern"),
            proper_re: Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+\b")
                .expect("Failed to compile proper name pattern"),
        }
    }

    /// Extract keywords, entities, and a summary from message content
    pub fn extract(&self, content: &str) -> Extraction {
        Extraction {
            keywords: self.keywords(content),
            entities: self.entities(content),
            summary: summarize(content),
        }
    }

    /// Domain terms present in the content, deduplicated, in order of
    /// first appearance.
    pub fn keywords(&self, content: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut keywords = Vec::new();
        for token in tokenize(content) {
            if token.chars().count() < EXTRACT_KEYWORD_LENGTH_CHARS_MIN {
                continue;
            }
            if self.terms.contains(&token) && seen.insert(token.clone()) {
                keywords.push(token);
            }
        }
        keywords
    }

    /// Pattern-matched entities, each pattern capped so a single long
    /// message cannot flood the record.
    pub fn entities(&self, content: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut entities = Vec::new();
        for re in [&self.currency_re, &self.address_re, &self.proper_re] {
            for m in re.find_iter(content).take(EXTRACT_ENTITY_MATCHES_COUNT_MAX) {
                let text = m.as_str().trim().to_string();
                if seen.insert(text.to_lowercase()) {
                    entities.push(text);
                }
            }
        }
        entities
    }
}

/// First line of the content, truncated on a char boundary
pub fn summarize(content: &str) -> String {
    let line = content.lines().next().unwrap_or("").trim();
    if line.chars().count() <= EXTRACT_SUMMARY_LENGTH_CHARS_MAX {
        return line.to_string();
    }
    let mut summary: String = line
        .chars()
        .take(EXTRACT_SUMMARY_LENGTH_CHARS_MAX - 3)
        .collect();
    summary.push_str("...");
    summary
}

fn tokenize(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_from_domain_terms() {
        let extractor = Extractor::new();
        let keywords = extractor.keywords("I want to sell my house, asking price is firm");
        assert_eq!(keywords, vec!["sell", "house", "asking", "price"]);
    }

    #[test]
    fn test_keywords_deduplicated() {
        let extractor = Extractor::new();
        let keywords = extractor.keywords("sell sell SELL the house");
        assert_eq!(keywords, vec!["sell", "house"]);
    }

    #[test]
    fn test_keywords_ignore_non_domain_words() {
        let extractor = Extractor::new();
        assert!(extractor.keywords("hello there how are you today").is_empty());
    }

    #[test]
    fn test_custom_vocabulary() {
        let extractor = Extractor::with_terms(["turbine".to_string(), "rotor".to_string()]);
        let keywords = extractor.keywords("the turbine rotor needs inspection");
        assert_eq!(keywords, vec!["turbine", "rotor"]);
        // Domain defaults are replaced, not merged
        assert!(extractor.keywords("selling a house").is_empty());
    }

    #[test]
    fn test_entities_currency() {
        let extractor = Extractor::new();
        let entities = extractor.entities("asking $450,000 but would take $425,000.50");
        assert!(entities.contains(&"$450,000".to_string()));
        assert!(entities.contains(&"$425,000.50".to_string()));
    }

    #[test]
    fn test_entities_address() {
        let extractor = Extractor::new();
        let entities = extractor.entities("the listing at 123 Main St needs work");
        assert!(entities.contains(&"123 Main St".to_string()));
    }

    #[test]
    fn test_entities_proper_name() {
        let extractor = Extractor::new();
        let entities = extractor.entities("spoke with Dana Whitfield yesterday");
        assert!(entities.contains(&"Dana Whitfield".to_string()));
    }

    #[test]
    fn test_entities_capped_per_pattern() {
        let extractor = Extractor::new();
        let entities = extractor.entities("$1 $2 $3 $4 $5 and nothing else");
        assert_eq!(entities.len(), EXTRACT_ENTITY_MATCHES_COUNT_MAX);
    }

    #[test]
    fn test_summary_short_content_unchanged() {
        assert_eq!(summarize("quick question"), "quick question");
    }

    #[test]
    fn test_summary_truncates_long_content() {
        let long = "a".repeat(500);
        let summary = summarize(&long);
        assert_eq!(summary.chars().count(), EXTRACT_SUMMARY_LENGTH_CHARS_MAX);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_summary_multibyte_boundary() {
        let long = "é".repeat(300);
        let summary = summarize(&long);
        assert_eq!(summary.chars().count(), EXTRACT_SUMMARY_LENGTH_CHARS_MAX);
    }

    #[test]
    fn test_summary_takes_first_line() {
        assert_eq!(summarize("first line\nsecond line"), "first line");
    }

    #[test]
    fn test_extract_combined() {
        let extractor = Extractor::new();
        let extraction = extractor.extract("I want to sell 123 Main St for $450,000");
        assert!(extraction.keywords.contains(&"sell".to_string()));
        assert!(extraction.entities.contains(&"$450,000".to_string()));
        assert!(extraction.entities.contains(&"123 Main St".to_string()));
        assert_eq!(extraction.summary, "I want to sell 123 Main St for $450,000");
    }
}
