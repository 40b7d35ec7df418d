use std::sync::Arc;

use regex::Regex;
use tracing::warn;

use crate::knowledge::base::KnowledgeBase;
use crate::models::FlaggedChemical;

/// Outcome of scanning one ingredient list.
#[derive(Debug, Default)]
pub struct Scan {
    /// Locally detected chemicals, in knowledge-base order.
    pub flagged: Vec<FlaggedChemical>,
    /// Comma-separated ingredient tokens, trimmed and lower-cased.
    pub tokens: Vec<String>,
    matched: Vec<usize>,
}

/// Detects knowledge-base names in ingredient text as whole words or phrases.
pub struct ChemicalMatcher {
    kb: Arc<KnowledgeBase>,
    /// One pattern per knowledge-base entry, `None` if it failed to compile.
    patterns: Vec<Option<Regex>>,
}

impl ChemicalMatcher {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        let patterns = kb
            .entries()
            .iter()
            .map(|(key, _)| match Regex::new(&boundary_pattern(key)) {
                Ok(re) => Some(re),
                Err(err) => {
                    warn!(entry = %key, error = %err, "cannot build pattern; entry will never match");
                    None
                }
            })
            .collect();

        ChemicalMatcher { kb, patterns }
    }

    pub fn scan(&self, ingredients_text: &str) -> Scan {
        let text = ingredients_text.to_lowercase();

        let mut flagged = Vec::new();
        let mut matched = Vec::new();
        for (idx, ((_, record), pattern)) in self.kb.entries().iter().zip(&self.patterns).enumerate() {
            if pattern.as_ref().is_some_and(|re| re.is_match(&text)) {
                flagged.push(FlaggedChemical::local(Arc::clone(record)));
                matched.push(idx);
            }
        }

        Scan {
            flagged,
            tokens: tokenize(&text),
            matched,
        }
    }

    /// Tokens that none of the locally matched chemicals account for.
    pub fn unflagged_tokens<'a>(&self, scan: &'a Scan) -> Vec<&'a str> {
        scan.tokens
            .iter()
            .map(String::as_str)
            .filter(|token| {
                !scan.matched.iter().any(|&idx| {
                    self.patterns[idx]
                        .as_ref()
                        .is_some_and(|re| re.is_match(token))
                })
            })
            .collect()
    }
}

/// `name` preceded by start-of-text or a non-word character and followed by a
/// non-word character or end-of-text.
fn boundary_pattern(name: &str) -> String {
    format!(r"(?:^|\W){}(?:\W|$)", regex::escape(name))
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(json: &str) -> ChemicalMatcher {
        ChemicalMatcher::new(Arc::new(KnowledgeBase::from_json_str(json)))
    }

    fn names(scan: &Scan) -> Vec<&str> {
        scan.flagged.iter().map(|f| f.record.name.as_str()).collect()
    }

    #[test]
    fn test_fragments_do_not_match() {
        let m = matcher(
            r#"{
                "gar": { "cause": "x" },
                "alt": { "cause": "x" },
                "sea salt": { "cause": "x" }
            }"#,
        );
        let scan = m.scan("Cane sugar, Sea Salt");
        assert_eq!(names(&scan), vec!["sea salt"]);
    }

    #[test]
    fn test_matches_in_table_order() {
        let m = matcher(
            r#"{
                "sodium benzoate": { "cause": "x" },
                "red 40": { "cause": "x" },
                "bha": { "cause": "x" }
            }"#,
        );
        let scan = m.scan("water, bha (preservative), fd&c red 40, sodium benzoate");
        assert_eq!(names(&scan), vec!["sodium benzoate", "red 40", "bha"]);
    }

    #[test]
    fn test_phrase_with_punctuation() {
        let m = matcher(r#"{ "e-621": { "cause": "x" } }"#);
        assert_eq!(names(&m.scan("flavour enhancer (e-621)")), vec!["e-621"]);
        assert!(m.scan("flavour enhancer (e-6210)").flagged.is_empty());
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize(" Sugar , , cocoa butter,milk ,"),
            vec!["sugar", "cocoa butter", "milk"]
        );
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_unflagged_tokens_exclude_local_matches() {
        let m = matcher(r#"{ "aspartame": { "cause": "x" } }"#);
        let scan = m.scan("water, sweetener (aspartame), citric acid");
        assert_eq!(m.unflagged_tokens(&scan), vec!["water", "citric acid"]);
    }

    #[test]
    fn test_empty_knowledge_base() {
        let m = ChemicalMatcher::new(Arc::new(KnowledgeBase::default()));
        let scan = m.scan("sugar, salt");
        assert!(scan.flagged.is_empty());
        assert_eq!(m.unflagged_tokens(&scan).len(), 2);
    }
}
