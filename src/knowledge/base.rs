use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::models::{ChemicalRecord, MacroHints, RiskTier};

const BUNDLED: &str = include_str!("../../data/harmful_chemicals.json");

/// Entry as written in the knowledge-base file. Everything but `cause` is optional.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    name: Option<String>,
    cause: String,
    #[serde(default)]
    avoid: String,
    #[serde(default)]
    affected: Option<String>,
    #[serde(default)]
    risk: Option<RiskTier>,
    #[serde(default)]
    diseases_to_avoid: Vec<String>,
    #[serde(default, alias = "thresholds")]
    hints: Option<MacroHints>,
}

/// Immutable table of additives keyed by lower-cased name, in file order.
#[derive(Debug, Default)]
pub struct KnowledgeBase {
    entries: Vec<(String, Arc<ChemicalRecord>)>,
}

impl KnowledgeBase {
    /// Load the table from `path`. A missing or corrupt file yields an empty table.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "knowledge base unreadable; analysis will be limited");
                return Self::default();
            }
        };

        let kb = Self::from_json_str(&content);
        info!(path = %path.display(), entries = kb.len(), "knowledge base loaded");
        kb
    }

    /// Load `path` when one is configured, otherwise the bundled table.
    pub fn from_configured(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load(path),
            None => Self::bundled(),
        }
    }

    /// The table shipped inside the binary.
    pub fn bundled() -> Self {
        let kb = Self::from_json_str(BUNDLED);
        debug!(entries = kb.len(), "bundled knowledge base loaded");
        kb
    }

    /// Parse a JSON object of `{ name: record }`.
    pub fn from_json_str(content: &str) -> Self {
        let table: Map<String, Value> = match serde_json::from_str(content) {
            Ok(table) => table,
            Err(err) => {
                warn!(error = %err, "knowledge base is not a JSON object; using an empty table");
                return Self::default();
            }
        };

        let mut entries = Vec::with_capacity(table.len());
        for (key, value) in table {
            let key = key.trim().to_lowercase();
            if key.is_empty() {
                warn!("skipping knowledge base entry with an empty name");
                continue;
            }
            match serde_json::from_value::<RawRecord>(value) {
                Ok(raw) => entries.push((key.clone(), Arc::new(into_record(&key, raw)))),
                Err(err) => warn!(entry = %key, error = %err, "skipping malformed knowledge base entry"),
            }
        }

        KnowledgeBase { entries }
    }

    pub fn entries(&self) -> &[(String, Arc<ChemicalRecord>)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn into_record(key: &str, raw: RawRecord) -> ChemicalRecord {
    let risk = raw
        .risk
        .unwrap_or_else(|| infer_risk(&raw.cause, &raw.avoid));
    ChemicalRecord {
        name: raw
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| key.to_string()),
        cause: raw.cause,
        avoid: raw.avoid,
        affected: raw
            .affected
            .unwrap_or_else(|| "general population".to_string()),
        risk,
        diseases_to_avoid: raw.diseases_to_avoid,
        hints: raw.hints,
    }
}

/// Severity keywords for entries that carry no explicit `risk`.
fn infer_risk(cause: &str, avoid: &str) -> RiskTier {
    let cause = cause.to_lowercase();
    let avoid = avoid.to_lowercase();

    if cause.contains("carcinogen") || avoid.contains("banned") || avoid.contains("toxic") {
        RiskTier::High
    } else if cause.contains("hyperactivity") || avoid.contains("asthma") || avoid.contains("allergy")
    {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}
