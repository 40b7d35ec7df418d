//! Adverse-event signal for ingredients the knowledge base does not cover.
//!
//! Lookups go through a shared [`LookupCache`]; only definitive answers are
//! cached, so a timed-out or failed lookup is retried by the next analysis.
//! A failing lookup never fails the analysis, it just yields no signal.

pub mod cache;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::{AdverseEventsConfig, SourcesConfig};
use crate::source::openfda;

pub use cache::LookupCache;

/// Outcome of one ingredient lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdverseSignal {
    pub flagged: bool,
    pub message: String,
}

impl AdverseSignal {
    fn from_count(count: u64) -> Self {
        if count > 0 {
            AdverseSignal {
                flagged: true,
                message: format!("FDA adverse event reports found ({}).", count),
            }
        } else {
            AdverseSignal::default()
        }
    }
}

pub struct AdverseEventClient {
    http: Client,
    base_url: String,
    cache: Arc<LookupCache>,
    max_concurrency: usize,
}

impl AdverseEventClient {
    pub fn new(
        sources: &SourcesConfig,
        settings: &AdverseEventsConfig,
        cache: Arc<LookupCache>,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(sources.adverse_event_timeout())
            .user_agent(sources.user_agent.clone())
            .build()?;

        Ok(AdverseEventClient {
            http,
            base_url: sources.adverse_event_url.clone(),
            cache,
            max_concurrency: settings.max_concurrency(),
        })
    }

    /// Look up a single ingredient.
    pub async fn check(&self, ingredient: &str) -> AdverseSignal {
        let name = clean_name(ingredient);
        if name.is_empty() {
            return AdverseSignal::default();
        }
        self.lookup(&name).await
    }

    /// Look up every ingredient, at most `max_concurrency` at a time.
    ///
    /// The result is aligned with `ingredients`. Names that clean to the same
    /// term are queried once.
    pub async fn check_all(&self, ingredients: &[&str]) -> Vec<AdverseSignal> {
        let names: Vec<String> = ingredients.iter().map(|i| clean_name(i)).collect();

        let mut seen = HashSet::new();
        let unique: Vec<&str> = names
            .iter()
            .map(String::as_str)
            .filter(|n| !n.is_empty() && seen.insert(*n))
            .collect();

        let resolved: HashMap<&str, AdverseSignal> = stream::iter(unique)
            .map(|name| async move { (name, self.check(name).await) })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;
        debug!(looked_up = resolved.len(), "adverse-event lookups done");

        names
            .iter()
            .map(|n| resolved.get(n.as_str()).cloned().unwrap_or_default())
            .collect()
    }

    async fn lookup(&self, name: &str) -> AdverseSignal {
        if let Some(count) = self.cache.get(name).await {
            debug!(ingredient = name, count, "adverse-event cache hit");
            return AdverseSignal::from_count(count);
        }

        match openfda::fetch_report_count(&self.http, &self.base_url, name).await {
            Ok(count) => {
                self.cache.insert(name.to_string(), count).await;
                AdverseSignal::from_count(count)
            }
            Err(err) => {
                warn!(ingredient = name, error = %err, "adverse-event lookup failed; treating as no signal");
                AdverseSignal::default()
            }
        }
    }
}

/// Reduce an ingredient to lower-case letters and single spaces.
///
/// Bracketed segments and words containing digits (E-numbers, percentages)
/// are dropped first, so `"Citric Acid (E330)"` becomes `"citric acid"`.
pub fn clean_name(ingredient: &str) -> String {
    let mut depth = 0usize;
    let unbracketed: String = ingredient
        .chars()
        .filter(|&c| match c {
            '(' | '[' => {
                depth += 1;
                false
            }
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                false
            }
            _ => depth == 0,
        })
        .collect();

    unbracketed
        .to_lowercase()
        .split_whitespace()
        .filter(|word| !word.chars().any(|c| c.is_ascii_digit()))
        .map(|word| word.chars().filter(char::is_ascii_lowercase).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
