use anyhow::{anyhow, Result};
use reqwest::{Client, StatusCode};

/// Fetch the number of food adverse-event reports naming `term` as an ingredient.
///
/// openFDA answers a search without hits with HTTP 404, which counts as zero reports.
pub async fn fetch_report_count(client: &Client, base_url: &str, term: &str) -> Result<u64> {
    let url = format!("{}/food/event.json", base_url.trim_end_matches('/'));
    let search = format!("products.ingredient.exact:\"{}\"", term);

    let response = client
        .get(&url)
        .query(&[("search", search.as_str()), ("limit", "1")])
        .send()
        .await?;

    if response.status() == StatusCode::NOT_FOUND {
        return Ok(0);
    }
    if !response.status().is_success() {
        return Err(anyhow!("HTTP {}", response.status()));
    }

    let data: serde_json::Value = response.json().await?;
    data.get("meta")
        .and_then(|m| m.get("results"))
        .and_then(|r| r.get("total"))
        .and_then(|t| t.as_u64())
        .ok_or_else(|| anyhow!("response has no meta.results.total"))
}
