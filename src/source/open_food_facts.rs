use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::config::SourcesConfig;
use crate::error::{AnalysisError, Upstream};
use crate::models::Product;

#[derive(Debug, Deserialize)]
struct ProductEnvelope {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    product: Option<Product>,
}

/// Client for the Open Food Facts product API.
#[derive(Clone)]
pub struct ProductClient {
    http: Client,
    base_url: String,
}

impl ProductClient {
    pub fn new(sources: &SourcesConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(sources.product_timeout())
            .user_agent(sources.user_agent.clone())
            .build()?;

        Ok(ProductClient {
            http,
            base_url: sources.product_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the product record for an already validated barcode.
    pub async fn fetch_product(&self, barcode: &str) -> Result<Product, AnalysisError> {
        let url = format!("{}/api/v0/product/{}.json", self.base_url, barcode);
        debug!(%url, "fetching product");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AnalysisError::from_transport(Upstream::ProductData, &e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AnalysisError::ProductNotFound(barcode.to_string()));
        }
        if !response.status().is_success() {
            return Err(AnalysisError::UpstreamUnavailable {
                upstream: Upstream::ProductData,
                reason: format!("HTTP {}", response.status()),
            });
        }

        let envelope: ProductEnvelope = response.json().await.map_err(|e| {
            if e.is_timeout() {
                AnalysisError::UpstreamTimeout(Upstream::ProductData)
            } else {
                AnalysisError::UpstreamUnavailable {
                    upstream: Upstream::ProductData,
                    reason: format!("malformed response: {}", e),
                }
            }
        })?;

        match envelope.product {
            Some(product) if envelope.status == 1 => Ok(product),
            _ => Err(AnalysisError::ProductNotFound(barcode.to_string())),
        }
    }
}
