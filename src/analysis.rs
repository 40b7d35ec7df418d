use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::adverse::{clean_name, AdverseEventClient};
use crate::error::AnalysisError;
use crate::knowledge::base::KnowledgeBase;
use crate::knowledge::matcher::ChemicalMatcher;
use crate::models::{AnalysisReport, FlaggedChemical, Product};
use crate::nutrients;
use crate::scoring;
use crate::source::open_food_facts::ProductClient;
use crate::warnings;

/// Runs the full analysis for one barcode. Holds no per-request state.
pub struct Analyzer {
    matcher: ChemicalMatcher,
    products: ProductClient,
    adverse: Option<AdverseEventClient>,
}

impl Analyzer {
    /// `adverse` is `None` when adverse-event lookups are disabled.
    pub fn new(
        kb: Arc<KnowledgeBase>,
        products: ProductClient,
        adverse: Option<AdverseEventClient>,
    ) -> Self {
        if kb.is_empty() {
            warn!("knowledge base is empty; only adverse-event reports can flag ingredients");
        }
        Analyzer {
            matcher: ChemicalMatcher::new(kb),
            products,
            adverse,
        }
    }

    pub async fn analyze(&self, barcode: &str) -> Result<AnalysisReport, AnalysisError> {
        let barcode = normalize_barcode(barcode)?;
        let product = self.products.fetch_product(&barcode).await?;
        info!(%barcode, name = product.product_name.as_deref().unwrap_or("N/A"), "product found");
        Ok(self.assess(barcode, product).await)
    }

    /// Score an already fetched product.
    pub async fn assess(&self, barcode: String, product: Product) -> AnalysisReport {
        let normalized = nutrients::normalize(&product.nutriments);
        let ingredients_text = product.ingredients_text.unwrap_or_default();

        let scan = self.matcher.scan(&ingredients_text);
        let external = match &self.adverse {
            Some(client) => {
                let unflagged = self.matcher.unflagged_tokens(&scan);
                let signals = client.check_all(&unflagged).await;

                let mut seen = HashSet::new();
                unflagged
                    .iter()
                    .zip(signals)
                    .filter(|(token, signal)| signal.flagged && seen.insert(clean_name(token)))
                    .map(|(token, signal)| FlaggedChemical::external(token, signal.message))
                    .collect()
            }
            None => Vec::new(),
        };
        debug!(local = scan.flagged.len(), external = external.len(), "chemicals flagged");

        let mut flagged = scan.flagged;
        flagged.extend(external);

        let result = scoring::score(&normalized.profile, &flagged);
        let disease_warnings = warnings::aggregate(&flagged, &normalized.profile);
        info!(score = result.score, status = %result.status, "analysis complete");

        AnalysisReport {
            status: "success",
            barcode,
            product_name: product
                .product_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "N/A".to_string()),
            brands: product.brands,
            nutriscore_grade: product.nutriscore_grade,
            health_score: result.score,
            health_status: result.status,
            ingredients_text: if ingredients_text.trim().is_empty() {
                "No ingredients listed.".to_string()
            } else {
                ingredients_text
            },
            flagged_chemicals: flagged,
            disease_warnings,
            nutrients: normalized.profile,
            breakdown: result.breakdown,
            nutrient_diagnostics: normalized.diagnostics.len(),
        }
    }
}

/// Strip spaces and hyphens and require 8 to 14 ASCII digits.
pub fn normalize_barcode(raw: &str) -> Result<String, AnalysisError> {
    let digits: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    if (8..=14).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(digits)
    } else {
        Err(AnalysisError::InvalidBarcode(raw.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adverse::LookupCache;
    use crate::config::{AdverseEventsConfig, SourcesConfig};
    use crate::models::{DetectionSource, HealthStatus};
    use serde_json::json;
    use wiremock::matchers::{method, path, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const KB: &str = r#"{
        "high fructose corn syrup": {
            "cause": "Raises blood sugar and promotes obesity",
            "avoid": "Choose unsweetened products",
            "risk": "medium",
            "diseases_to_avoid": ["Type 2 Diabetes"]
        },
        "partially hydrogenated": {
            "cause": "Source of trans fat, raises heart disease risk",
            "avoid": "Banned in several countries",
            "risk": "high"
        }
    }"#;

    async fn analyzer(server: &MockServer, adverse: bool) -> Analyzer {
        let sources = SourcesConfig {
            product_url: server.uri(),
            adverse_event_url: server.uri(),
            product_timeout_secs: 2,
            adverse_event_timeout_secs: 1,
            ..SourcesConfig::default()
        };
        let adverse = adverse.then(|| {
            AdverseEventClient::new(
                &sources,
                &AdverseEventsConfig::default(),
                Arc::new(LookupCache::new(16)),
            )
            .unwrap()
        });
        Analyzer::new(
            Arc::new(KnowledgeBase::from_json_str(KB)),
            ProductClient::new(&sources).unwrap(),
            adverse,
        )
    }

    async fn mount_product(server: &MockServer, barcode: &str, product: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v0/product/{}.json", barcode)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": 1,
                "product": product
            })))
            .mount(server)
            .await;
    }

    #[test]
    fn test_normalize_barcode() {
        assert_eq!(normalize_barcode(" 3017-6204 22003 ").unwrap(), "3017620422003");
        assert_eq!(normalize_barcode("12345678").unwrap(), "12345678");
        assert!(matches!(normalize_barcode("1234567"), Err(AnalysisError::InvalidBarcode(_))));
        assert!(normalize_barcode("123456789012345").is_err());
        assert!(normalize_barcode("12345abc").is_err());
        assert!(normalize_barcode("").is_err());
    }

    #[tokio::test]
    async fn test_invalid_barcode_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = analyzer(&server, true).await.analyze("abc").await.unwrap_err();
        assert_eq!(err.kind(), "invalid_barcode");
    }

    #[tokio::test]
    async fn test_full_pipeline() {
        let server = MockServer::start().await;
        mount_product(
            &server,
            "0123456789012",
            json!({
                "product_name": "Choco Crunch",
                "ingredients_text": "Sugar, High Fructose Corn Syrup, Partially Hydrogenated Soybean Oil, Guar Gum, Salt",
                "nutriments": {
                    "sugars_100g": 38,
                    "proteins_100g": "2",
                    "fiber_100g": 1,
                    "saturated-fat_100g": 4,
                    "trans-fat_100g": 0.8,
                    "salt_100g": 1.0,
                    "energy-kcal_100g": 480
                }
            }),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/food/event.json"))
            .and(query_param("search", "products.ingredient.exact:\"guar gum\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "meta": { "results": { "total": 5 } }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex("^/food/event.json$"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let report = analyzer(&server, true)
            .await
            .analyze("0123456789012")
            .await
            .unwrap();

        let names: Vec<(&str, DetectionSource)> = report
            .flagged_chemicals
            .iter()
            .map(|f| (f.record.name.as_str(), f.source))
            .collect();
        assert_eq!(
            names,
            vec![
                ("high fructose corn syrup", DetectionSource::Local),
                ("partially hydrogenated", DetectionSource::Local),
                ("guar gum", DetectionSource::External),
            ]
        );
        assert_eq!(report.health_status, HealthStatus::ContainsTransFat);
        assert!(report.health_score <= 20);
        assert!(report.disease_warnings.contains(&"Heart Disease".to_string()));
        assert!(report.disease_warnings.contains(&"Type 2 Diabetes".to_string()));
        assert!((report.nutrients.sodium - 0.4).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_shared_ingredient_is_looked_up_once_across_products() {
        let server = MockServer::start().await;
        mount_product(
            &server,
            "11111111",
            json!({ "product_name": "Jam", "ingredients_text": "Strawberries, Pectin" }),
        )
        .await;
        mount_product(
            &server,
            "22222222",
            json!({ "product_name": "Jelly", "ingredients_text": "Grape Juice, pectin (E440)" }),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/food/event.json"))
            .and(query_param("search", "products.ingredient.exact:\"pectin\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "meta": { "results": { "total": 2 } }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex("^/food/event.json$"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let analyzer = analyzer(&server, true).await;
        for barcode in ["11111111", "22222222"] {
            let report = analyzer.analyze(barcode).await.unwrap();
            assert_eq!(report.flagged_chemicals.len(), 1);
            assert_eq!(report.flagged_chemicals[0].source, DetectionSource::External);
        }
    }

    #[tokio::test]
    async fn test_offline_skips_adverse_events() {
        let server = MockServer::start().await;
        mount_product(
            &server,
            "12345678",
            json!({ "ingredients_text": "oats, honey", "nutriments": { "fiber_100g": 9, "proteins_100g": 11 } }),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/food/event.json"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let report = analyzer(&server, false).await.analyze("12345678").await.unwrap();
        assert!(report.flagged_chemicals.is_empty());
        assert_eq!(report.product_name, "N/A");
        assert!(report.nutrient_diagnostics > 0);
        assert!(report.health_score >= 60);
    }

    #[tokio::test]
    async fn test_missing_ingredients() {
        let server = MockServer::start().await;
        mount_product(&server, "12345678", json!({ "product_name": "Water" })).await;

        let report = analyzer(&server, true).await.analyze("12345678").await.unwrap();
        assert_eq!(report.ingredients_text, "No ingredients listed.");
        assert_eq!(report.health_score, 50);
        assert_eq!(report.health_status, HealthStatus::Average);
    }

    #[tokio::test]
    async fn test_report_serializes() {
        let server = MockServer::start().await;
        mount_product(
            &server,
            "12345678",
            json!({ "product_name": "Syrup", "ingredients_text": "high fructose corn syrup" }),
        )
        .await;

        let report = analyzer(&server, false).await.analyze("12345678").await.unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["flagged_chemicals"][0]["risk"], "medium");
        assert_eq!(value["flagged_chemicals"][0]["source"], "local");
        assert_eq!(value["disease_warnings"][0], "Diabetes Risk");
    }
}
