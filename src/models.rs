use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Normalized per-100g nutrient values.
///
/// Every field is finite and non-negative. Mass nutrients (including `sodium`
/// and `salt`) are grams; `calories` is kcal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientProfile {
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub sugars: f64,
    pub fiber: f64,
    pub fat: f64,
    pub saturated_fat: f64,
    pub trans_fat: f64,
    pub sodium: f64,
    pub salt: f64,
    pub cholesterol: f64,
}

impl NutrientProfile {
    /// Sodium in milligrams per 100g.
    pub fn sodium_mg(&self) -> f64 {
        self.sodium * 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "low"),
            RiskTier::Medium => write!(f, "medium"),
            RiskTier::High => write!(f, "high"),
        }
    }
}

/// Macro-nutrient content attributed to an additive, used to weight its penalty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium_mg: Option<f64>,
}

/// A knowledge-base entry describing an additive of concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChemicalRecord {
    pub name: String,
    pub cause: String,
    pub avoid: String,
    pub affected: String,
    pub risk: RiskTier,
    pub diseases_to_avoid: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<MacroHints>,
}

impl ChemicalRecord {
    /// Synthesized record for an ingredient that only the adverse-event source flagged.
    pub fn adverse_event(ingredient: &str, message: &str) -> Self {
        ChemicalRecord {
            name: ingredient.to_string(),
            cause: message.to_string(),
            avoid: "Caution advised. Publicly reported adverse events exist.".to_string(),
            affected: "general population".to_string(),
            risk: RiskTier::Low,
            diseases_to_avoid: Vec::new(),
            hints: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionSource {
    Local,
    External,
}

impl std::fmt::Display for DetectionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectionSource::Local => write!(f, "knowledge base"),
            DetectionSource::External => write!(f, "adverse events"),
        }
    }
}

/// An ingredient of concern detected in one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedChemical {
    #[serde(flatten)]
    pub record: Arc<ChemicalRecord>,
    pub source: DetectionSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FlaggedChemical {
    pub fn local(record: Arc<ChemicalRecord>) -> Self {
        FlaggedChemical {
            record,
            source: DetectionSource::Local,
            message: None,
        }
    }

    pub fn external(ingredient: &str, message: String) -> Self {
        FlaggedChemical {
            record: Arc::new(ChemicalRecord::adverse_event(ingredient, &message)),
            source: DetectionSource::External,
            message: Some(message),
        }
    }
}

/// Overall verdict attached to a score. Overrides come before the numeric bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Excellent,
    Good,
    Average,
    Unhealthy,
    VeryUnhealthy,
    HighSugar,
    ContainsTransFat,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Excellent => write!(f, "Excellent"),
            HealthStatus::Good => write!(f, "Good"),
            HealthStatus::Average => write!(f, "Average"),
            HealthStatus::Unhealthy => write!(f, "Unhealthy"),
            HealthStatus::VeryUnhealthy => write!(f, "Very Unhealthy"),
            HealthStatus::HighSugar => write!(f, "High Sugar"),
            HealthStatus::ContainsTransFat => write!(f, "Contains Trans Fat"),
        }
    }
}

/// How a score was assembled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub baseline: f64,
    pub bonuses: f64,
    pub nutrient_penalties: f64,
    pub chemical_penalty: f64,
    pub ceilings: Vec<Ceiling>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ceiling {
    HighSugarLowNutrients,
    TransFat,
    ManyChemicals,
}

impl std::fmt::Display for Ceiling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ceiling::HighSugarLowNutrients => write!(f, "high sugar with little protein or fiber"),
            Ceiling::TransFat => write!(f, "trans fat"),
            Ceiling::ManyChemicals => write!(f, "five or more flagged chemicals"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub score: u8,
    pub status: HealthStatus,
    pub breakdown: ScoreBreakdown,
}

/// Product record as returned by the product data source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub brands: Option<String>,
    #[serde(default)]
    pub nutriscore_grade: Option<String>,
    #[serde(default)]
    pub ingredients_text: Option<String>,
    #[serde(default)]
    pub nutriments: serde_json::Map<String, serde_json::Value>,
}

/// Result of one successful analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub status: &'static str,
    pub barcode: String,
    pub product_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brands: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutriscore_grade: Option<String>,
    pub health_score: u8,
    pub health_status: HealthStatus,
    pub ingredients_text: String,
    pub flagged_chemicals: Vec<FlaggedChemical>,
    pub disease_warnings: Vec<String>,
    pub nutrients: NutrientProfile,
    pub breakdown: ScoreBreakdown,
    pub nutrient_diagnostics: usize,
}
