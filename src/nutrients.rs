//! Coerce the loosely-typed `nutriments` object of a product record into a
//! [`NutrientProfile`].
//!
//! Values may be JSON numbers, numeric strings, `null`, or absent altogether.
//! Anything that cannot be read as a finite non-negative number becomes `0.0`
//! and produces a [`NutrientDiagnostic`]; normalization itself never fails.

use serde_json::{Map, Value};
use tracing::debug;

use crate::models::NutrientProfile;

/// Grams of sodium per gram of salt.
pub const SODIUM_PER_SALT: f64 = 0.4;

const KJ_PER_KCAL: f64 = 4.184;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nutrient {
    Calories,
    Protein,
    Carbohydrates,
    Sugars,
    Fiber,
    Fat,
    SaturatedFat,
    TransFat,
    Sodium,
    Salt,
    Cholesterol,
}

impl Nutrient {
    fn slot(self, profile: &mut NutrientProfile) -> &mut f64 {
        match self {
            Nutrient::Calories => &mut profile.calories,
            Nutrient::Protein => &mut profile.protein,
            Nutrient::Carbohydrates => &mut profile.carbohydrates,
            Nutrient::Sugars => &mut profile.sugars,
            Nutrient::Fiber => &mut profile.fiber,
            Nutrient::Fat => &mut profile.fat,
            Nutrient::SaturatedFat => &mut profile.saturated_fat,
            Nutrient::TransFat => &mut profile.trans_fat,
            Nutrient::Sodium => &mut profile.sodium,
            Nutrient::Salt => &mut profile.salt,
            Nutrient::Cholesterol => &mut profile.cholesterol,
        }
    }
}

/// Source keys (Open Food Facts naming) for each profile field.
const FIELDS: &[(&str, Nutrient)] = &[
    ("energy-kcal_100g", Nutrient::Calories),
    ("proteins_100g", Nutrient::Protein),
    ("carbohydrates_100g", Nutrient::Carbohydrates),
    ("sugars_100g", Nutrient::Sugars),
    ("fiber_100g", Nutrient::Fiber),
    ("fat_100g", Nutrient::Fat),
    ("saturated-fat_100g", Nutrient::SaturatedFat),
    ("trans-fat_100g", Nutrient::TransFat),
    ("sodium_100g", Nutrient::Sodium),
    ("salt_100g", Nutrient::Salt),
    ("cholesterol_100g", Nutrient::Cholesterol),
];

/// Why a field was replaced by `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    Missing,
    NotNumeric(String),
    OutOfRange(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NutrientDiagnostic {
    pub field: &'static str,
    pub kind: DiagnosticKind,
}

impl std::fmt::Display for NutrientDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            DiagnosticKind::Missing => write!(f, "{}: missing", self.field),
            DiagnosticKind::NotNumeric(raw) => write!(f, "{}: not numeric ({})", self.field, raw),
            DiagnosticKind::OutOfRange(v) => write!(f, "{}: out of range ({})", self.field, v),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub profile: NutrientProfile,
    pub diagnostics: Vec<NutrientDiagnostic>,
}

/// Build a fully populated profile from a raw per-100g nutrient mapping.
pub fn normalize(raw: &Map<String, Value>) -> Normalized {
    let mut profile = NutrientProfile::default();
    let mut failures: Vec<NutrientDiagnostic> = Vec::new();

    for &(key, nutrient) in FIELDS {
        match read_value(raw.get(key)) {
            Ok(v) => *nutrient.slot(&mut profile) = v,
            Err(kind) => failures.push(NutrientDiagnostic { field: key, kind }),
        }
    }

    // Derive whichever of salt/sodium/energy is missing from a counterpart that
    // parsed. A derived field is no longer reported.
    let missing = |field: &str, failures: &[NutrientDiagnostic]| {
        failures
            .iter()
            .any(|d| d.field == field && d.kind == DiagnosticKind::Missing)
    };
    let parsed = |field: &str, failures: &[NutrientDiagnostic]| {
        !failures.iter().any(|d| d.field == field)
    };

    if missing("sodium_100g", &failures) && parsed("salt_100g", &failures) {
        profile.sodium = profile.salt * SODIUM_PER_SALT;
        failures.retain(|d| d.field != "sodium_100g");
    } else if missing("salt_100g", &failures) && parsed("sodium_100g", &failures) {
        profile.salt = profile.sodium / SODIUM_PER_SALT;
        failures.retain(|d| d.field != "salt_100g");
    }

    if missing("energy-kcal_100g", &failures) {
        if let Ok(kj) = read_value(raw.get("energy_100g")) {
            profile.calories = kj / KJ_PER_KCAL;
            failures.retain(|d| d.field != "energy-kcal_100g");
        }
    }

    for diagnostic in &failures {
        debug!(%diagnostic, "nutrient defaulted to 0");
    }

    Normalized {
        profile,
        diagnostics: failures,
    }
}

fn read_value(value: Option<&Value>) -> Result<f64, DiagnosticKind> {
    let number = match value {
        None | Some(Value::Null) => return Err(DiagnosticKind::Missing),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| DiagnosticKind::NotNumeric(n.to_string()))?,
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(DiagnosticKind::Missing);
            }
            trimmed
                .replace(',', ".")
                .parse::<f64>()
                .map_err(|_| DiagnosticKind::NotNumeric(s.clone()))?
        }
        Some(other) => return Err(DiagnosticKind::NotNumeric(other.to_string())),
    };

    if !number.is_finite() || number < 0.0 {
        return Err(DiagnosticKind::OutOfRange(number));
    }
    Ok(number)
}
