use std::collections::BTreeSet;

use crate::models::{FlaggedChemical, NutrientProfile};
use crate::scoring::tiers::{has_severe_trans_fat, HIGH_SUGAR_G};

/// Keyword found in a chemical's cause text → warning it implies.
const CAUSE_RULES: &[(&str, &str)] = &[
    ("cancer", "Cancer Risk"),
    ("carcinogen", "Cancer Risk"),
    ("diabetes", "Diabetes Risk"),
    ("blood sugar", "Diabetes Risk"),
    ("heart", "Heart Disease"),
    ("cardiovascular", "Heart Disease"),
    ("obesity", "Obesity Risk"),
    ("weight gain", "Obesity Risk"),
    ("allergy", "Allergic Reaction"),
    ("allergic", "Allergic Reaction"),
    ("kidney", "Kidney Issues"),
    ("liver", "Liver Damage"),
];

const SATURATED_FAT_WARNING_G: f64 = 10.0;
const SODIUM_WARNING_MG: f64 = 600.0;

/// Nutrient check → warning, applied regardless of flagged chemicals.
const NUTRIENT_RULES: &[(fn(&NutrientProfile) -> bool, &str)] = &[
    (has_severe_trans_fat, "Heart Disease"),
    (high_saturated_fat, "Heart Disease"),
    (high_sugar, "Diabetes Risk"),
    (high_sodium, "High Blood Pressure"),
];

fn high_saturated_fat(p: &NutrientProfile) -> bool {
    p.saturated_fat > SATURATED_FAT_WARNING_G
}

fn high_sugar(p: &NutrientProfile) -> bool {
    p.sugars > HIGH_SUGAR_G
}

fn high_sodium(p: &NutrientProfile) -> bool {
    p.sodium_mg() > SODIUM_WARNING_MG
}

/// Disease warnings for a product, unique and alphabetically sorted.
pub fn aggregate(flagged: &[FlaggedChemical], profile: &NutrientProfile) -> Vec<String> {
    let mut warnings: BTreeSet<String> = BTreeSet::new();

    for chem in flagged {
        warnings.extend(
            chem.record
                .diseases_to_avoid
                .iter()
                .map(|d| d.trim())
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        );

        let cause = chem.record.cause.to_lowercase();
        for &(keyword, label) in CAUSE_RULES {
            if cause.contains(keyword) {
                warnings.insert(label.to_string());
            }
        }
    }

    for &(applies, label) in NUTRIENT_RULES {
        if applies(profile) {
            warnings.insert(label.to_string());
        }
    }

    warnings.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChemicalRecord, RiskTier};
    use std::sync::Arc;

    fn chemical(cause: &str, diseases: &[&str]) -> FlaggedChemical {
        FlaggedChemical::local(Arc::new(ChemicalRecord {
            name: "x".into(),
            cause: cause.into(),
            avoid: String::new(),
            affected: "general population".into(),
            risk: RiskTier::Medium,
            diseases_to_avoid: diseases.iter().map(|d| d.to_string()).collect(),
            hints: None,
        }))
    }

    #[test]
    fn test_cause_keywords() {
        let flagged = vec![
            chemical("Possible carcinogen; linked to liver toxicity", &[]),
            chemical("Spikes blood sugar", &[]),
        ];
        let warnings = aggregate(&flagged, &NutrientProfile::default());
        assert_eq!(warnings, vec!["Cancer Risk", "Diabetes Risk", "Liver Damage"]);
    }

    #[test]
    fn test_deduplicated_and_sorted() {
        let flagged = vec![
            chemical("May harm the heart", &["Heart Disease", "ADHD"]),
            chemical("cardiovascular strain", &["ADHD"]),
        ];
        let warnings = aggregate(&flagged, &NutrientProfile::default());
        assert_eq!(warnings, vec!["ADHD", "Heart Disease"]);

        let mut sorted = warnings.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(warnings, sorted);
    }

    #[test]
    fn test_trans_fat_warns_without_flags() {
        let profile = NutrientProfile { trans_fat: 0.5, ..Default::default() };
        assert_eq!(aggregate(&[], &profile), vec!["Heart Disease"]);
    }

    #[test]
    fn test_nutrient_thresholds() {
        let profile = NutrientProfile {
            sugars: 30.0,
            sodium: 0.9,
            ..Default::default()
        };
        assert_eq!(aggregate(&[], &profile), vec!["Diabetes Risk", "High Blood Pressure"]);
        assert!(aggregate(&[], &NutrientProfile::default()).is_empty());
    }
}
