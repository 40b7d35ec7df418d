use crate::models::{HealthStatus, NutrientProfile};
use crate::scoring::tiers::{has_severe_trans_fat, is_high_sugar_low_nutrients};

/// Descending score bands; anything below the last is `VeryUnhealthy`.
const BANDS: &[(u8, HealthStatus)] = &[
    (80, HealthStatus::Excellent),
    (60, HealthStatus::Good),
    (40, HealthStatus::Average),
    (20, HealthStatus::Unhealthy),
];

/// Label for a final score. Trans fat, then high sugar, override the bands.
pub fn classify(score: u8, profile: &NutrientProfile) -> HealthStatus {
    if has_severe_trans_fat(profile) {
        return HealthStatus::ContainsTransFat;
    }
    if is_high_sugar_low_nutrients(profile) {
        return HealthStatus::HighSugar;
    }

    BANDS
        .iter()
        .find(|&&(floor, _)| score >= floor)
        .map(|&(_, status)| status)
        .unwrap_or(HealthStatus::VeryUnhealthy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands() {
        let p = NutrientProfile::default();
        assert_eq!(classify(100, &p), HealthStatus::Excellent);
        assert_eq!(classify(80, &p), HealthStatus::Excellent);
        assert_eq!(classify(79, &p), HealthStatus::Good);
        assert_eq!(classify(40, &p), HealthStatus::Average);
        assert_eq!(classify(20, &p), HealthStatus::Unhealthy);
        assert_eq!(classify(19, &p), HealthStatus::VeryUnhealthy);
        assert_eq!(classify(0, &p), HealthStatus::VeryUnhealthy);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let sugary = NutrientProfile { sugars: 40.0, ..Default::default() };
        assert_eq!(classify(90, &sugary), HealthStatus::HighSugar);

        let both = NutrientProfile { sugars: 40.0, trans_fat: 1.0, ..Default::default() };
        assert_eq!(classify(90, &both), HealthStatus::ContainsTransFat);
    }

    #[test]
    fn test_high_sugar_with_protein_uses_bands() {
        let p = NutrientProfile { sugars: 30.0, protein: 12.0, ..Default::default() };
        assert_eq!(classify(45, &p), HealthStatus::Average);
    }
}
