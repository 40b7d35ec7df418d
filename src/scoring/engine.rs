use crate::models::{Ceiling, FlaggedChemical, NutrientProfile, ScoreBreakdown, ScoreResult};
use crate::scoring::status::classify;
use crate::scoring::tiers::{
    has_severe_trans_fat, is_balanced, is_high_sugar_low_nutrients, risk_penalty, BALANCED_BONUS,
    BASELINE, BONUS_TABLES, CHEMICAL_PENALTY_CAP, HIGH_SUGAR_CEILING, HINT_FAT_LIMIT_G,
    HINT_PENALTY, HINT_SODIUM_LIMIT_MG, HINT_SUGAR_LIMIT_G, MANY_CHEMICALS,
    MANY_CHEMICALS_CEILING, PENALTY_TABLES, TRANS_FAT_CEILING,
};

/// Score a product from its nutrients and the chemicals flagged in it.
///
/// Pure and total: the same inputs always give the same score and status.
pub fn score(profile: &NutrientProfile, flagged: &[FlaggedChemical]) -> ScoreResult {
    let nutrient_penalties: f64 = PENALTY_TABLES.iter().map(|t| t.points(profile)).sum();

    let mut bonuses: f64 = BONUS_TABLES.iter().map(|t| t.points(profile)).sum();
    if is_balanced(profile) {
        bonuses += BALANCED_BONUS;
    }

    let chemical_penalty = chemical_penalty(flagged);

    let mut raw = BASELINE + bonuses - nutrient_penalties - chemical_penalty;

    let ceilings = ceilings(profile, flagged);
    for &(_, limit) in &ceilings {
        raw = raw.min(limit);
    }

    // NaN cannot come out of a normalized profile; it would truncate to 0 anyway.
    let score = raw.clamp(0.0, 100.0) as u8;

    ScoreResult {
        score,
        status: classify(score, profile),
        breakdown: ScoreBreakdown {
            baseline: BASELINE,
            bonuses,
            nutrient_penalties,
            chemical_penalty,
            ceilings: ceilings.into_iter().map(|(c, _)| c).collect(),
        },
    }
}

/// Risk-weighted penalty of all flagged chemicals, capped.
pub fn chemical_penalty(flagged: &[FlaggedChemical]) -> f64 {
    let total: f64 = flagged
        .iter()
        .map(|chem| {
            let record = &chem.record;
            let mut penalty = risk_penalty(record.risk);
            if let Some(hints) = record.hints {
                let exceeded = [
                    hints.sugar_g.is_some_and(|v| v > HINT_SUGAR_LIMIT_G),
                    hints.fat_g.is_some_and(|v| v > HINT_FAT_LIMIT_G),
                    hints.sodium_mg.is_some_and(|v| v > HINT_SODIUM_LIMIT_MG),
                ];
                penalty += HINT_PENALTY * exceeded.iter().filter(|&&e| e).count() as f64;
            }
            penalty
        })
        .sum();

    total.min(CHEMICAL_PENALTY_CAP)
}

fn ceilings(profile: &NutrientProfile, flagged: &[FlaggedChemical]) -> Vec<(Ceiling, f64)> {
    let mut applied = Vec::new();
    if is_high_sugar_low_nutrients(profile) {
        applied.push((Ceiling::HighSugarLowNutrients, HIGH_SUGAR_CEILING));
    }
    if has_severe_trans_fat(profile) {
        applied.push((Ceiling::TransFat, TRANS_FAT_CEILING));
    }
    if flagged.len() >= MANY_CHEMICALS {
        applied.push((Ceiling::ManyChemicals, MANY_CHEMICALS_CEILING));
    }
    applied
}
