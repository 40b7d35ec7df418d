//! Threshold tables and fixed limits of the scoring rule set.
//!
//! Each table lists `(threshold, points)` from the highest threshold down.
//! Only the first matching tier of a table counts.

use crate::models::{NutrientProfile, RiskTier};

pub const BASELINE: f64 = 50.0;

/// Sugars (g) above which a product counts as high-sugar.
pub const HIGH_SUGAR_G: f64 = 22.5;
/// Protein + fiber (g) below which a high-sugar product gets no credit.
pub const LOW_PROTEIN_FIBER_G: f64 = 5.0;
/// Trans fat (g) above which the trans-fat ceiling and status apply.
pub const TRANS_FAT_SEVERE_G: f64 = 0.2;
pub const MANY_CHEMICALS: usize = 5;

pub const HIGH_SUGAR_CEILING: f64 = 25.0;
pub const TRANS_FAT_CEILING: f64 = 20.0;
pub const MANY_CHEMICALS_CEILING: f64 = 20.0;

pub const BALANCED_BONUS: f64 = 10.0;

pub const CHEMICAL_PENALTY_CAP: f64 = 40.0;
pub const HINT_PENALTY: f64 = 5.0;
pub const HINT_SUGAR_LIMIT_G: f64 = 10.0;
pub const HINT_FAT_LIMIT_G: f64 = 10.0;
pub const HINT_SODIUM_LIMIT_MG: f64 = 500.0;

pub fn risk_penalty(risk: RiskTier) -> f64 {
    match risk {
        RiskTier::High => 15.0,
        RiskTier::Medium => 10.0,
        RiskTier::Low => 5.0,
    }
}

/// How a value is compared against a tier threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Strictly above the threshold (penalties).
    Above,
    /// At or above the threshold (bonuses).
    AtLeast,
}

pub struct TierTable {
    pub nutrient: &'static str,
    pub read: fn(&NutrientProfile) -> f64,
    pub comparison: Comparison,
    pub tiers: &'static [(f64, f64)],
}

impl TierTable {
    /// Points of the highest tier `profile` reaches, or zero.
    pub fn points(&self, profile: &NutrientProfile) -> f64 {
        let value = (self.read)(profile);
        self.tiers
            .iter()
            .find(|&&(threshold, _)| match self.comparison {
                Comparison::Above => value > threshold,
                Comparison::AtLeast => value >= threshold,
            })
            .map(|&(_, points)| points)
            .unwrap_or(0.0)
    }
}

fn sugars(p: &NutrientProfile) -> f64 {
    p.sugars
}

fn saturated_fat(p: &NutrientProfile) -> f64 {
    p.saturated_fat
}

fn trans_fat(p: &NutrientProfile) -> f64 {
    p.trans_fat
}

fn sodium_mg(p: &NutrientProfile) -> f64 {
    p.sodium_mg()
}

fn calories(p: &NutrientProfile) -> f64 {
    p.calories
}

fn protein(p: &NutrientProfile) -> f64 {
    p.protein
}

fn fiber(p: &NutrientProfile) -> f64 {
    p.fiber
}

pub const PENALTY_TABLES: &[TierTable] = &[
    TierTable {
        nutrient: "sugars",
        read: sugars,
        comparison: Comparison::Above,
        tiers: &[(22.5, 20.0), (15.0, 12.0), (10.0, 8.0), (5.0, 4.0)],
    },
    TierTable {
        nutrient: "saturated_fat",
        read: saturated_fat,
        comparison: Comparison::Above,
        tiers: &[(10.0, 15.0), (5.0, 10.0), (3.0, 5.0), (1.5, 2.0)],
    },
    TierTable {
        nutrient: "trans_fat",
        read: trans_fat,
        comparison: Comparison::Above,
        tiers: &[(2.0, 25.0), (0.5, 15.0), (0.1, 8.0)],
    },
    TierTable {
        nutrient: "sodium_mg",
        read: sodium_mg,
        comparison: Comparison::Above,
        tiers: &[(800.0, 15.0), (600.0, 10.0), (400.0, 6.0), (200.0, 3.0)],
    },
    TierTable {
        nutrient: "calories",
        read: calories,
        comparison: Comparison::Above,
        tiers: &[(500.0, 10.0), (400.0, 6.0), (300.0, 3.0)],
    },
];

pub const BONUS_TABLES: &[TierTable] = &[
    TierTable {
        nutrient: "protein",
        read: protein,
        comparison: Comparison::AtLeast,
        tiers: &[(20.0, 15.0), (10.0, 10.0), (5.0, 5.0)],
    },
    TierTable {
        nutrient: "fiber",
        read: fiber,
        comparison: Comparison::AtLeast,
        tiers: &[(10.0, 12.0), (6.0, 8.0), (3.0, 4.0)],
    },
];

/// Protein and fiber in mid-range while sugar and saturated fat stay low.
pub fn is_balanced(p: &NutrientProfile) -> bool {
    p.protein > 5.0 && p.protein < 20.0
        && p.fiber > 3.0 && p.fiber < 15.0
        && p.sugars < 10.0
        && p.saturated_fat < 5.0
}

pub fn is_high_sugar_low_nutrients(p: &NutrientProfile) -> bool {
    p.sugars > HIGH_SUGAR_G && p.protein + p.fiber < LOW_PROTEIN_FIBER_G
}

pub fn has_severe_trans_fat(p: &NutrientProfile) -> bool {
    p.trans_fat > TRANS_FAT_SEVERE_G
}
