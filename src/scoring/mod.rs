//! Health score and status for a nutrient profile plus its flagged chemicals.
//!
//! - [`tiers`]: threshold tables and fixed limits.
//! - [`engine`]: baseline, penalties, bonuses, chemical weighting and ceilings.
//! - [`status`]: override checks and the descending score bands.

pub mod engine;
pub mod status;
pub mod tiers;

pub use engine::score;
