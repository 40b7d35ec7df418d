//! Async HTTP clients for the external data sources.
//!
//! - [`open_food_facts`]: product record by barcode; failures map onto
//!   [`AnalysisError`](crate::error::AnalysisError).
//! - [`openfda`]: adverse-event report count for one ingredient term.

pub mod open_food_facts;
pub mod openfda;
