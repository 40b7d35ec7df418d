//! Local knowledge base of additives of concern.
//!
//! - [`base`]: loads the JSON table once, skipping malformed entries.
//! - [`matcher`]: boundary-aware detection of registered names in ingredient text.

pub mod base;
pub mod matcher;
