//! Report renderers for analysis results.
//!
//! - [`terminal`]: colored summary box and tables; respects `--verbose` / `--quiet`.
//! - JSON output is the serialized [`AnalysisReport`](crate::models::AnalysisReport),
//!   written directly by `main`.

pub mod terminal;
