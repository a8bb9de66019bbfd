//! Additive detection and health scoring for free-form ingredient-label text.
//!
//! The crate is organised around two seams: [`catalog::AdditiveCatalog`], the read-only view over
//! the additive and alternatives reference data, and [`analysis::AnalysisEngine`], which turns a
//! label plus a consumer profile into an auditable [`analysis::AnalysisResult`].

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod error;
pub mod telemetry;
