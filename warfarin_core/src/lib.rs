#![forbid(unsafe_code)]

//! Warfarin maintenance-dose prediction engine.
//!
//! This crate provides:
//! - Domain types (models, genotypes, per-model feature records)
//! - Per-model input schema and validation of raw form fields
//! - Calculators for the IWPC, Gage, Xiangya, Biss and Clover models
//! - Result rounding
//! - Model catalog, configuration and CSV batch evaluation
//!
//! The engine is stateless and synchronous: every call validates its own
//! input and shares nothing with other calls.

pub mod types;
pub mod error;
pub mod bsa;
pub mod schema;
pub mod validate;
pub mod calculator;
pub mod format;
pub mod catalog;
pub mod engine;
pub mod config;
pub mod logging;
pub mod batch;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use bsa::bsa;
pub use validate::{validate, validate_by_id, RawFields};
pub use calculator::calculate_unrounded;
pub use format::format_result;
pub use catalog::{all_models, model_info, ModelInfo};
pub use engine::{calculate, calculate_by_id};
pub use config::Config;
