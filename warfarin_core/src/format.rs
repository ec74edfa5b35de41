//! Result formatting.
//!
//! Rounding is round-half-away-from-zero (`f64::round`), applied once to
//! each exposed value. Daily and weekly doses use the model's declared
//! precision (two decimals for Biss, one for the rest); BSA always uses two.

use crate::catalog::model_info;
use crate::types::{DoseResult, ModelId};

/// Decimal places for BSA
pub const BSA_DECIMALS: u32 = 2;

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10_f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Round an unrounded calculator result for display
///
/// Daily and weekly are rounded independently from the unrounded pair,
/// so neither inherits the other's rounding error.
pub fn format_result(model: ModelId, raw: &DoseResult) -> DoseResult {
    let decimals = model_info(model).precision;

    DoseResult {
        daily_dose: round_to(raw.daily_dose, decimals),
        weekly_dose: round_to(raw.weekly_dose, decimals),
        bsa: raw.bsa.map(|b| round_to(b, BSA_DECIMALS)),
    }
}
