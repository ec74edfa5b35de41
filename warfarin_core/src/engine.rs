//! Calculation pipeline.
//!
//! validate → calculator → formatter. Stateless: every call builds its own
//! feature record and nothing is kept between calls.

use crate::calculator::calculate_unrounded;
use crate::format::format_result;
use crate::validate::{validate, RawFields};
use crate::{DoseResult, ModelId, Result};

/// Predict a maintenance dose from raw form fields
///
/// Returns `MissingOrInvalidInput` naming the first offending field when
/// validation fails. Once validation passes, calculation cannot fail.
pub fn calculate(model: ModelId, raw: &RawFields) -> Result<DoseResult> {
    let features = validate(model, raw)?;
    let unrounded = calculate_unrounded(&features);
    let result = format_result(model, &unrounded);

    tracing::info!(
        "{} dose: {} mg/day, {} mg/week",
        model,
        result.daily_dose,
        result.weekly_dose
    );
    Ok(result)
}

/// Same as [`calculate`], with the model given by its string id
pub fn calculate_by_id(model_id: &str, raw: &RawFields) -> Result<DoseResult> {
    calculate(model_id.parse()?, raw)
}
