//! Input validation.
//!
//! Turns a raw string-keyed field map into the typed feature record for
//! one model. All domain checks live here; calculators assume their input
//! is already valid.

use crate::schema::{self, FieldKind, FieldSpec};
use crate::types::*;
use crate::{Error, Result};
use std::collections::HashMap;

/// Raw form fields as collected by the caller
pub type RawFields = HashMap<String, String>;

/// Validate raw fields for a model and build its feature record
///
/// Fails on the first offending field in the model's schema order.
/// Fields the model does not read are ignored.
pub fn validate(model: ModelId, raw: &RawFields) -> Result<PatientFeatures> {
    let r = FieldReader { raw };

    let features = match model {
        ModelId::Iwpc => PatientFeatures::Iwpc(IwpcFeatures {
            age: r.positive(&schema::AGE)?,
            height: r.positive(&schema::HEIGHT)?,
            weight: r.positive(&schema::WEIGHT)?,
            race: r.choice(&schema::RACE)?,
            cyp2c9: r.choice(&schema::CYP2C9_DIPLOTYPE)?,
            vkorc1: r.choice(&schema::VKORC1)?,
            target_inr: r.choice(&schema::TARGET_INR)?,
            enzyme_inducer: r.flag(&schema::ENZYME_INDUCER)?,
            amiodarone: r.flag(&schema::AMIODARONE)?,
        }),
        ModelId::Gage => PatientFeatures::Gage(GageFeatures {
            age: r.positive(&schema::AGE)?,
            height: r.positive(&schema::HEIGHT)?,
            weight: r.positive(&schema::WEIGHT)?,
            race: r.choice(&schema::RACE)?,
            cyp2c9: r.choice(&schema::CYP2C9_DIPLOTYPE)?,
            vkorc1: r.choice(&schema::VKORC1)?,
            target_inr: r.choice(&schema::TARGET_INR)?,
            amiodarone: r.flag(&schema::AMIODARONE)?,
            smoking: r.flag(&schema::SMOKING)?,
            dvt_pe: r.flag(&schema::DVT_PE)?,
        }),
        ModelId::Xiangya => PatientFeatures::Xiangya(XiangyaFeatures {
            age: r.positive(&schema::AGE)?,
            height: r.positive(&schema::HEIGHT)?,
            weight: r.positive(&schema::WEIGHT)?,
            vkorc1: r.choice(&schema::VKORC1)?,
            cyp2c9: r.choice(&schema::CYP2C9_STAR3)?,
            inr_elevating_drugs: r.count(&schema::INR_ELEVATING_DRUGS)?,
            smoking: r.flag(&schema::SMOKING)?,
            stroke_history: r.flag(&schema::STROKE_HISTORY)?,
            hypertension: r.flag(&schema::HYPERTENSION)?,
        }),
        ModelId::Biss => PatientFeatures::Biss(BissFeatures {
            height: r.positive(&schema::HEIGHT)?,
            vkorc1: r.choice(&schema::VKORC1)?,
            cyp2c9_2_alleles: r.alleles(&schema::CYP2C9_2_ALLELES)?,
            cyp2c9_3_alleles: r.alleles(&schema::CYP2C9_3_ALLELES)?,
            indication: r.choice(&schema::INDICATION)?,
        }),
        ModelId::Clover => PatientFeatures::Clover(CloverFeatures {
            age: r.positive(&schema::AGE)?,
            height: r.positive(&schema::HEIGHT)?,
            weight: r.positive(&schema::WEIGHT)?,
            gender: r.choice(&schema::GENDER)?,
            vkorc1: r.choice(&schema::VKORC1)?,
            cyp2c9: r.choice(&schema::CYP2C9_STAR3)?,
            amiodarone: r.flag(&schema::AMIODARONE)?,
        }),
    };

    tracing::debug!("Validated {} input", model);
    Ok(features)
}

/// Validate with the model given by its string id
pub fn validate_by_id(model_id: &str, raw: &RawFields) -> Result<PatientFeatures> {
    validate(model_id.parse()?, raw)
}

/// Typed accessors over the raw map, one per field kind
struct FieldReader<'a> {
    raw: &'a RawFields,
}

impl<'a> FieldReader<'a> {
    /// Trimmed value, or the declared default. Empty strings count as absent.
    fn text(&self, spec: &FieldSpec) -> Result<&'a str> {
        let given = self
            .raw
            .get(spec.name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty());

        given
            .or(spec.default)
            .ok_or_else(|| Error::missing(spec.name))
    }

    /// Age, height and weight. Zero is rejected along with negatives and
    /// anything above the field's upper bound.
    fn positive(&self, spec: &FieldSpec) -> Result<f64> {
        let text = self.text(spec)?;
        let value: f64 = text
            .parse()
            .map_err(|_| Error::invalid(spec.name, format!("'{}' is not a number", text)))?;

        if !value.is_finite() || value <= 0.0 {
            return Err(Error::invalid(
                spec.name,
                format!("'{}' must be a finite number greater than zero", text),
            ));
        }
        if let FieldKind::Positive { max, .. } = spec.kind {
            if value > max {
                return Err(Error::invalid(
                    spec.name,
                    format!("{} exceeds the maximum of {}", value, max),
                ));
            }
        }
        Ok(value)
    }

    fn choice<T: Categorical>(&self, spec: &FieldSpec) -> Result<T> {
        let text = self.text(spec)?;
        T::from_label(text).ok_or_else(|| {
            Error::invalid(
                spec.name,
                format!("'{}' is not one of: {}", text, T::LABELS.join(", ")),
            )
        })
    }

    fn flag(&self, spec: &FieldSpec) -> Result<bool> {
        let text = self.text(spec)?;
        match text.to_ascii_lowercase().as_str() {
            "yes" | "true" => Ok(true),
            "no" | "false" => Ok(false),
            _ => Err(Error::invalid(
                spec.name,
                format!("'{}' is not one of: yes, no", text),
            )),
        }
    }

    fn count(&self, spec: &FieldSpec) -> Result<u32> {
        let text = self.text(spec)?;
        let value: u32 = text.parse().map_err(|_| {
            Error::invalid(
                spec.name,
                format!("'{}' is not a non-negative whole number", text),
            )
        })?;

        if let FieldKind::Count { max: Some(max) } = spec.kind {
            if value > max {
                return Err(Error::invalid(
                    spec.name,
                    format!("{} exceeds the maximum of {}", value, max),
                ));
            }
        }
        Ok(value)
    }

    fn alleles(&self, spec: &FieldSpec) -> Result<AlleleCount> {
        let value = self.count(spec)?;
        u8::try_from(value)
            .ok()
            .and_then(AlleleCount::new)
            .ok_or_else(|| Error::invalid(spec.name, format!("{} is not 0, 1 or 2", value)))
    }
}
