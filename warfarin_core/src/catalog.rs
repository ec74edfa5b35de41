//! Catalog of supported dosing models.
//!
//! Static descriptive metadata for each model: display name, the
//! population it was derived from, the factors it uses, and the
//! precision its results are reported at.

use crate::schema;
use crate::types::ModelId;
use once_cell::sync::Lazy;
use serde::Serialize;

/// Shown with every result.
pub const DISCLAIMER: &str = "This calculator is for reference by healthcare professionals only \
and cannot replace clinical judgment. Follow physician guidance and monitor INR regularly.";

/// Follow-up advice shown with a computed dose.
pub const RESULT_NOTE: &str = "This is a predicted initial dose. Adjust according to INR \
monitoring; check INR 3-5 days after starting treatment.";

/// Unit the model's equation natively predicts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeOutput {
    MgPerDay,
    MgPerWeek,
}

/// Descriptive metadata for one model
#[derive(Clone, Debug, Serialize)]
pub struct ModelInfo {
    pub id: ModelId,
    pub name: &'static str,
    pub description: &'static str,
    pub population: &'static str,
    pub factors: &'static [&'static str],
    pub native_output: NativeOutput,
    /// Decimal places for daily and weekly dose
    pub precision: u32,
}

/// Cached catalog, in `ModelId::ALL` order
static CATALOG: Lazy<Vec<ModelInfo>> = Lazy::new(build_catalog);

/// All models, in catalog order
pub fn all_models() -> &'static [ModelInfo] {
    &CATALOG
}

/// Metadata for one model
pub fn model_info(model: ModelId) -> &'static ModelInfo {
    // CATALOG is built from ModelId::ALL, so the index always exists
    &CATALOG[model as usize]
}

fn build_catalog() -> Vec<ModelInfo> {
    ModelId::ALL.iter().map(|&id| describe(id)).collect()
}

fn describe(id: ModelId) -> ModelInfo {
    match id {
        ModelId::Iwpc => ModelInfo {
            id,
            name: "IWPC",
            description: "International Warfarin Pharmacogenetics Consortium equation \
                          from a large multicentre cohort",
            population: "Multi-ethnic adult cohort",
            factors: &[
                "Age, height, weight",
                "Race",
                "CYP2C9 diplotype",
                "VKORC1 genotype",
                "Enzyme inducer use",
                "Amiodarone use",
            ],
            native_output: NativeOutput::MgPerWeek,
            precision: 1,
        },
        ModelId::Gage => ModelInfo {
            id,
            name: "Gage",
            description: "Clinical and genetic equation using body surface area, \
                          smoking status and thrombotic history",
            population: "Adult cohort (warfarindosing.org)",
            factors: &[
                "Body surface area",
                "VKORC1 genotype",
                "CYP2C9 *2 and *3 carriage",
                "Age",
                "Target INR",
                "Amiodarone use",
                "Smoking",
                "African or African American race",
                "DVT/PE",
            ],
            native_output: NativeOutput::MgPerDay,
            precision: 1,
        },
        ModelId::Xiangya => ModelInfo {
            id,
            name: "Xiangya",
            description: "Equation developed at Xiangya Hospital, Central South University",
            population: "Chinese adults",
            factors: &[
                "VKORC1 genotype",
                "CYP2C9*3 genotype",
                "Body surface area",
                "Age",
                "Number of INR-elevating drugs",
                "Smoking",
                "Preoperative stroke",
                "Hypertension",
            ],
            native_output: NativeOutput::MgPerDay,
            precision: 1,
        },
        ModelId::Biss => ModelInfo {
            id,
            name: "Biss",
            description: "Paediatric equation with a term for Fontan surgery",
            population: "Children, including Fontan patients",
            factors: &[
                "Height",
                "VKORC1 genotype",
                "CYP2C9*2 allele count",
                "CYP2C9*3 allele count",
                "Indication (Fontan or other)",
            ],
            native_output: NativeOutput::MgPerDay,
            precision: 2,
        },
        ModelId::Clover => ModelInfo {
            id,
            name: "Clover",
            description: "Equation accounting for sex and body surface area",
            population: "Chinese adults",
            factors: &[
                "VKORC1 genotype",
                "CYP2C9*3 genotype",
                "Body surface area",
                "Age",
                "Gender",
                "Amiodarone use",
            ],
            native_output: NativeOutput::MgPerDay,
            precision: 1,
        },
    }
}

/// Check catalog consistency
///
/// Returns a list of problems; empty means the catalog is usable.
pub fn validate() -> Vec<String> {
    let mut errors = Vec::new();

    for (index, info) in all_models().iter().enumerate() {
        if info.id as usize != index {
            errors.push(format!("Model '{}' is out of catalog order", info.id));
        }
        if info.name.is_empty() {
            errors.push(format!("Model '{}' has empty name", info.id));
        }
        if info.factors.is_empty() {
            errors.push(format!("Model '{}' lists no factors", info.id));
        }
        if info.precision == 0 {
            errors.push(format!("Model '{}' has zero precision", info.id));
        }
        if schema::required_fields(info.id).is_empty() {
            errors.push(format!("Model '{}' has no required fields", info.id));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        let errors = validate();
        assert!(errors.is_empty(), "catalog errors: {:?}", errors);
    }

    #[test]
    fn test_every_model_listed_once() {
        let ids: Vec<ModelId> = all_models().iter().map(|m| m.id).collect();
        assert_eq!(ids, ModelId::ALL);
    }

    #[test]
    fn test_model_info_lookup() {
        assert_eq!(model_info(ModelId::Biss).precision, 2);
        assert_eq!(model_info(ModelId::Iwpc).native_output, NativeOutput::MgPerWeek);
        assert_eq!(model_info(ModelId::Clover).name, "Clover");
    }
}
