//! Per-model input schema.
//!
//! Each model declares the raw fields it reads, in the order they are
//! checked. The validator consults these tables for required-ness,
//! defaults and legal values; the CLI renders them for `describe`.

use crate::types::{
    Categorical, Cyp2c9Diplotype, Cyp2c9Star3, Gender, Indication, ModelId, Race, TargetInr,
    Vkorc1,
};
use serde::Serialize;

/// Labels accepted for boolean flags, besides `true`/`false`
pub const FLAG_LABELS: &[&str] = &["yes", "no"];

/// Shape of a raw field value
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Finite real strictly greater than zero and at most `max`
    Positive { unit: &'static str, max: f64 },
    /// One of a fixed set of labels
    Choice { labels: &'static [&'static str] },
    /// Non-negative integer, optionally bounded
    Count { max: Option<u32> },
    /// yes / no
    Flag,
}

/// Declaration of one raw input field
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Value used when an optional field is absent
    pub default: Option<&'static str>,
    pub description: &'static str,
}

impl FieldSpec {
    const fn required(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
            description,
        }
    }

    const fn optional(
        name: &'static str,
        kind: FieldKind,
        default: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: Some(default),
            description,
        }
    }
}

// ============================================================================
// Field Declarations
// ============================================================================

// Upper bounds sit well past any real patient and keep BSA finite
pub const AGE: FieldSpec = FieldSpec::required(
    "age",
    FieldKind::Positive {
        unit: "years",
        max: 150.0,
    },
    "Age",
);
pub const HEIGHT: FieldSpec = FieldSpec::required(
    "height",
    FieldKind::Positive {
        unit: "cm",
        max: 300.0,
    },
    "Height",
);
pub const WEIGHT: FieldSpec = FieldSpec::required(
    "weight",
    FieldKind::Positive {
        unit: "kg",
        max: 500.0,
    },
    "Weight",
);
pub const RACE: FieldSpec = FieldSpec::required(
    "race",
    FieldKind::Choice { labels: Race::LABELS },
    "Race",
);
pub const GENDER: FieldSpec = FieldSpec::required(
    "gender",
    FieldKind::Choice { labels: Gender::LABELS },
    "Gender",
);
pub const VKORC1: FieldSpec = FieldSpec::required(
    "vkorc1",
    FieldKind::Choice { labels: Vkorc1::LABELS },
    "VKORC1 -1639G>A genotype",
);
pub const CYP2C9_DIPLOTYPE: FieldSpec = FieldSpec::required(
    "cyp2c9",
    FieldKind::Choice { labels: Cyp2c9Diplotype::LABELS },
    "CYP2C9 diplotype",
);
pub const CYP2C9_STAR3: FieldSpec = FieldSpec::required(
    "cyp2c9",
    FieldKind::Choice { labels: Cyp2c9Star3::LABELS },
    "CYP2C9*3 genotype",
);
pub const CYP2C9_2_ALLELES: FieldSpec = FieldSpec::optional(
    "cyp2c9_2_alleles",
    FieldKind::Count { max: Some(2) },
    "0",
    "Number of CYP2C9*2 alleles",
);
pub const CYP2C9_3_ALLELES: FieldSpec = FieldSpec::optional(
    "cyp2c9_3_alleles",
    FieldKind::Count { max: Some(2) },
    "0",
    "Number of CYP2C9*3 alleles",
);
pub const INDICATION: FieldSpec = FieldSpec::optional(
    "indication",
    FieldKind::Choice { labels: Indication::LABELS },
    "other",
    "Indication for anticoagulation",
);
pub const INR_ELEVATING_DRUGS: FieldSpec = FieldSpec::optional(
    "inrElevatingDrugs",
    FieldKind::Count { max: None },
    "0",
    "Number of co-medications that raise INR",
);
pub const TARGET_INR: FieldSpec = FieldSpec::optional(
    "targetINR",
    FieldKind::Choice { labels: TargetInr::LABELS },
    "2.5",
    "Target INR",
);
pub const AMIODARONE: FieldSpec =
    FieldSpec::optional("amiodarone", FieldKind::Flag, "no", "Taking amiodarone");
pub const ENZYME_INDUCER: FieldSpec = FieldSpec::optional(
    "enzymeInducer",
    FieldKind::Flag,
    "no",
    "Taking an enzyme inducer (carbamazepine, phenytoin, rifampin)",
);
pub const SMOKING: FieldSpec = FieldSpec::optional("smoking", FieldKind::Flag, "no", "Smoker");
pub const DVT_PE: FieldSpec = FieldSpec::optional(
    "dvtPe",
    FieldKind::Flag,
    "no",
    "DVT/PE as indication",
);
pub const STROKE_HISTORY: FieldSpec = FieldSpec::optional(
    "strokeHistory",
    FieldKind::Flag,
    "no",
    "Preoperative stroke history",
);
pub const HYPERTENSION: FieldSpec =
    FieldSpec::optional("hypertension", FieldKind::Flag, "no", "Hypertension");

// ============================================================================
// Model Schemas
// ============================================================================

static IWPC_SCHEMA: [FieldSpec; 9] = [
    AGE,
    HEIGHT,
    WEIGHT,
    RACE,
    CYP2C9_DIPLOTYPE,
    VKORC1,
    TARGET_INR,
    ENZYME_INDUCER,
    AMIODARONE,
];

static GAGE_SCHEMA: [FieldSpec; 10] = [
    AGE,
    HEIGHT,
    WEIGHT,
    RACE,
    CYP2C9_DIPLOTYPE,
    VKORC1,
    TARGET_INR,
    AMIODARONE,
    SMOKING,
    DVT_PE,
];

static XIANGYA_SCHEMA: [FieldSpec; 9] = [
    AGE,
    HEIGHT,
    WEIGHT,
    VKORC1,
    CYP2C9_STAR3,
    INR_ELEVATING_DRUGS,
    SMOKING,
    STROKE_HISTORY,
    HYPERTENSION,
];

static BISS_SCHEMA: [FieldSpec; 5] = [
    HEIGHT,
    VKORC1,
    CYP2C9_2_ALLELES,
    CYP2C9_3_ALLELES,
    INDICATION,
];

static CLOVER_SCHEMA: [FieldSpec; 7] = [
    AGE,
    HEIGHT,
    WEIGHT,
    GENDER,
    VKORC1,
    CYP2C9_STAR3,
    AMIODARONE,
];

/// Fields a model reads, in validation order
pub fn schema(model: ModelId) -> &'static [FieldSpec] {
    match model {
        ModelId::Iwpc => &IWPC_SCHEMA,
        ModelId::Gage => &GAGE_SCHEMA,
        ModelId::Xiangya => &XIANGYA_SCHEMA,
        ModelId::Biss => &BISS_SCHEMA,
        ModelId::Clover => &CLOVER_SCHEMA,
    }
}

/// Names of the fields a model cannot compute without
pub fn required_fields(model: ModelId) -> Vec<&'static str> {
    schema(model)
        .iter()
        .filter(|f| f.required)
        .map(|f| f.name)
        .collect()
}
