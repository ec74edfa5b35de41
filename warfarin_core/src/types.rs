//! Core domain types for the warfarin dosing engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Model identifiers
//! - Categorical patient inputs (genotypes, race, gender, indication)
//! - One validated feature record per model
//! - The dose result handed back to callers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Model Identifiers
// ============================================================================

/// Published dosing model to evaluate
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ModelId {
    Iwpc,
    Gage,
    Xiangya,
    Biss,
    Clover,
}

impl ModelId {
    /// Every model, in catalog order
    pub const ALL: [ModelId; 5] = [
        ModelId::Iwpc,
        ModelId::Gage,
        ModelId::Xiangya,
        ModelId::Biss,
        ModelId::Clover,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Iwpc => "iwpc",
            ModelId::Gage => "gage",
            ModelId::Xiangya => "xiangya",
            ModelId::Biss => "biss",
            ModelId::Clover => "clover",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        ModelId::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| crate::Error::UnknownModel(s.to_string()))
    }
}

// ============================================================================
// Categorical Inputs
// ============================================================================

/// A categorical input with a fixed set of form labels
///
/// `LABELS` is the legal domain shown to callers; `from_label` may accept
/// a few aliases on top of it.
pub trait Categorical: Sized + Copy {
    const LABELS: &'static [&'static str];

    fn from_label(label: &str) -> Option<Self>;

    fn label(&self) -> &'static str;
}

/// Self-reported race (IWPC and Gage)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Race {
    White,
    Asian,
    Black,
    Mixed,
}

impl Categorical for Race {
    const LABELS: &'static [&'static str] = &["white", "asian", "black", "mixed"];

    fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "white" => Some(Race::White),
            "asian" => Some(Race::Asian),
            "black" => Some(Race::Black),
            "mixed" => Some(Race::Mixed),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Race::White => "white",
            Race::Asian => "asian",
            Race::Black => "black",
            Race::Mixed => "mixed",
        }
    }
}

/// Sex as recorded by the Clover model
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Categorical for Gender {
    const LABELS: &'static [&'static str] = &["male", "female"];

    fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// VKORC1 -1639G>A genotype
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vkorc1 {
    GG,
    AG,
    AA,
    Unknown,
}

impl Vkorc1 {
    /// Count of G alleles (AA=0, AG=1, GG=2), the scale Xiangya and Biss use.
    /// Unknown scores as AA, i.e. 0.
    pub fn g_allele_count(&self) -> u8 {
        match self {
            Vkorc1::GG => 2,
            Vkorc1::AG => 1,
            Vkorc1::AA | Vkorc1::Unknown => 0,
        }
    }
}

impl Categorical for Vkorc1 {
    const LABELS: &'static [&'static str] = &["GG", "AG", "AA", "unknown"];

    fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_uppercase().as_str() {
            "GG" => Some(Vkorc1::GG),
            "AG" | "GA" => Some(Vkorc1::AG),
            "AA" => Some(Vkorc1::AA),
            "UNKNOWN" => Some(Vkorc1::Unknown),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Vkorc1::GG => "GG",
            Vkorc1::AG => "AG",
            Vkorc1::AA => "AA",
            Vkorc1::Unknown => "unknown",
        }
    }
}

/// Full CYP2C9 diplotype (IWPC and Gage)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cyp2c9Diplotype {
    Star1Star1,
    Star1Star2,
    Star1Star3,
    Star2Star2,
    Star2Star3,
    Star3Star3,
    Unknown,
}

impl Cyp2c9Diplotype {
    /// At least one *2 allele
    pub fn carries_star2(&self) -> bool {
        matches!(
            self,
            Cyp2c9Diplotype::Star1Star2 | Cyp2c9Diplotype::Star2Star2 | Cyp2c9Diplotype::Star2Star3
        )
    }

    /// At least one *3 allele
    pub fn carries_star3(&self) -> bool {
        matches!(
            self,
            Cyp2c9Diplotype::Star1Star3 | Cyp2c9Diplotype::Star2Star3 | Cyp2c9Diplotype::Star3Star3
        )
    }
}

impl Categorical for Cyp2c9Diplotype {
    const LABELS: &'static [&'static str] =
        &["*1/*1", "*1/*2", "*1/*3", "*2/*2", "*2/*3", "*3/*3", "unknown"];

    fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "*1/*1" => Some(Cyp2c9Diplotype::Star1Star1),
            "*1/*2" => Some(Cyp2c9Diplotype::Star1Star2),
            "*1/*3" => Some(Cyp2c9Diplotype::Star1Star3),
            "*2/*2" => Some(Cyp2c9Diplotype::Star2Star2),
            "*2/*3" => Some(Cyp2c9Diplotype::Star2Star3),
            "*3/*3" => Some(Cyp2c9Diplotype::Star3Star3),
            "unknown" => Some(Cyp2c9Diplotype::Unknown),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Cyp2c9Diplotype::Star1Star1 => "*1/*1",
            Cyp2c9Diplotype::Star1Star2 => "*1/*2",
            Cyp2c9Diplotype::Star1Star3 => "*1/*3",
            Cyp2c9Diplotype::Star2Star2 => "*2/*2",
            Cyp2c9Diplotype::Star2Star3 => "*2/*3",
            Cyp2c9Diplotype::Star3Star3 => "*3/*3",
            Cyp2c9Diplotype::Unknown => "unknown",
        }
    }
}

/// CYP2C9 *3 zygosity only (Xiangya and Clover)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cyp2c9Star3 {
    Star1Star1,
    Star1Star3,
    Star3Star3,
    Unknown,
}

impl Cyp2c9Star3 {
    /// Number of *3 alleles. Unknown scores as wild type.
    pub fn star3_count(&self) -> u8 {
        match self {
            Cyp2c9Star3::Star1Star1 | Cyp2c9Star3::Unknown => 0,
            Cyp2c9Star3::Star1Star3 => 1,
            Cyp2c9Star3::Star3Star3 => 2,
        }
    }
}

impl Categorical for Cyp2c9Star3 {
    const LABELS: &'static [&'static str] = &["*1/*1", "*1/*3", "*3/*3", "unknown"];

    fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "*1/*1" => Some(Cyp2c9Star3::Star1Star1),
            "*1/*3" => Some(Cyp2c9Star3::Star1Star3),
            "*3/*3" => Some(Cyp2c9Star3::Star3Star3),
            "unknown" => Some(Cyp2c9Star3::Unknown),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Cyp2c9Star3::Star1Star1 => "*1/*1",
            Cyp2c9Star3::Star1Star3 => "*1/*3",
            Cyp2c9Star3::Star3Star3 => "*3/*3",
            Cyp2c9Star3::Unknown => "unknown",
        }
    }
}

/// Reason for anticoagulation (Biss paediatric model)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Indication {
    Fontan,
    #[default]
    Other,
}

impl Categorical for Indication {
    const LABELS: &'static [&'static str] = &["fontan", "other"];

    fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "fontan" => Some(Indication::Fontan),
            "other" => Some(Indication::Other),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Indication::Fontan => "fontan",
            Indication::Other => "other",
        }
    }
}

/// Target INR, restricted to the values the dosing forms offer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TargetInr {
    Inr2_0,
    #[default]
    Inr2_5,
    Inr3_0,
    Inr3_5,
}

impl TargetInr {
    pub fn value(&self) -> f64 {
        match self {
            TargetInr::Inr2_0 => 2.0,
            TargetInr::Inr2_5 => 2.5,
            TargetInr::Inr3_0 => 3.0,
            TargetInr::Inr3_5 => 3.5,
        }
    }
}

impl Categorical for TargetInr {
    const LABELS: &'static [&'static str] = &["2.0", "2.5", "3.0", "3.5"];

    fn from_label(label: &str) -> Option<Self> {
        let value: f64 = label.parse().ok()?;
        [
            TargetInr::Inr2_0,
            TargetInr::Inr2_5,
            TargetInr::Inr3_0,
            TargetInr::Inr3_5,
        ]
        .into_iter()
        .find(|t| t.value() == value)
    }

    fn label(&self) -> &'static str {
        match self {
            TargetInr::Inr2_0 => "2.0",
            TargetInr::Inr2_5 => "2.5",
            TargetInr::Inr3_0 => "3.0",
            TargetInr::Inr3_5 => "3.5",
        }
    }
}

/// Number of copies of a variant allele, 0..=2
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct AlleleCount(u8);

impl AlleleCount {
    pub fn new(count: u8) -> Option<Self> {
        (count <= 2).then_some(AlleleCount(count))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

// ============================================================================
// Validated Feature Records
// ============================================================================

/// IWPC pharmacogenetic equation inputs
#[derive(Clone, Debug, PartialEq)]
pub struct IwpcFeatures {
    pub age: f64,
    pub height: f64,
    pub weight: f64,
    pub race: Race,
    pub cyp2c9: Cyp2c9Diplotype,
    pub vkorc1: Vkorc1,
    pub enzyme_inducer: bool,
    pub amiodarone: bool,
    /// Collected with the IWPC form; the equation has no INR term.
    pub target_inr: TargetInr,
}

/// Gage (warfarindosing.org) equation inputs
#[derive(Clone, Debug, PartialEq)]
pub struct GageFeatures {
    pub age: f64,
    pub height: f64,
    pub weight: f64,
    pub race: Race,
    pub cyp2c9: Cyp2c9Diplotype,
    pub vkorc1: Vkorc1,
    pub amiodarone: bool,
    pub target_inr: TargetInr,
    pub smoking: bool,
    pub dvt_pe: bool,
}

/// Xiangya Hospital equation inputs
#[derive(Clone, Debug, PartialEq)]
pub struct XiangyaFeatures {
    pub age: f64,
    pub height: f64,
    pub weight: f64,
    pub vkorc1: Vkorc1,
    pub cyp2c9: Cyp2c9Star3,
    pub inr_elevating_drugs: u32,
    pub smoking: bool,
    pub stroke_history: bool,
    pub hypertension: bool,
}

/// Biss paediatric equation inputs
#[derive(Clone, Debug, PartialEq)]
pub struct BissFeatures {
    pub height: f64,
    pub vkorc1: Vkorc1,
    pub cyp2c9_2_alleles: AlleleCount,
    pub cyp2c9_3_alleles: AlleleCount,
    pub indication: Indication,
}

/// Clover equation inputs
#[derive(Clone, Debug, PartialEq)]
pub struct CloverFeatures {
    pub age: f64,
    pub height: f64,
    pub weight: f64,
    pub gender: Gender,
    pub vkorc1: Vkorc1,
    pub cyp2c9: Cyp2c9Star3,
    pub amiodarone: bool,
}

/// A validated feature record, one variant per model
///
/// Built fresh for each calculation and never mutated after validation.
#[derive(Clone, Debug, PartialEq)]
pub enum PatientFeatures {
    Iwpc(IwpcFeatures),
    Gage(GageFeatures),
    Xiangya(XiangyaFeatures),
    Biss(BissFeatures),
    Clover(CloverFeatures),
}

impl PatientFeatures {
    /// The model this record was validated for
    pub fn model(&self) -> ModelId {
        match self {
            PatientFeatures::Iwpc(_) => ModelId::Iwpc,
            PatientFeatures::Gage(_) => ModelId::Gage,
            PatientFeatures::Xiangya(_) => ModelId::Xiangya,
            PatientFeatures::Biss(_) => ModelId::Biss,
            PatientFeatures::Clover(_) => ModelId::Clover,
        }
    }
}

// ============================================================================
// Result Type
// ============================================================================

/// Predicted maintenance dose
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DoseResult {
    /// mg/day
    pub daily_dose: f64,
    /// mg/week
    pub weekly_dose: f64,
    /// Body surface area in m², for models that use it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bsa: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_id_parse_is_case_insensitive() {
        assert_eq!("IWPC".parse::<ModelId>().unwrap(), ModelId::Iwpc);
        assert_eq!(" clover ".parse::<ModelId>().unwrap(), ModelId::Clover);
        assert!("warfarin".parse::<ModelId>().is_err());
    }

    #[test]
    fn test_model_id_display_roundtrip() {
        for model in ModelId::ALL {
            assert_eq!(model.to_string().parse::<ModelId>().unwrap(), model);
        }
    }

    #[test]
    fn test_every_label_parses_back() {
        fn check<T: Categorical + PartialEq + fmt::Debug>() {
            for label in T::LABELS {
                let parsed = T::from_label(label).unwrap();
                assert_eq!(parsed.label(), *label);
            }
        }
        check::<Race>();
        check::<Gender>();
        check::<Vkorc1>();
        check::<Cyp2c9Diplotype>();
        check::<Cyp2c9Star3>();
        check::<Indication>();
        check::<TargetInr>();
    }

    #[test]
    fn test_vkorc1_accepts_ga_alias() {
        assert_eq!(Vkorc1::from_label("GA"), Some(Vkorc1::AG));
        assert_eq!(Vkorc1::from_label("ag"), Some(Vkorc1::AG));
    }

    #[test]
    fn test_star2_star3_carries_both() {
        let d = Cyp2c9Diplotype::Star2Star3;
        assert!(d.carries_star2());
        assert!(d.carries_star3());
        assert!(!Cyp2c9Diplotype::Unknown.carries_star2());
        assert!(!Cyp2c9Diplotype::Unknown.carries_star3());
    }

    #[test]
    fn test_target_inr_accepts_short_form() {
        assert_eq!(TargetInr::from_label("2"), Some(TargetInr::Inr2_0));
        assert_eq!(TargetInr::from_label("3.5"), Some(TargetInr::Inr3_5));
        assert_eq!(TargetInr::from_label("2.7"), None);
    }

    #[test]
    fn test_allele_count_bounds() {
        assert_eq!(AlleleCount::new(2).map(|c| c.get()), Some(2));
        assert!(AlleleCount::new(3).is_none());
    }

    #[test]
    fn test_dose_result_serializes_camel_case() {
        let result = DoseResult {
            daily_dose: 5.9,
            weekly_dose: 41.6,
            bsa: None,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("dailyDose"));
        assert!(json.contains("weeklyDose"));
        assert!(!json.contains("bsa"));
    }
}
