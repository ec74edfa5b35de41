//! Dose calculators, one per published model.
//!
//! Every model has the same shape: an intercept plus coefficient × score
//! for each factor, followed by a final transform (exp, square, or clamp).
//! Calculators return unrounded values; rounding belongs to
//! [`crate::format`].

use crate::bsa::bsa;
use crate::types::*;

/// Run the calculator matching the feature record's model
pub fn calculate_unrounded(features: &PatientFeatures) -> DoseResult {
    let result = match features {
        PatientFeatures::Iwpc(f) => iwpc(f),
        PatientFeatures::Gage(f) => gage(f),
        PatientFeatures::Xiangya(f) => xiangya(f),
        PatientFeatures::Biss(f) => biss(f),
        PatientFeatures::Clover(f) => clover(f),
    };

    tracing::debug!(
        "{} raw dose: {:.4} mg/day, {:.4} mg/week",
        features.model(),
        result.daily_dose,
        result.weekly_dose
    );
    result
}

/// IWPC pharmacogenetic equation
///
/// The linear predictor gives the weekly dose after exponentiation;
/// daily dose is derived from it.
pub fn iwpc(f: &IwpcFeatures) -> DoseResult {
    let mut x: f64 = 5.6044;

    x -= 0.2614 * (f.age / 10.0);
    x += 0.0087 * f.height;
    x += 0.0128 * f.weight;

    x -= match f.vkorc1 {
        Vkorc1::GG => 0.0,
        Vkorc1::AG => 0.8677,
        Vkorc1::AA => 1.6974,
        Vkorc1::Unknown => 0.4854,
    };

    x -= match f.cyp2c9 {
        Cyp2c9Diplotype::Star1Star1 => 0.0,
        Cyp2c9Diplotype::Star1Star2 => 0.5211,
        Cyp2c9Diplotype::Star1Star3 => 0.9357,
        Cyp2c9Diplotype::Star2Star2 => 1.0616,
        Cyp2c9Diplotype::Star2Star3 => 1.9206,
        Cyp2c9Diplotype::Star3Star3 => 2.3312,
        Cyp2c9Diplotype::Unknown => 0.2188,
    };

    x -= match f.race {
        Race::White => 0.0,
        Race::Asian => 0.1092,
        Race::Black => 0.276,
        Race::Mixed => 0.1032,
    };

    if f.enzyme_inducer {
        x += 1.1816;
    }
    if f.amiodarone {
        x -= 0.5503;
    }

    let weekly = x.exp();
    DoseResult {
        daily_dose: weekly / 7.0,
        weekly_dose: weekly,
        bsa: None,
    }
}

/// Gage equation
///
/// CYP2C9 *2 and *3 carriage are scored independently, so *2/*3 takes
/// both penalties.
pub fn gage(f: &GageFeatures) -> DoseResult {
    let area = bsa(f.height, f.weight);
    let mut x: f64 = 0.9751;

    match f.vkorc1 {
        Vkorc1::AG | Vkorc1::AA => x -= 0.3238,
        Vkorc1::GG => {}
        Vkorc1::Unknown => warn_unknown_scores_zero("gage", "vkorc1"),
    }

    x += 0.4317 * area;

    if f.cyp2c9 == Cyp2c9Diplotype::Unknown {
        warn_unknown_scores_zero("gage", "cyp2c9");
    }
    if f.cyp2c9.carries_star3() {
        x -= 0.4008;
    }
    if f.cyp2c9.carries_star2() {
        x -= 0.2066;
    }

    x -= 0.00745 * f.age;
    x += 0.2029 * f.target_inr.value();

    if f.amiodarone {
        x -= 0.2538;
    }
    if f.smoking {
        x += 0.0922;
    }
    if f.race == Race::Black {
        x -= 0.0901;
    }
    if f.dvt_pe {
        x += 0.0664;
    }

    let daily = x.exp();
    DoseResult {
        daily_dose: daily,
        weekly_dose: daily * 7.0,
        bsa: Some(area),
    }
}

/// Xiangya Hospital equation (square-root dose scale)
pub fn xiangya(f: &XiangyaFeatures) -> DoseResult {
    let area = bsa(f.height, f.weight);
    if f.vkorc1 == Vkorc1::Unknown {
        warn_unknown_scores_zero("xiangya", "vkorc1");
    }
    if f.cyp2c9 == Cyp2c9Star3::Unknown {
        warn_unknown_scores_zero("xiangya", "cyp2c9");
    }

    let mut x: f64 = 2.140;

    x -= 0.370 * f64::from(f.vkorc1.g_allele_count());
    x -= 0.332 * f64::from(f.cyp2c9.star3_count());
    x += 0.324 * area;
    x -= 0.004 * f.age;
    x -= 0.231 * f64::from(f.inr_elevating_drugs);

    if f.smoking {
        x += 0.105;
    }
    if f.stroke_history {
        x -= 0.135;
    }
    if f.hypertension {
        x -= 0.108;
    }

    let daily = x.powi(2);
    DoseResult {
        daily_dose: daily,
        weekly_dose: daily * 7.0,
        bsa: Some(area),
    }
}

/// Biss paediatric equation
///
/// Linear in mg/day; a negative prediction is clamped to zero.
pub fn biss(f: &BissFeatures) -> DoseResult {
    if f.vkorc1 == Vkorc1::Unknown {
        warn_unknown_scores_zero("biss", "vkorc1");
    }

    let mut x: f64 = -0.009;

    x += 0.011 * f.height;
    x += 0.357 * f64::from(f.vkorc1.g_allele_count());
    x -= 0.478 * f64::from(f.cyp2c9_3_alleles.get());
    x -= 0.277 * f64::from(f.cyp2c9_2_alleles.get());
    x += match f.indication {
        Indication::Fontan => 0.0,
        Indication::Other => 0.186,
    };

    if x < 0.0 {
        tracing::warn!("Biss prediction {:.4} mg/day is negative, clamping to 0", x);
    }

    let daily = x.max(0.0);
    DoseResult {
        daily_dose: daily,
        weekly_dose: daily * 7.0,
        bsa: None,
    }
}

/// Clover equation (square-root dose scale)
pub fn clover(f: &CloverFeatures) -> DoseResult {
    let area = bsa(f.height, f.weight);
    let mut x: f64 = 1.346;

    // Clover counts from 1, with unknown contributing nothing
    x += 0.350
        * match f.vkorc1 {
            Vkorc1::AA => 1.0,
            Vkorc1::AG => 2.0,
            Vkorc1::GG => 3.0,
            Vkorc1::Unknown => {
                warn_unknown_scores_zero("clover", "vkorc1");
                0.0
            }
        };

    x -= 0.273
        * match f.cyp2c9 {
            Cyp2c9Star3::Star1Star1 => 1.0,
            Cyp2c9Star3::Star1Star3 => 2.0,
            Cyp2c9Star3::Star3Star3 => 3.0,
            Cyp2c9Star3::Unknown => {
                warn_unknown_scores_zero("clover", "cyp2c9");
                0.0
            }
        };

    x += 0.245 * area;
    x -= 0.003 * f.age;

    // Flat offset, not scaled
    if f.amiodarone {
        x -= 0.036;
    }

    x += 0.021
        * match f.gender {
            Gender::Male => 1.0,
            Gender::Female => 2.0,
        };

    let daily = x.powi(2);
    DoseResult {
        daily_dose: daily,
        weekly_dose: daily * 7.0,
        bsa: Some(area),
    }
}

fn warn_unknown_scores_zero(model: &str, field: &str) {
    tracing::warn!(
        "{} has no coefficient for an unknown {} genotype; it contributes a score of 0",
        model,
        field
    );
}
