//! Body surface area.

/// Mosteller body surface area in m²
///
/// `sqrt(height_cm * weight_kg / 3600)`. Both inputs must be positive,
/// which validation guarantees for every model that uses BSA.
pub fn bsa(height_cm: f64, weight_kg: f64) -> f64 {
    (height_cm * weight_kg / 3600.0).sqrt()
}
