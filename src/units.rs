//! Physiological constants shared by the estimators.

/// Energy stored in one kilogram of body-mass change (kcal).
pub const KCAL_PER_KG: f64 = 7700.0;

/// Energy density of protein (kcal/g).
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;

/// Energy density of carbohydrate (kcal/g).
pub const KCAL_PER_G_CARBS: f64 = 4.0;

/// Energy density of fat (kcal/g).
pub const KCAL_PER_G_FAT: f64 = 9.0;

pub const DAYS_PER_WEEK: f64 = 7.0;

/// Round to the nearest integer, with halves going toward positive infinity.
///
/// `f64::round` sends -2.5 to -3; here it becomes -2, so negative energy
/// deltas round the same way positive ones do.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
