//! Adaptive expenditure estimation from observed energy balance.
//!
//! Average intake over the window, minus the daily surplus implied by the
//! weight change across the same window, recovers what the body burned. The
//! result is blended with the previous estimate and clamped to a plausible
//! range.

use tracing::debug;

use crate::models::{
    Confidence, DailyIntakeSummary, EstimateMethod, ExpenditureEstimate, WeightCheckIn,
};
use crate::units::{round_half_up, KCAL_PER_KG};

/// Fewer intake days than this and the estimate falls back.
pub const MIN_INTAKE_DAYS: usize = 3;

/// Weight entries needed to measure a change.
pub const MIN_WEIGHT_ENTRIES: usize = 2;

/// Days of intake for `Confidence::Medium`.
pub const MEDIUM_CONFIDENCE_DAYS: usize = 7;

/// Days of intake for `Confidence::High`.
pub const HIGH_CONFIDENCE_DAYS: usize = 14;

/// Weight of the new observation when blending with the previous estimate.
pub const NEW_ESTIMATE_WEIGHT: f64 = 0.7;

/// Weight of the previous estimate when blending.
pub const PREVIOUS_ESTIMATE_WEIGHT: f64 = 0.3;

/// Used when there is neither enough data nor a previous estimate.
pub const FALLBACK_TDEE: i32 = 2000;

pub const MIN_TDEE: i32 = 1200;
pub const MAX_TDEE: i32 = 5000;

/// Signed change from the earliest to the latest check-in.
///
/// Check-ins sharing a date keep their input order.
pub fn weight_change(check_ins: &[WeightCheckIn]) -> Option<f64> {
    if check_ins.len() < MIN_WEIGHT_ENTRIES {
        return None;
    }
    let first = check_ins.iter().min_by_key(|c| c.date)?;
    let last = check_ins.iter().max_by_key(|c| c.date)?;
    Some(last.weight_kg - first.weight_kg)
}

pub fn confidence_for_days(days: usize) -> Confidence {
    if days >= HIGH_CONFIDENCE_DAYS {
        Confidence::High
    } else if days >= MEDIUM_CONFIDENCE_DAYS {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// Estimate TDEE from an intake window and the weight check-ins over it.
///
/// `previous_tdee` is the last stored estimate. It is passed through as-is
/// below the intake floor; a zero estimate neither blends nor marks the
/// result adaptive. Inputs are not validated.
pub fn estimate_expenditure(
    summaries: &[DailyIntakeSummary],
    check_ins: &[WeightCheckIn],
    previous_tdee: Option<i32>,
) -> ExpenditureEstimate {
    let has_previous = previous_tdee.is_some_and(|tdee| tdee != 0);
    let days = summaries.len();

    if days < MIN_INTAKE_DAYS {
        debug!(
            days,
            ?previous_tdee,
            "not enough intake days for an adaptive estimate"
        );
        return ExpenditureEstimate {
            tdee: previous_tdee.unwrap_or(FALLBACK_TDEE),
            confidence: Confidence::Low,
            method: if has_previous {
                EstimateMethod::Adaptive
            } else {
                EstimateMethod::Initial
            },
            avg_daily_calories: None,
            weight_delta_kg: None,
            raw_expenditure: None,
        };
    }

    let avg_daily_calories =
        summaries.iter().map(|s| s.total_calories).sum::<f64>() / days as f64;

    let Some(weight_delta) = weight_change(check_ins) else {
        debug!(
            days,
            avg_daily_calories, "no weight change available, using average intake"
        );
        return ExpenditureEstimate {
            tdee: round_half_up(avg_daily_calories) as i32,
            confidence: Confidence::Low,
            method: EstimateMethod::Adaptive,
            avg_daily_calories: Some(avg_daily_calories),
            weight_delta_kg: None,
            raw_expenditure: None,
        };
    };

    let weight_delta_kcal = weight_delta * KCAL_PER_KG;
    let raw_expenditure = avg_daily_calories - weight_delta_kcal / days as f64;

    let blended = match previous_tdee.filter(|_| has_previous) {
        Some(prev) => round_half_up(
            NEW_ESTIMATE_WEIGHT * raw_expenditure + PREVIOUS_ESTIMATE_WEIGHT * f64::from(prev),
        ),
        None => round_half_up(raw_expenditure),
    };
    let tdee = blended.clamp(i64::from(MIN_TDEE), i64::from(MAX_TDEE)) as i32;

    debug!(
        days,
        avg_daily_calories, weight_delta, raw_expenditure, tdee, "adaptive expenditure"
    );

    ExpenditureEstimate {
        tdee,
        confidence: confidence_for_days(days),
        method: EstimateMethod::Adaptive,
        avg_daily_calories: Some(avg_daily_calories),
        weight_delta_kg: Some(weight_delta),
        raw_expenditure: Some(raw_expenditure),
    }
}
