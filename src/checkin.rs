//! Planning a weekly weigh-in: new expenditure estimate, new targets, and the
//! row to store.
//!
//! Nothing here touches the network; [`crate::client::NutritionClient`] feeds
//! it stored data and writes the plan back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::expenditure::estimate_expenditure;
use crate::models::{
    CheckIn, DailyIntakeSummary, ExpenditureEstimate, GoalSpec, MacroTargets, NewCheckIn,
    WeightCheckIn,
};
use crate::summary::trailing_window;
use crate::targets::macro_targets;
use crate::units::round_half_up;

/// Days of intake before the check-in date that feed the estimate.
pub const CHECK_IN_WINDOW_DAYS: i64 = 14;

/// Stored check-ins that make up the weight trend.
pub const RECENT_CHECK_INS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInRequest {
    pub date: NaiveDate,
    pub weight_kg: f64,
    pub body_fat_pct: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckInPlan {
    pub estimate: ExpenditureEstimate,
    pub targets: MacroTargets,
    pub row: NewCheckIn,
}

/// Stored check-ins newest first, capped at `limit`.
pub fn most_recent(history: &[CheckIn], limit: usize) -> Vec<&CheckIn> {
    let mut recent: Vec<&CheckIn> = history.iter().collect();
    recent.sort_by(|a, b| b.checked_in_at.cmp(&a.checked_in_at));
    recent.truncate(limit);
    recent
}

/// Work out what a new check-in changes.
///
/// The prior estimate is the newest stored check-in's `estimated_tdee`. When
/// `custom_tdee` is set, targets derive from it instead of the estimate; the
/// estimate is still recorded.
pub fn plan_check_in(
    request: &CheckInRequest,
    summaries: &[DailyIntakeSummary],
    history: &[CheckIn],
    goal: &GoalSpec,
    custom_tdee: Option<i32>,
) -> CheckInPlan {
    let window = trailing_window(summaries, request.date, CHECK_IN_WINDOW_DAYS);
    let recent = most_recent(history, RECENT_CHECK_INS);
    let previous_tdee = recent.first().and_then(|c| c.estimated_tdee);

    let mut weights: Vec<WeightCheckIn> = recent.iter().map(|c| c.weight_entry()).collect();
    weights.push(WeightCheckIn {
        date: request.date,
        weight_kg: request.weight_kg,
    });

    debug!(
        days = window.len(),
        weigh_ins = weights.len(),
        ?previous_tdee,
        "planning check-in"
    );

    let estimate = estimate_expenditure(&window, &weights, previous_tdee);
    let target_tdee = custom_tdee.unwrap_or(estimate.tdee);
    let targets = macro_targets(target_tdee, goal, request.weight_kg);

    info!(
        tdee = estimate.tdee,
        confidence = ?estimate.confidence,
        calories = targets.calories,
        "check-in planned"
    );

    let row = NewCheckIn {
        user_id: None,
        weight_kg: request.weight_kg,
        body_fat_pct: request.body_fat_pct,
        estimated_tdee: estimate.tdee,
        avg_daily_calories_7d: estimate.avg_daily_calories.map(|v| round_half_up(v) as i32),
        weight_trend_kg: estimate.weight_delta_kg,
        expenditure_estimate: estimate.raw_expenditure.map(|v| round_half_up(v) as i32),
        notes: request.notes.clone(),
    };

    CheckInPlan {
        estimate,
        targets,
        row,
    }
}
