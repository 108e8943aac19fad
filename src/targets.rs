//! Calorie and macro targets derived from a TDEE and a weight goal.

use crate::models::{GoalSpec, GoalType, MacroTargets};
use crate::units::{
    round_half_up, DAYS_PER_WEEK, KCAL_PER_G_CARBS, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN,
    KCAL_PER_KG,
};

/// Lowest calorie target ever recommended.
pub const MIN_CALORIE_TARGET: u32 = 1200;

/// Protein per kilogram of body weight, whatever the goal.
pub const PROTEIN_G_PER_KG: f64 = 2.0;

/// Share of calories allocated to fat.
pub const FAT_CALORIE_RATIO: f64 = 0.27;

/// Daily surplus (positive) or deficit (negative) for a goal.
///
/// A maintain goal always yields zero, even with a stray rate.
pub fn daily_adjustment(goal: &GoalSpec) -> f64 {
    match goal.goal_type {
        GoalType::Maintain => 0.0,
        GoalType::Lose | GoalType::Gain => goal.rate_kg_per_week * KCAL_PER_KG / DAYS_PER_WEEK,
    }
}

/// Derive calorie, protein, carb and fat targets.
///
/// Carbs take whatever calories protein and fat leave, floored at zero.
pub fn macro_targets(tdee: i32, goal: &GoalSpec, weight_kg: f64) -> MacroTargets {
    let target = round_half_up(f64::from(tdee) + daily_adjustment(goal));
    let calories = target.max(i64::from(MIN_CALORIE_TARGET));

    let protein_g = round_half_up(weight_kg * PROTEIN_G_PER_KG).max(0);
    let fat_g = round_half_up(calories as f64 * FAT_CALORIE_RATIO / KCAL_PER_G_FAT).max(0);

    let carb_calories = calories as f64
        - protein_g as f64 * KCAL_PER_G_PROTEIN
        - fat_g as f64 * KCAL_PER_G_FAT;
    let carbs_g = round_half_up(carb_calories / KCAL_PER_G_CARBS).max(0);

    MacroTargets {
        calories: calories as u32,
        protein_g: protein_g as u32,
        carbs_g: carbs_g as u32,
        fat_g: fat_g as u32,
    }
}
