//! Daily intake totals built from individual food log entries.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::models::{DailyIntakeSummary, FoodLogEntry};

/// Calories and macros an entry actually counts for.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectiveMacros {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Logged values with any user overrides applied.
pub fn effective_macros(entry: &FoodLogEntry) -> EffectiveMacros {
    EffectiveMacros {
        calories: entry.override_calories.unwrap_or(entry.calories),
        protein_g: entry.override_protein_g.unwrap_or(entry.protein_g),
        carbs_g: entry.override_carbs_g.unwrap_or(entry.carbs_g),
        fat_g: entry.override_fat_g.unwrap_or(entry.fat_g),
    }
}

/// One summary per logged date, ascending.
pub fn summarize_days(entries: &[FoodLogEntry]) -> Vec<DailyIntakeSummary> {
    let mut days: BTreeMap<NaiveDate, DailyIntakeSummary> = BTreeMap::new();

    for entry in entries {
        let macros = effective_macros(entry);
        let day = days
            .entry(entry.logged_at)
            .or_insert_with(|| DailyIntakeSummary::new(entry.logged_at, 0.0));
        day.total_calories += macros.calories;
        day.total_protein_g += macros.protein_g;
        day.total_carbs_g += macros.carbs_g;
        day.total_fat_g += macros.fat_g;
        day.entry_count += 1;
    }

    days.into_values().collect()
}

/// Summaries dated within `days` days before `end`, both bounds inclusive.
pub fn trailing_window(
    summaries: &[DailyIntakeSummary],
    end: NaiveDate,
    days: i64,
) -> Vec<DailyIntakeSummary> {
    let start = end - Duration::days(days);
    summaries
        .iter()
        .filter(|s| s.date >= start && s.date <= end)
        .cloned()
        .collect()
}
