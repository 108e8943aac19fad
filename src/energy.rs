//! Basal metabolic rate and static TDEE.
//!
//! These give the cold-start expenditure used before any intake or weight
//! history exists.

use serde::{Deserialize, Serialize};

use crate::models::{ActivityLevel, BodyComposition, BodyProfile, Sex};
use crate::units::round_half_up;

/// Cunningham: BMR = 500 + 22 * lean body mass.
pub fn cunningham_bmr(weight_kg: f64, body_fat_pct: f64) -> f64 {
    let lean_mass = weight_kg * (1.0 - body_fat_pct / 100.0);
    500.0 + 22.0 * lean_mass
}

/// Mifflin-St Jeor: 10w + 6.25h - 5a, then +5 for men and -161 for women.
pub fn mifflin_st_jeor_bmr(weight_kg: f64, height_cm: f64, age: u32, sex: Sex) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// BMR in kcal/day. A measured body fat percentage selects Cunningham.
pub fn bmr(profile: &BodyProfile) -> f64 {
    match profile.composition {
        BodyComposition::Measured { body_fat_pct } => {
            cunningham_bmr(profile.weight_kg, body_fat_pct)
        }
        BodyComposition::Estimated => {
            mifflin_st_jeor_bmr(profile.weight_kg, profile.height_cm, profile.age, profile.sex)
        }
    }
}

/// Static TDEE: round(BMR * activity multiplier).
pub fn static_tdee(profile: &BodyProfile, activity: ActivityLevel) -> i32 {
    round_half_up(bmr(profile) * activity.multiplier()) as i32
}

/// Static TDEE for a bare weight/height pair with the default age and sex.
pub fn initial_tdee(weight_kg: f64, height_cm: f64, activity: ActivityLevel) -> i32 {
    static_tdee(&BodyProfile::new(weight_kg, height_cm), activity)
}

/// Where a baseline TDEE comes from when no adaptive estimate applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TdeeBasis {
    /// A number the user entered themselves.
    Custom(i32),
    /// BMR scaled by activity level.
    Formula(ActivityLevel),
}

impl TdeeBasis {
    pub fn from_profile(custom_tdee: Option<i32>, activity: ActivityLevel) -> Self {
        match custom_tdee {
            Some(tdee) => TdeeBasis::Custom(tdee),
            None => TdeeBasis::Formula(activity),
        }
    }

    pub fn resolve(&self, profile: &BodyProfile) -> i32 {
        match *self {
            TdeeBasis::Custom(tdee) => tdee,
            TdeeBasis::Formula(activity) => static_tdee(profile, activity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sedentary_default_profile() {
        let profile = BodyProfile::new(70.0, 170.0);
        // 700 + 1062.5 - 125 + 5
        assert_eq!(bmr(&profile), 1642.5);
        assert_eq!(initial_tdee(70.0, 170.0, ActivityLevel::Sedentary), 1971);
    }

    #[test]
    fn male_exceeds_female_by_166() {
        for (w, h, a) in [(50.0, 150.0, 20), (70.0, 175.0, 35), (120.0, 195.0, 70)] {
            let male = mifflin_st_jeor_bmr(w, h, a, Sex::Male);
            let female = mifflin_st_jeor_bmr(w, h, a, Sex::Female);
            assert!((male - female - 166.0).abs() < 1e-9);
        }
    }

    #[test]
    fn cunningham_grows_with_weight_and_shrinks_with_fat() {
        let mut last = 0.0;
        for weight in [50.0, 60.0, 75.0, 90.0] {
            let value = cunningham_bmr(weight, 20.0);
            assert!(value > last);
            last = value;
        }

        let mut last = f64::MAX;
        for fat in [5.0, 15.0, 25.0, 40.0] {
            let value = cunningham_bmr(80.0, fat);
            assert!(value < last);
            last = value;
        }
    }

    #[test]
    fn measured_body_fat_selects_cunningham() {
        let profile = BodyProfile::new(80.0, 180.0).with_body_fat(Some(20.0));
        // lean mass 64 kg
        assert_eq!(bmr(&profile), 500.0 + 22.0 * 64.0);
        assert_eq!(
            static_tdee(&profile, ActivityLevel::Moderate),
            round_half_up(1908.0 * 1.55) as i32
        );
    }

    #[test]
    fn every_activity_level_scales_bmr() {
        let profile = BodyProfile::new(70.0, 170.0).with_sex(Sex::Female).with_age(40);
        let mut last = 0;
        for level in ActivityLevel::ALL {
            let tdee = static_tdee(&profile, level);
            assert!(tdee > last);
            last = tdee;
        }
    }

    #[test]
    fn custom_tdee_wins_over_formula() {
        let profile = BodyProfile::new(70.0, 170.0);
        assert_eq!(
            TdeeBasis::from_profile(Some(2600), ActivityLevel::Sedentary).resolve(&profile),
            2600
        );
        assert_eq!(
            TdeeBasis::from_profile(None, ActivityLevel::Sedentary).resolve(&profile),
            1971
        );
    }
}
