use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Age used by Mifflin-St Jeor when the profile does not carry one.
pub const DEFAULT_AGE: u32 = 25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[default]
    Male,
    Female,
}

/// How lean mass is known for a BMR calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodyComposition {
    /// Body fat was measured; Cunningham applies.
    Measured { body_fat_pct: f64 },
    /// No measurement; Mifflin-St Jeor applies.
    Estimated,
}

/// Snapshot of the body measurements a single calculation runs against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub sex: Sex,
    pub composition: BodyComposition,
}

impl BodyProfile {
    /// Profile with the documented fallbacks: age 25, male, no body fat measurement.
    pub fn new(weight_kg: f64, height_cm: f64) -> Self {
        Self {
            weight_kg,
            height_cm,
            age: DEFAULT_AGE,
            sex: Sex::default(),
            composition: BodyComposition::Estimated,
        }
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = sex;
        self
    }

    pub fn with_body_fat(mut self, body_fat_pct: Option<f64>) -> Self {
        self.composition = match body_fat_pct {
            Some(body_fat_pct) => BodyComposition::Measured { body_fat_pct },
            None => BodyComposition::Estimated,
        };
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    /// TDEE multiplier applied to BMR.
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Lose,
    Maintain,
    Gain,
}

/// Weight goal. The rate is negative for `Lose` and positive for `Gain`;
/// nothing checks that.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalSpec {
    pub goal_type: GoalType,
    pub rate_kg_per_week: f64,
}

impl GoalSpec {
    pub fn maintain() -> Self {
        Self {
            goal_type: GoalType::Maintain,
            rate_kg_per_week: 0.0,
        }
    }
}

/// Food intake totals for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyIntakeSummary {
    #[serde(alias = "logged_at")]
    pub date: NaiveDate,
    pub total_calories: f64,
    #[serde(default, alias = "total_protein")]
    pub total_protein_g: f64,
    #[serde(default, alias = "total_carbs")]
    pub total_carbs_g: f64,
    #[serde(default, alias = "total_fat")]
    pub total_fat_g: f64,
    #[serde(default)]
    pub entry_count: u32,
}

impl DailyIntakeSummary {
    pub fn new(date: NaiveDate, total_calories: f64) -> Self {
        Self {
            date,
            total_calories,
            total_protein_g: 0.0,
            total_carbs_g: 0.0,
            total_fat_g: 0.0,
            entry_count: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightCheckIn {
    pub date: NaiveDate,
    pub weight_kg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateMethod {
    Initial,
    Adaptive,
}

/// Result of one expenditure estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpenditureEstimate {
    pub tdee: i32,
    pub confidence: Confidence,
    pub method: EstimateMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_daily_calories: Option<f64>,
    #[serde(rename = "weight_delta", skip_serializing_if = "Option::is_none")]
    pub weight_delta_kg: Option<f64>,
    /// Energy-balance expenditure before blending and clamping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_expenditure: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub calories: u32,
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
}

impl MacroTargets {
    /// Energy implied by the macro split (4/4/9 kcal per gram).
    pub fn macro_calories(&self) -> u64 {
        u64::from(self.protein_g) * 4 + u64::from(self.carbs_g) * 4 + u64::from(self.fat_g) * 9
    }
}

/// Row of the `profiles` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub display_name: Option<String>,
    pub height_cm: Option<f64>,
    pub current_weight_kg: Option<f64>,
    pub goal_weight_kg: Option<f64>,
    pub body_fat_pct: Option<f64>,
    pub activity_level: ActivityLevel,
    pub goal_type: GoalType,
    #[serde(default)]
    pub goal_rate: f64,
    pub calorie_target: Option<u32>,
    pub protein_target_g: Option<u32>,
    pub carb_target_g: Option<u32>,
    pub fat_target_g: Option<u32>,
    pub custom_tdee: Option<i32>,
    #[serde(default)]
    pub onboarded: bool,
}

impl Profile {
    pub fn goal(&self) -> GoalSpec {
        GoalSpec {
            goal_type: self.goal_type,
            rate_kg_per_week: self.goal_rate,
        }
    }

    /// Current targets, if all four are stored.
    pub fn targets(&self) -> Option<MacroTargets> {
        Some(MacroTargets {
            calories: self.calorie_target?,
            protein_g: self.protein_target_g?,
            carbs_g: self.carb_target_g?,
            fat_g: self.fat_target_g?,
        })
    }
}

/// Row of the `check_ins` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: String,
    pub user_id: String,
    pub checked_in_at: DateTime<Utc>,
    pub weight_kg: f64,
    pub body_fat_pct: Option<f64>,
    pub estimated_tdee: Option<i32>,
    pub avg_daily_calories_7d: Option<i32>,
    pub weight_trend_kg: Option<f64>,
    pub expenditure_estimate: Option<i32>,
    pub notes: Option<String>,
}

impl CheckIn {
    pub fn weight_entry(&self) -> WeightCheckIn {
        WeightCheckIn {
            date: self.checked_in_at.date_naive(),
            weight_kg: self.weight_kg,
        }
    }
}

/// Insert payload for `check_ins`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCheckIn {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub weight_kg: f64,
    pub body_fat_pct: Option<f64>,
    pub estimated_tdee: i32,
    pub avg_daily_calories_7d: Option<i32>,
    pub weight_trend_kg: Option<f64>,
    pub expenditure_estimate: Option<i32>,
    pub notes: Option<String>,
}

/// Row of the `food_log` table. Override columns win over logged values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLogEntry {
    pub id: String,
    pub logged_at: NaiveDate,
    pub meal_type: Option<String>,
    #[serde(default)]
    pub servings: f64,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub override_calories: Option<f64>,
    pub override_protein_g: Option<f64>,
    pub override_carbs_g: Option<f64>,
    pub override_fat_g: Option<f64>,
    pub quick_description: Option<String>,
}

/// Profile columns written whenever targets change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetsUpdate {
    pub calorie_target: u32,
    pub protein_target_g: u32,
    pub carb_target_g: u32,
    pub fat_target_g: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_weight_kg: Option<f64>,
}

impl TargetsUpdate {
    pub fn new(targets: MacroTargets) -> Self {
        Self {
            calorie_target: targets.calories,
            protein_target_g: targets.protein_g,
            carb_target_g: targets.carbs_g,
            fat_target_g: targets.fat_g,
            current_weight_kg: None,
        }
    }

    pub fn with_weight(mut self, weight_kg: f64) -> Self {
        self.current_weight_kg = Some(weight_kg);
        self
    }
}

/// Answers collected when a user first sets up their profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Onboarding {
    pub display_name: Option<String>,
    pub height_cm: f64,
    pub current_weight_kg: f64,
    pub goal_weight_kg: Option<f64>,
    pub body_fat_pct: Option<f64>,
    pub activity_level: ActivityLevel,
    pub goal_type: GoalType,
    pub goal_rate: f64,
    pub custom_tdee: Option<i32>,
}
