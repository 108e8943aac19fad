use anyhow::{anyhow, Context, Result};
use chrono::{Duration, NaiveDate};
use serde_json::json;
use tracing::{info, warn};

use crate::auth::SessionAuth;
use crate::checkin::{
    plan_check_in, CheckInPlan, CheckInRequest, CHECK_IN_WINDOW_DAYS, RECENT_CHECK_INS,
};
use crate::config::Config;
use crate::energy::TdeeBasis;
use crate::models::*;
use crate::postgrest::{eq, gte, lte, PostgrestClient};
use crate::targets::macro_targets;

const PROFILES: &str = "profiles";
const CHECK_INS: &str = "check_ins";
const DAILY_SUMMARY: &str = "daily_summary";
const FOOD_LOG: &str = "food_log";

/// Outcome of [`NutritionClient::run_check_in`].
#[derive(Debug, Clone)]
pub struct CheckInOutcome {
    pub check_in: CheckIn,
    pub plan: CheckInPlan,
}

#[derive(Clone)]
pub struct NutritionClient {
    pub auth: SessionAuth,
    pub postgrest: PostgrestClient,
}

impl NutritionClient {
    pub fn new(config: &Config) -> Self {
        let auth = SessionAuth::new(config);
        let postgrest = PostgrestClient::new(config, auth.clone());
        Self { auth, postgrest }
    }

    /// Client configured from `SUPABASE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(&Config::from_env()?))
    }

    pub async fn get_user_id(&self) -> Result<String> {
        self.auth.get_user_id().await
    }

    /// The signed-in user's profile row.
    pub async fn get_profile(&self) -> Result<Profile> {
        let uid = self.get_user_id().await?;
        let mut rows: Vec<Profile> = self
            .postgrest
            .select(PROFILES, &[("id", eq(&uid)), ("select", "*".to_string())])
            .await?;
        rows.pop()
            .ok_or_else(|| anyhow!("No profile for user {}", uid))
    }

    /// Daily intake totals between `start` and `end`, inclusive, oldest first.
    pub async fn get_daily_summaries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyIntakeSummary>> {
        let uid = self.get_user_id().await?;
        self.postgrest
            .select(
                DAILY_SUMMARY,
                &[
                    ("user_id", eq(&uid)),
                    ("logged_at", gte(start.format("%Y-%m-%d"))),
                    ("logged_at", lte(end.format("%Y-%m-%d"))),
                    ("order", "logged_at.asc".to_string()),
                ],
            )
            .await
    }

    /// The newest `limit` check-ins, newest first.
    pub async fn get_recent_check_ins(&self, limit: usize) -> Result<Vec<CheckIn>> {
        let uid = self.get_user_id().await?;
        self.postgrest
            .select(
                CHECK_INS,
                &[
                    ("user_id", eq(&uid)),
                    ("order", "checked_in_at.desc".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await
    }

    /// Food log entries for one day, in the order they were created.
    pub async fn get_food_log(&self, date: NaiveDate) -> Result<Vec<FoodLogEntry>> {
        let uid = self.get_user_id().await?;
        self.postgrest
            .select(
                FOOD_LOG,
                &[
                    ("user_id", eq(&uid)),
                    ("logged_at", eq(date.format("%Y-%m-%d"))),
                    ("order", "created_at.asc".to_string()),
                ],
            )
            .await
    }

    /// Record a weigh-in and move the profile onto the targets it implies.
    ///
    /// Reads the intake window and recent check-ins, plans the check-in,
    /// inserts the row, then updates the profile's targets and current weight.
    /// Two concurrent check-ins for one user may blend from the same prior
    /// estimate. The two writes are not atomic: if the profile update fails,
    /// the check-in row is already stored and the profile keeps its old
    /// targets until [`NutritionClient::refresh_targets`] runs.
    pub async fn run_check_in(&self, request: CheckInRequest) -> Result<CheckInOutcome> {
        let uid = self.get_user_id().await?;
        let profile = self.get_profile().await?;

        let start = request.date - Duration::days(CHECK_IN_WINDOW_DAYS);
        let summaries = self.get_daily_summaries(start, request.date).await?;
        let history = self.get_recent_check_ins(RECENT_CHECK_INS).await?;

        let mut plan = plan_check_in(
            &request,
            &summaries,
            &history,
            &profile.goal(),
            profile.custom_tdee,
        );
        plan.row.user_id = Some(uid.clone());

        let check_in: CheckIn = self
            .postgrest
            .insert(CHECK_INS, &plan.row)
            .await
            .context("Failed to save check-in")?;

        self.save_targets(
            &uid,
            &TargetsUpdate::new(plan.targets).with_weight(request.weight_kg),
        )
        .await?;

        info!(
            check_in = %check_in.id,
            tdee = plan.estimate.tdee,
            calories = plan.targets.calories,
            "check-in saved"
        );
        Ok(CheckInOutcome { check_in, plan })
    }

    /// Store onboarding answers with the first set of targets.
    pub async fn onboard(&self, onboarding: &Onboarding) -> Result<Profile> {
        let uid = self.get_user_id().await?;
        let targets = onboarding_targets(onboarding);

        let patch = json!({
            "display_name": onboarding.display_name.as_deref().unwrap_or("User"),
            "height_cm": onboarding.height_cm,
            "current_weight_kg": onboarding.current_weight_kg,
            "goal_weight_kg": onboarding.goal_weight_kg,
            "body_fat_pct": onboarding.body_fat_pct,
            "activity_level": onboarding.activity_level,
            "goal_type": onboarding.goal_type,
            "goal_rate": onboarding.goal_rate,
            "custom_tdee": onboarding.custom_tdee,
            "calorie_target": targets.calories,
            "protein_target_g": targets.protein_g,
            "carb_target_g": targets.carbs_g,
            "fat_target_g": targets.fat_g,
            "onboarded": true,
        });

        let mut rows: Vec<Profile> = self
            .postgrest
            .update(PROFILES, &[("id", eq(&uid))], &patch)
            .await
            .context("Failed to save onboarding")?;
        info!(calories = targets.calories, "profile onboarded");
        rows.pop()
            .ok_or_else(|| anyhow!("No profile for user {}", uid))
    }

    /// Recompute targets from the stored profile, without a new check-in.
    ///
    /// Uses the latest check-in estimate when one exists, otherwise the
    /// custom or formula TDEE.
    pub async fn refresh_targets(&self) -> Result<MacroTargets> {
        let uid = self.get_user_id().await?;
        let profile = self.get_profile().await?;
        let latest = self.get_recent_check_ins(1).await?;

        let weight_kg = latest
            .first()
            .map(|c| c.weight_kg)
            .or(profile.current_weight_kg)
            .ok_or_else(|| anyhow!("Profile has no current weight"))?;

        let tdee = match (profile.custom_tdee, latest.first().and_then(|c| c.estimated_tdee)) {
            (Some(custom), _) => custom,
            (None, Some(estimated)) => estimated,
            (None, None) => {
                let body = body_profile(&profile)?.with_body_fat(profile.body_fat_pct);
                TdeeBasis::Formula(profile.activity_level).resolve(&body)
            }
        };

        let targets = macro_targets(tdee, &profile.goal(), weight_kg);
        if profile.targets() == Some(targets) {
            return Ok(targets);
        }
        self.save_targets(&uid, &TargetsUpdate::new(targets)).await?;
        Ok(targets)
    }

    async fn save_targets(&self, uid: &str, update: &TargetsUpdate) -> Result<()> {
        let rows: Vec<Profile> = self
            .postgrest
            .update(PROFILES, &[("id", eq(uid))], update)
            .await
            .context("Failed to update targets")?;
        if rows.is_empty() {
            warn!(user_id = uid, "target update matched no profile");
        }
        Ok(())
    }
}

/// First targets for a new profile, from a custom TDEE or the static formula.
pub fn onboarding_targets(onboarding: &Onboarding) -> MacroTargets {
    let body = BodyProfile::new(onboarding.current_weight_kg, onboarding.height_cm)
        .with_body_fat(onboarding.body_fat_pct);
    let tdee = TdeeBasis::from_profile(onboarding.custom_tdee, onboarding.activity_level)
        .resolve(&body);
    let goal = GoalSpec {
        goal_type: onboarding.goal_type,
        rate_kg_per_week: onboarding.goal_rate,
    };
    macro_targets(tdee, &goal, onboarding.current_weight_kg)
}

fn body_profile(profile: &Profile) -> Result<BodyProfile> {
    let weight = profile
        .current_weight_kg
        .ok_or_else(|| anyhow!("Profile has no current weight"))?;
    let height = profile
        .height_cm
        .ok_or_else(|| anyhow!("Profile has no height"))?;
    Ok(BodyProfile::new(weight, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn onboarding() -> Onboarding {
        Onboarding {
            display_name: Some("Sam".to_string()),
            height_cm: 170.0,
            current_weight_kg: 70.0,
            goal_weight_kg: Some(65.0),
            body_fat_pct: None,
            activity_level: ActivityLevel::Sedentary,
            goal_type: GoalType::Lose,
            goal_rate: -0.5,
            custom_tdee: None,
        }
    }

    #[test]
    fn onboarding_uses_static_tdee() {
        let targets = onboarding_targets(&onboarding());
        // 1971 - 550
        assert_eq!(targets.calories, 1421);
        assert_eq!(targets.protein_g, 140);
    }

    #[test]
    fn onboarding_prefers_custom_tdee() {
        let mut answers = onboarding();
        answers.custom_tdee = Some(2750);
        assert_eq!(onboarding_targets(&answers).calories, 2200);
    }

    #[test]
    fn body_profile_needs_measurements() {
        let profile: Profile = serde_json::from_value(json!({
            "id": "u1",
            "display_name": null,
            "height_cm": null,
            "current_weight_kg": 70.0,
            "goal_weight_kg": null,
            "body_fat_pct": null,
            "activity_level": "light",
            "goal_type": "maintain",
            "calorie_target": null,
            "protein_target_g": null,
            "carb_target_g": null,
            "fat_target_g": null,
            "custom_tdee": null
        }))
        .unwrap();

        let err = body_profile(&profile).unwrap_err();
        assert!(err.to_string().contains("height"));
    }

    #[test]
    fn client_from_config() {
        let config = Config::new("https://demo.supabase.co/", "anon", "jwt");
        let client = NutritionClient::new(&config);
        assert_eq!(
            client.postgrest.table_url(PROFILES),
            "https://demo.supabase.co/rest/v1/profiles"
        );
    }
}
