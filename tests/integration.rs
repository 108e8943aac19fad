use adaptive_macros::client::NutritionClient;
use adaptive_macros::summary::summarize_days;
use chrono::{Duration, Local};

fn authenticated_client() -> Option<NutritionClient> {
    dotenvy::dotenv().ok();
    NutritionClient::from_env().ok()
}

#[tokio::test]
async fn reads_profile_for_session_user() {
    let Some(client) = authenticated_client() else {
        eprintln!("skipping reads_profile_for_session_user: no credentials");
        return;
    };

    let uid = client.get_user_id().await.unwrap();
    let profile = client.get_profile().await.unwrap();
    assert_eq!(profile.id, uid);
}

#[tokio::test]
async fn daily_summaries_stay_in_range() {
    let Some(client) = authenticated_client() else {
        eprintln!("skipping daily_summaries_stay_in_range: no credentials");
        return;
    };

    let end = Local::now().date_naive();
    let start = end - Duration::days(14);
    let summaries = client.get_daily_summaries(start, end).await.unwrap();

    assert!(summaries.iter().all(|s| s.date >= start && s.date <= end));
    assert!(summaries.windows(2).all(|w| w[0].date <= w[1].date));
    assert!(summaries.iter().all(|s| s.total_calories >= 0.0));
}

#[tokio::test]
async fn food_log_matches_daily_summary() {
    let Some(client) = authenticated_client() else {
        eprintln!("skipping food_log_matches_daily_summary: no credentials");
        return;
    };

    let today = Local::now().date_naive();
    let entries = client.get_food_log(today).await.unwrap();
    let Some(ours) = summarize_days(&entries).pop() else {
        eprintln!("skipping food_log_matches_daily_summary: nothing logged today");
        return;
    };

    let stored = client.get_daily_summaries(today, today).await.unwrap();
    let theirs = stored.first().expect("daily summary for a day with entries");
    assert!(
        (ours.total_calories - theirs.total_calories).abs() < 1.0,
        "calories should match: ours {:.1}, stored {:.1}",
        ours.total_calories,
        theirs.total_calories
    );
}

#[tokio::test]
async fn recent_check_ins_are_newest_first() {
    let Some(client) = authenticated_client() else {
        eprintln!("skipping recent_check_ins_are_newest_first: no credentials");
        return;
    };

    let check_ins = client.get_recent_check_ins(4).await.unwrap();
    assert!(check_ins.len() <= 4);
    assert!(check_ins
        .windows(2)
        .all(|w| w[0].checked_in_at >= w[1].checked_in_at));
}
