mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;

fn starts(items: &serde_json::Value) -> Vec<String> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["start"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_weekly_expansion_grid() {
    let app = TestApp::new().await;

    let res = app.post_json("/api/v1/events", &json!({
        "slug": "standup",
        "title": "Weekly Standup",
        "start_date": "2025-06-16",
        "frequency": "WEEKLY"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.get("/api/v1/calendar?from=2025-06-16&to=2025-07-14").await;
    let items = parse_body(res).await;

    assert_eq!(
        starts(&items),
        vec!["2025-06-16", "2025-06-23", "2025-06-30", "2025-07-07", "2025-07-14"]
    );
}

#[tokio::test]
async fn test_monthly_expansion_grid() {
    let app = TestApp::new().await;

    app.post_json("/api/v1/events", &json!({
        "slug": "review",
        "title": "Monthly Review",
        "start_date": "2025-06-15",
        "frequency": "MONTHLY"
    })).await;

    let res = app.get("/api/v1/calendar?from=2025-06-15&to=2025-11-15").await;
    let items = parse_body(res).await;

    assert_eq!(
        starts(&items),
        vec!["2025-06-15", "2025-07-15", "2025-08-15", "2025-09-15", "2025-10-15", "2025-11-15"]
    );
}

#[tokio::test]
async fn test_month_end_clamps_to_last_valid_day() {
    let app = TestApp::new().await;

    app.post_json("/api/v1/events", &json!({
        "slug": "payday",
        "title": "Payday",
        "start_date": "2025-01-31",
        "frequency": "MONTHLY"
    })).await;

    let res = app.get("/api/v1/calendar?from=2025-01-01&to=2025-04-30").await;
    let items = parse_body(res).await;

    // No rollover into March; February clamps, March recovers the 31st.
    assert_eq!(
        starts(&items),
        vec!["2025-01-31", "2025-02-28", "2025-03-31", "2025-04-30"]
    );
}

#[tokio::test]
async fn test_biweekly_phase_is_anchored_to_event_start() {
    let app = TestApp::new().await;

    app.post_json("/api/v1/events", &json!({
        "slug": "sync",
        "title": "Biweekly Sync",
        "start_date": "2025-06-02",
        "frequency": "WEEKLY",
        "repeat_interval": 2
    })).await;

    // July-only window: the alternating weeks must not reset at the edge.
    let res = app.get("/api/v1/calendar?from=2025-07-01&to=2025-07-31").await;
    let items = parse_body(res).await;

    assert_eq!(starts(&items), vec!["2025-07-14", "2025-07-28"]);
}

#[tokio::test]
async fn test_repeat_until_bounds_expansion() {
    let app = TestApp::new().await;

    app.post_json("/api/v1/events", &json!({
        "slug": "course",
        "title": "Course",
        "start_date": "2025-06-16",
        "frequency": "WEEKLY",
        "repeat_until": "2025-06-30"
    })).await;

    let res = app.get("/api/v1/calendar?from=2025-06-01&to=2025-12-31").await;
    let items = parse_body(res).await;

    assert_eq!(starts(&items), vec!["2025-06-16", "2025-06-23", "2025-06-30"]);
}

#[tokio::test]
async fn test_open_ended_rule_is_capped_at_two_years() {
    let app = TestApp::new().await;

    app.post_json("/api/v1/events", &json!({
        "slug": "jog",
        "title": "Morning Jog",
        "start_date": "2025-01-06",
        "frequency": "WEEKLY"
    })).await;

    let res = app.get("/api/v1/calendar?from=2025-01-01&to=2030-01-01").await;
    let items = parse_body(res).await;
    let dates = starts(&items);

    assert!(!dates.is_empty());
    // Horizon is window start + 2 years, well before the requested end.
    assert!(dates.last().unwrap().as_str() < "2027-01-03");
}

#[tokio::test]
async fn test_invalid_interval_silently_floors_to_one() {
    let app = TestApp::new().await;

    let res = app.post_json("/api/v1/events", &json!({
        "slug": "loose",
        "title": "Loose Rule",
        "start_date": "2025-06-16",
        "frequency": "WEEKLY",
        "repeat_interval": 0
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.get("/api/v1/calendar?from=2025-06-16&to=2025-06-30").await;
    let items = parse_body(res).await;

    assert_eq!(starts(&items), vec!["2025-06-16", "2025-06-23", "2025-06-30"]);
}

#[tokio::test]
async fn test_unknown_frequency_reads_as_one_time() {
    let app = TestApp::new().await;

    let res = app.post_json("/api/v1/events", &json!({
        "slug": "odd",
        "title": "Odd Frequency",
        "start_date": "2025-06-16",
        "frequency": "FORTNIGHTLY"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.get("/api/v1/calendar?from=2025-06-01&to=2025-08-31").await;
    let items = parse_body(res).await;

    assert_eq!(starts(&items), vec!["2025-06-16"]);
    assert_eq!(items[0]["isRecurring"], false);
}

#[tokio::test]
async fn test_multi_day_duration_preserved_on_every_instance() {
    let app = TestApp::new().await;

    app.post_json("/api/v1/events", &json!({
        "slug": "retreat",
        "title": "Retreat",
        "start_date": "2025-06-16",
        "end_date": "2025-06-18",
        "frequency": "WEEKLY"
    })).await;

    let res = app.get("/api/v1/calendar?from=2025-06-16&to=2025-07-14").await;
    let items = parse_body(res).await;

    for item in items.as_array().unwrap() {
        let start = item["start"].as_str().unwrap();
        let end = item["end"].as_str().unwrap();
        let start = chrono::NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
        let end = chrono::NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap();
        assert_eq!((end - start).num_days(), 2);
    }
}
