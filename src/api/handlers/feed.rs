use axum::{extract::{State, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::responses::{FeedItemResponse, FeedResponse};
use crate::domain::services::feed::{EventTypeFilter, FeedQuery};
use crate::error::AppError;
use std::sync::Arc;
use std::collections::HashMap;
use chrono::NaiveDate;

/// Query parsing is deliberately forgiving: a malformed date or flag falls
/// back to its default instead of erroring, so the feed always renders.
fn parse_feed_query(params: &HashMap<String, String>) -> FeedQuery {
    FeedQuery {
        from: params.get("from").and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok()),
        to: params.get("to").and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok()),
        search: params
            .get("search")
            .or_else(|| params.get("title"))
            .filter(|v| !v.is_empty())
            .cloned(),
        category_ids: params
            .get("categories")
            .map(|v| v.split(',').filter(|s| !s.is_empty()).map(str::to_string).collect())
            .unwrap_or_default(),
        event_type: params.get("eventType").and_then(|v| EventTypeFilter::parse(v)),
        all_day: params.get("allDay").and_then(|v| match v.as_str() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        }),
        date: params.get("date").and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok()),
        offset: params.get("start").and_then(|v| v.parse().ok()).unwrap_or(0),
    }
}

pub async fn get_feed(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let query = parse_feed_query(&params);
    let page = state.feed_service.feed(&query).await?;

    Ok(Json(FeedResponse {
        items: page.items.iter().map(FeedItemResponse::from).collect(),
        total: page.total,
        start: page.offset,
        page_size: page.page_size,
    }))
}

/// Whole-window feed for the client calendar widget: a bare array, no
/// server-side pagination.
pub async fn get_calendar(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let query = parse_feed_query(&params);
    let entries = state.feed_service.entries(&query).await?;

    let items: Vec<FeedItemResponse> = entries.iter().map(FeedItemResponse::from).collect();
    Ok(Json(items))
}
