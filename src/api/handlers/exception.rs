use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::ExceptionRequest;
use crate::domain::models::exception::{EventException, ACTION_DELETED, ACTION_MODIFIED};
use crate::error::AppError;
use std::sync::Arc;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

pub async fn upsert_exception(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(payload): Json<ExceptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let entity = match payload.action.as_str() {
        ACTION_DELETED => EventException::deletion(event.id.clone(), payload.date, payload.reason),
        ACTION_MODIFIED => EventException {
            id: Uuid::new_v4().to_string(),
            event_id: event.id.clone(),
            instance_date: payload.date,
            action: ACTION_MODIFIED.to_string(),
            title: payload.title,
            body: payload.body,
            start_date: payload.start_date,
            end_date: payload.end_date,
            start_time: payload.start_time,
            end_time: payload.end_time,
            all_day: payload.all_day,
            reason: payload.reason,
            created_at: chrono::Utc::now(),
        },
        _ => return Err(AppError::Validation("Action must be MODIFIED or DELETED".into())),
    };

    if entity.action == ACTION_MODIFIED && !entity.has_overrides() {
        return Err(AppError::Validation("A MODIFIED exception needs at least one override field".into()));
    }

    let saved = state.exception_repo.upsert(&entity).await?;

    // Exception rows don't touch the event, so the cache key stays the
    // same; clear the reachable entries explicitly.
    state.occurrence_cache.invalidate(&event.id).await;
    info!("Upserted {} exception for event {} on {}", saved.action, slug, saved.instance_date);
    Ok(Json(saved))
}

pub async fn delete_exception(
    State(state): State<Arc<AppState>>,
    Path((slug, date_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date".into()))?;

    state.exception_repo.delete(&event.id, date).await?;
    state.occurrence_cache.invalidate(&event.id).await;
    info!("Deleted exception for event {} on {}", slug, date_str);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

pub async fn list_exceptions(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let start = params.get("start").and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok());
    let end = params.get("end").and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok());

    let exceptions = match (start, end) {
        (Some(start), Some(end)) => state.exception_repo.list_by_range(&event.id, start, end).await?,
        _ => state.exception_repo.list_by_event(&event.id).await?,
    };
    Ok(Json(exceptions))
}
