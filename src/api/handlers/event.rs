use axum::{extract::{State, Path, Query}, http::header, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{CreateEventRequest, UpdateEventRequest},
    responses::OccurrenceResponse,
};
use crate::domain::models::event::Event;
use crate::domain::services::calendar::generate_ics;
use crate::domain::services::expansion::build_occurrence;
use crate::domain::services::feed::FeedQuery;
use crate::domain::services::period;
use crate::error::AppError;
use std::sync::Arc;
use uuid::Uuid;
use chrono::{NaiveDate, Utc};
use tracing::info;
use std::collections::HashMap;

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("Creating event: {}", payload.slug);

    if payload.slug.trim().is_empty() {
        return Err(AppError::Validation("Slug must not be empty".into()));
    }
    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("Title must not be empty".into()));
    }
    if let Some(end) = payload.end_date {
        if end < payload.start_date {
            return Err(AppError::Validation("End date must not be before start date".into()));
        }
    }

    let now = Utc::now();
    let event = Event {
        id: Uuid::new_v4().to_string(),
        slug: payload.slug,
        title: payload.title,
        body: payload.body,
        start_date: payload.start_date,
        start_time: payload.start_time,
        end_date: payload.end_date,
        end_time: payload.end_time,
        all_day: payload.all_day,
        // Recurrence fields are stored as supplied and normalized on read;
        // a malformed rule reads as non-recurring instead of erroring.
        frequency: payload.frequency.unwrap_or_else(|| "NONE".to_string()),
        repeat_interval: payload.repeat_interval.unwrap_or(1),
        repeat_until: payload.repeat_until,
        created_at: now,
        updated_at: now,
    };

    let created = state.event_repo.create(&event).await?;

    if let Some(category_ids) = payload.categories {
        state.category_repo.set_for_event(&created.id, &category_ids).await?;
    }

    Ok(Json(created))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list().await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_slug(&slug).await?
        .ok_or_else(|| AppError::NotFound(format!("Event '{}' not found", slug)))?;

    let categories = state.category_repo.list_for_event(&event.id).await?;

    let mut event_json = serde_json::to_value(&event).map_err(|_| AppError::Internal)?;
    event_json["categories"] = serde_json::to_value(&categories).map_err(|_| AppError::Internal)?;

    Ok(Json(event_json))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = state.event_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if let Some(val) = payload.slug { event.slug = val; }
    if let Some(val) = payload.title { event.title = val; }
    if let Some(val) = payload.body { event.body = val; }
    if let Some(val) = payload.start_date { event.start_date = val; }
    if let Some(val) = payload.start_time { event.start_time = Some(val); }
    if let Some(val) = payload.end_date { event.end_date = Some(val); }
    if let Some(val) = payload.end_time { event.end_time = Some(val); }
    if let Some(val) = payload.all_day { event.all_day = val; }
    if let Some(val) = payload.frequency { event.frequency = val; }
    if let Some(val) = payload.repeat_interval { event.repeat_interval = val; }
    if let Some(val) = payload.repeat_until { event.repeat_until = Some(val); }

    if event.effective_end_date() < event.start_date {
        return Err(AppError::Validation("End date must not be before start date".into()));
    }

    // The bumped timestamp changes every occurrence cache key for this
    // event; invalidate additionally clears what is still reachable.
    event.updated_at = Utc::now();
    let updated = state.event_repo.update(&event).await?;

    if let Some(category_ids) = payload.categories {
        state.category_repo.set_for_event(&updated.id, &category_ids).await?;
    }

    state.occurrence_cache.invalidate(&updated.id).await;
    info!("Event updated: {}", slug);
    Ok(Json(updated))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    state.event_repo.delete(&event.id).await?;
    state.occurrence_cache.invalidate(&event.id).await;
    info!("Event deleted: {}", slug);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

/// Editor-facing listing of every instance in the window, deletions and
/// modifications flagged rather than hidden.
pub async fn list_occurrences(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let query = FeedQuery {
        from: params.get("from").and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok()),
        to: params.get("to").and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok()),
        ..FeedQuery::default()
    };
    let (start, end) = state.feed_service.resolve_window(&query);

    let occurrences = state.feed_service.occurrences_for_event(&event, start, end).await?;
    let items: Vec<OccurrenceResponse> = occurrences.iter().map(OccurrenceResponse::from).collect();
    Ok(Json(items))
}

pub async fn get_occurrence_ics(
    State(state): State<Arc<AppState>>,
    Path((slug, date_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date".into()))?;

    // The date must actually be an instance of this event's rule.
    let is_instance = period::generate(&event, date, date, Some(1)).next() == Some(date);
    if !is_instance {
        return Err(AppError::NotFound("Occurrence not found".into()));
    }

    let exception = state.exception_repo.find_by_event_and_date(&event.id, date).await?;
    let occurrence = build_occurrence(&event, date, exception.as_ref());
    if occurrence.is_deleted {
        return Err(AppError::NotFound("Occurrence not found".into()));
    }

    let ics = generate_ics(&occurrence);
    Ok(([(header::CONTENT_TYPE, "text/calendar; charset=utf-8")], ics))
}
