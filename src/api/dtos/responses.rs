use serde::Serialize;

use crate::domain::models::occurrence::Occurrence;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItemResponse {
    pub id: String,
    pub title: String,
    pub start: String,
    pub start_time: Option<String>,
    pub end: String,
    pub end_time: Option<String>,
    pub all_day: bool,
    pub url: String,
    pub categories: Vec<String>,
    pub is_recurring: bool,
}

impl From<&Occurrence> for FeedItemResponse {
    fn from(occurrence: &Occurrence) -> Self {
        Self {
            id: occurrence.virtual_id.clone(),
            title: occurrence.title.clone(),
            start: occurrence.start_date.to_string(),
            start_time: occurrence.start_time.map(|t| t.format("%H:%M").to_string()),
            end: occurrence.end_date.to_string(),
            end_time: occurrence.end_time.map(|t| t.format("%H:%M").to_string()),
            all_day: occurrence.all_day,
            url: format!("/events/{}?date={}", occurrence.event_slug, occurrence.instance_date),
            categories: occurrence.category_ids.clone(),
            is_recurring: occurrence.is_recurring,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub items: Vec<FeedItemResponse>,
    pub total: usize,
    pub start: usize,
    pub page_size: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceResponse {
    pub title: String,
    pub date: String,
    pub time: String,
    pub is_modified: bool,
    pub is_deleted: bool,
    pub link: String,
}

impl From<&Occurrence> for OccurrenceResponse {
    fn from(occurrence: &Occurrence) -> Self {
        Self {
            title: occurrence.title.clone(),
            // "Jun 16, 2025" / "9:30 AM" to match the editor widget.
            date: occurrence.start_date.format("%b %-d, %Y").to_string(),
            time: occurrence
                .start_time
                .map(|t| t.format("%-I:%M %p").to_string())
                .unwrap_or_default(),
            is_modified: occurrence.is_modified,
            is_deleted: occurrence.is_deleted,
            link: format!("/events/{}?date={}", occurrence.event_slug, occurrence.instance_date),
        }
    }
}
