use serde::Serialize;
use chrono::{NaiveDate, NaiveTime};

/// One concrete date-instance of an event, materialized on demand.
///
/// Occurrences are never persisted; they are built per feed request (or
/// served from cache) and discarded once the response is assembled. The
/// virtual id is derived from (event id, instance date) so it is stable
/// across requests and can never collide with a stored uuid.
#[derive(Debug, Serialize, Clone)]
pub struct Occurrence {
    pub event_id: String,
    pub event_slug: String,
    pub virtual_id: String,
    pub instance_date: NaiveDate,
    pub title: String,
    pub body: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub all_day: bool,
    pub is_recurring: bool,
    pub is_modified: bool,
    pub is_deleted: bool,
    pub category_ids: Vec<String>,
}

impl Occurrence {
    pub fn virtual_id_for(event_id: &str, instance_date: NaiveDate) -> String {
        format!("{}@{}", event_id, instance_date)
    }
}

impl PartialEq for Occurrence {
    fn eq(&self, other: &Self) -> bool {
        self.event_id == other.event_id && self.instance_date == other.instance_date
    }
}

impl Eq for Occurrence {}
