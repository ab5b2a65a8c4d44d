use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub const ACTION_MODIFIED: &str = "MODIFIED";
pub const ACTION_DELETED: &str = "DELETED";

/// The fields an exception may override on its occurrence. Validation and
/// the occurrence resolver both consult this list, so making another field
/// overridable is a data change here plus one resolver arm.
pub const OVERRIDABLE_FIELDS: &[&str] = &[
    "title",
    "body",
    "start_date",
    "end_date",
    "start_time",
    "end_time",
    "all_day",
];

/// Per-date override or deletion layered on top of an event's recurrence.
/// At most one exception exists per (event, instance date); writes replace.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct EventException {
    pub id: String,
    pub event_id: String,
    pub instance_date: NaiveDate,
    pub action: String,
    pub title: Option<String>,
    pub body: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub all_day: Option<bool>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl EventException {
    pub fn deletion(event_id: String, instance_date: NaiveDate, reason: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            instance_date,
            action: ACTION_DELETED.to_string(),
            title: None,
            body: None,
            start_date: None,
            end_date: None,
            start_time: None,
            end_time: None,
            all_day: None,
            reason,
            created_at: Utc::now(),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.action == ACTION_DELETED
    }

    /// A set override is a non-null field; empty strings don't count.
    pub fn field_is_set(&self, field: &str) -> bool {
        match field {
            "title" => self.title.as_deref().is_some_and(|v| !v.is_empty()),
            "body" => self.body.as_deref().is_some_and(|v| !v.is_empty()),
            "start_date" => self.start_date.is_some(),
            "end_date" => self.end_date.is_some(),
            "start_time" => self.start_time.is_some(),
            "end_time" => self.end_time.is_some(),
            "all_day" => self.all_day.is_some(),
            _ => false,
        }
    }

    pub fn has_overrides(&self) -> bool {
        OVERRIDABLE_FIELDS.iter().any(|f| self.field_is_set(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_exception(action: &str) -> EventException {
        EventException {
            id: "x1".to_string(),
            event_id: "e1".to_string(),
            instance_date: NaiveDate::from_ymd_opt(2025, 6, 23).unwrap(),
            action: action.to_string(),
            title: None,
            body: None,
            start_date: None,
            end_date: None,
            start_time: None,
            end_time: None,
            all_day: None,
            reason: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_title_does_not_count_as_override() {
        let mut ex = bare_exception(ACTION_MODIFIED);
        ex.title = Some(String::new());
        assert!(!ex.has_overrides());

        ex.title = Some("Moved session".to_string());
        assert!(ex.has_overrides());
    }

    #[test]
    fn test_all_day_flag_counts_as_override() {
        let mut ex = bare_exception(ACTION_MODIFIED);
        ex.all_day = Some(true);
        assert!(ex.has_overrides());
        assert!(ex.field_is_set("all_day"));
    }

    #[test]
    fn test_deletion_constructor() {
        let ex = EventException::deletion(
            "e1".to_string(),
            NaiveDate::from_ymd_opt(2025, 6, 23).unwrap(),
            Some("holiday".to_string()),
        );
        assert!(ex.is_deleted());
        assert!(!ex.has_overrides());
    }
}
