use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub body: String,
    pub start_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,
    pub all_day: bool,
    pub frequency: String,
    pub repeat_interval: i32,
    pub repeat_until: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// End date falls back to the start date when unset.
    pub fn effective_end_date(&self) -> NaiveDate {
        self.end_date.unwrap_or(self.start_date)
    }

    /// Multi-day span in days; zero for single-day events.
    pub fn duration_days(&self) -> i64 {
        (self.effective_end_date() - self.start_date).num_days().max(0)
    }
}
