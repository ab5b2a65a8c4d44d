use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub start_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub all_day: bool,
    pub frequency: Option<String>,
    pub repeat_interval: Option<i32>,
    pub repeat_until: Option<NaiveDate>,
    pub categories: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,
    pub all_day: Option<bool>,
    pub frequency: Option<String>,
    pub repeat_interval: Option<i32>,
    pub repeat_until: Option<NaiveDate>,
    pub categories: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct ExceptionRequest {
    pub date: NaiveDate,
    pub action: String,
    pub title: Option<String>,
    pub body: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub all_day: Option<bool>,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: String,
}
