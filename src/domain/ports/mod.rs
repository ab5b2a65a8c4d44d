use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::models::{
    category::Category, event::Event, exception::EventException, occurrence::Occurrence,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError>;
    async fn list(&self) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ExceptionRepository: Send + Sync {
    async fn upsert(&self, exception: &EventException) -> Result<EventException, AppError>;
    async fn find_by_event_and_date(&self, event_id: &str, date: NaiveDate) -> Result<Option<EventException>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<EventException>, AppError>;
    async fn list_by_range(&self, event_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<EventException>, AppError>;
    async fn delete(&self, event_id: &str, date: NaiveDate) -> Result<(), AppError>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: &Category) -> Result<Category, AppError>;
    async fn list(&self) -> Result<Vec<Category>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn set_for_event(&self, event_id: &str, category_ids: &[String]) -> Result<(), AppError>;
    async fn list_for_event(&self, event_id: &str) -> Result<Vec<Category>, AppError>;
    async fn ids_by_event(&self, event_ids: &[String]) -> Result<HashMap<String, Vec<String>>, AppError>;
}

/// Shared occurrence cache. Keys embed the event's last-modified timestamp
/// and recurrence fields, so event edits make stale entries unreachable
/// without an explicit purge; they age out via TTL. `invalidate` is the
/// best-effort removal used when an exception changes (exception writes do
/// not touch the event row, so the key alone would not change).
#[async_trait]
pub trait OccurrenceCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<Arc<Vec<Occurrence>>>;
    async fn put(&self, event_id: &str, key: &str, occurrences: Arc<Vec<Occurrence>>);
    async fn invalidate(&self, event_id: &str);
}
