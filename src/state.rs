use std::sync::Arc;
use crate::domain::ports::{
    CategoryRepository, EventRepository, ExceptionRepository, OccurrenceCache,
};
use crate::domain::services::feed::FeedService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub event_repo: Arc<dyn EventRepository>,
    pub exception_repo: Arc<dyn ExceptionRepository>,
    pub category_repo: Arc<dyn CategoryRepository>,
    pub occurrence_cache: Arc<dyn OccurrenceCache>,
    pub feed_service: Arc<FeedService>,
}
