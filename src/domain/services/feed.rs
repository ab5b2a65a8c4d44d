use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sha2::{Digest, Sha256};
use tracing::error;

use crate::config::Config;
use crate::domain::models::event::Event;
use crate::domain::models::exception::EventException;
use crate::domain::models::occurrence::Occurrence;
use crate::domain::models::recurrence::RecurrenceRule;
use crate::domain::ports::{CategoryRepository, EventRepository, ExceptionRepository, OccurrenceCache};
use crate::domain::services::expansion::build_occurrence;
use crate::domain::services::period;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTypeFilter {
    OneTime,
    Recurring,
}

impl EventTypeFilter {
    /// Lenient: unknown values mean "no filter".
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "one-time" | "onetime" => Some(EventTypeFilter::OneTime),
            "recurring" => Some(EventTypeFilter::Recurring),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct FeedQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub search: Option<String>,
    pub category_ids: Vec<String>,
    pub event_type: Option<EventTypeFilter>,
    pub all_day: Option<bool>,
    pub date: Option<NaiveDate>,
    pub offset: usize,
}

#[derive(Debug)]
pub struct FeedPage {
    pub items: Vec<Occurrence>,
    pub total: usize,
    pub offset: usize,
    pub page_size: usize,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
}

/// Cache key for one event's occurrence set over one window. The event's
/// last-modified timestamp and recurrence fields are part of the digest, so
/// any edit changes the key and stale entries simply stop being read.
pub fn occurrence_cache_key(event: &Event, window_start: NaiveDate, window_end: NaiveDate) -> String {
    let mut hasher = Sha256::new();
    hasher.update(event.id.as_bytes());
    hasher.update(window_start.to_string().as_bytes());
    hasher.update(window_end.to_string().as_bytes());
    hasher.update(event.updated_at.timestamp_micros().to_le_bytes());
    hasher.update(event.frequency.as_bytes());
    hasher.update(event.repeat_interval.to_le_bytes());
    if let Some(until) = event.repeat_until {
        hasher.update(until.to_string().as_bytes());
    }
    let digest = hex::encode(hasher.finalize());
    format!("occ:{}:{}", event.id, &digest[..16])
}

/// Merges recurring-event occurrences and one-off events into a single
/// filtered, sorted, paginated feed.
pub struct FeedService {
    event_repo: Arc<dyn EventRepository>,
    exception_repo: Arc<dyn ExceptionRepository>,
    category_repo: Arc<dyn CategoryRepository>,
    cache: Arc<dyn OccurrenceCache>,
    page_size: usize,
    window_months: u32,
}

impl FeedService {
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        exception_repo: Arc<dyn ExceptionRepository>,
        category_repo: Arc<dyn CategoryRepository>,
        cache: Arc<dyn OccurrenceCache>,
        config: &Config,
    ) -> Self {
        Self {
            event_repo,
            exception_repo,
            category_repo,
            cache,
            page_size: config.page_size,
            window_months: config.feed_window_months,
        }
    }

    /// Window defaults: start = today, end = start + configured months.
    /// An inverted range falls back to the default end rather than erroring.
    pub fn resolve_window(&self, query: &FeedQuery) -> (NaiveDate, NaiveDate) {
        let start = query.from.unwrap_or_else(|| Utc::now().date_naive());
        let mut end = query
            .to
            .unwrap_or_else(|| period::add_months(start, self.window_months));
        if end < start {
            end = period::add_months(start, self.window_months);
        }
        (start, end)
    }

    /// The full filtered, sorted entry list for the resolved window.
    /// Used directly by the calendar-widget endpoint, which renders the
    /// whole window client-side and does its own paging.
    pub async fn entries(&self, query: &FeedQuery) -> Result<Vec<Occurrence>, AppError> {
        let (start, end) = self.resolve_window(query);
        self.entries_in(start, end, query).await
    }

    async fn entries_in(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        query: &FeedQuery,
    ) -> Result<Vec<Occurrence>, AppError> {
        let merged = self.collect(start, end).await?;
        let mut filtered = self.apply_filters(merged, query);

        filtered.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then(a.start_time.cmp(&b.start_time))
                .then(a.title.cmp(&b.title))
        });
        Ok(filtered)
    }

    pub async fn feed(&self, query: &FeedQuery) -> Result<FeedPage, AppError> {
        let (start, end) = self.resolve_window(query);
        let entries = self.entries_in(start, end, query).await?;

        let total = entries.len();
        let items: Vec<Occurrence> = entries
            .into_iter()
            .skip(query.offset)
            .take(self.page_size)
            .collect();

        Ok(FeedPage {
            items,
            total,
            offset: query.offset,
            page_size: self.page_size,
            window_start: start,
            window_end: end,
        })
    }

    /// Every live occurrence and one-off event in the window, categories
    /// attached, deleted instances already dropped. Unfiltered and unsorted.
    async fn collect(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Occurrence>, AppError> {
        let events = self.event_repo.list().await?;
        let event_ids: Vec<String> = events.iter().map(|e| e.id.clone()).collect();
        let categories = self.category_repo.ids_by_event(&event_ids).await?;

        let mut request_memo: HashMap<String, Arc<Vec<Occurrence>>> = HashMap::new();
        let mut merged: Vec<Occurrence> = Vec::new();

        for event in &events {
            if RecurrenceRule::from_event(event).recurs() {
                // One malformed event must not take the whole feed down.
                let expanded = match self.expanded(event, start, end, &mut request_memo).await {
                    Ok(occurrences) => occurrences,
                    Err(e) => {
                        error!("Skipping occurrences for event {}: {:?}", event.slug, e);
                        continue;
                    }
                };
                merged.extend(expanded.iter().filter(|o| !o.is_deleted).cloned());
            } else if event.start_date <= end && event.effective_end_date() >= start {
                merged.push(build_occurrence(event, event.start_date, None));
            }
        }

        for occurrence in &mut merged {
            if let Some(ids) = categories.get(&occurrence.event_id) {
                occurrence.category_ids = ids.clone();
            }
        }

        Ok(merged)
    }

    fn apply_filters(&self, occurrences: Vec<Occurrence>, query: &FeedQuery) -> Vec<Occurrence> {
        occurrences
            .into_iter()
            .filter(|o| match &query.search {
                Some(needle) => o.title.to_lowercase().contains(&needle.to_lowercase()),
                None => true,
            })
            .filter(|o| {
                query.category_ids.is_empty()
                    || query.category_ids.iter().any(|c| o.category_ids.contains(c))
            })
            .filter(|o| match query.event_type {
                Some(EventTypeFilter::OneTime) => !o.is_recurring,
                Some(EventTypeFilter::Recurring) => o.is_recurring,
                None => true,
            })
            .filter(|o| match query.all_day {
                Some(flag) => o.all_day == flag,
                None => true,
            })
            .filter(|o| match query.date {
                Some(day) => o.start_date <= day && o.end_date >= day,
                None => true,
            })
            .collect()
    }

    /// Full occurrence set for one event, deleted instances included. Used
    /// by the editor-facing listing, which shows deletions rather than
    /// hiding them.
    pub async fn occurrences_for_event(
        &self,
        event: &Event,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Result<Arc<Vec<Occurrence>>, AppError> {
        let mut memo = HashMap::new();
        self.expanded(event, window_start, window_end, &mut memo).await
    }

    /// Cache lookup order: request memo, shared tier, then a fresh
    /// expansion which is written back fire-and-forget.
    async fn expanded(
        &self,
        event: &Event,
        window_start: NaiveDate,
        window_end: NaiveDate,
        request_memo: &mut HashMap<String, Arc<Vec<Occurrence>>>,
    ) -> Result<Arc<Vec<Occurrence>>, AppError> {
        let key = occurrence_cache_key(event, window_start, window_end);
        if let Some(hit) = request_memo.get(&key) {
            return Ok(hit.clone());
        }
        if let Some(hit) = self.cache.get(&key).await {
            request_memo.insert(key, hit.clone());
            return Ok(hit);
        }

        let exceptions = self
            .exception_repo
            .list_by_range(&event.id, window_start, window_end)
            .await?;
        let by_date: HashMap<NaiveDate, EventException> = exceptions
            .into_iter()
            .map(|e| (e.instance_date, e))
            .collect();

        let occurrences: Vec<Occurrence> = period::generate(event, window_start, window_end, None)
            .map(|d| build_occurrence(event, d, by_date.get(&d)))
            .collect();

        let shared = Arc::new(occurrences);
        self.cache.put(&event.id, &key, shared.clone()).await;
        request_memo.insert(key, shared.clone());
        Ok(shared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event() -> Event {
        Event {
            id: "e1".to_string(),
            slug: "standup".to_string(),
            title: "Standup".to_string(),
            body: String::new(),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 16).unwrap(),
            start_time: None,
            end_date: None,
            end_time: None,
            all_day: false,
            frequency: "WEEKLY".to_string(),
            repeat_interval: 1,
            repeat_until: None,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_cache_key_is_stable_for_unchanged_event() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        assert_eq!(
            occurrence_cache_key(&event(), start, end),
            occurrence_cache_key(&event(), start, end)
        );
    }

    #[test]
    fn test_cache_key_changes_on_edit_and_window() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let base = occurrence_cache_key(&event(), start, end);

        let mut touched = event();
        touched.updated_at = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        assert_ne!(base, occurrence_cache_key(&touched, start, end));

        let mut rule_changed = event();
        rule_changed.repeat_interval = 2;
        assert_ne!(base, occurrence_cache_key(&rule_changed, start, end));

        let wider = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        assert_ne!(base, occurrence_cache_key(&event(), start, wider));
    }

    #[test]
    fn test_cache_key_has_readable_prefix() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let key = occurrence_cache_key(&event(), start, end);
        assert!(key.starts_with("occ:e1:"));
        assert_eq!(key.len(), "occ:e1:".len() + 16);
    }

    #[test]
    fn test_event_type_filter_parse() {
        assert_eq!(EventTypeFilter::parse("one-time"), Some(EventTypeFilter::OneTime));
        assert_eq!(EventTypeFilter::parse("Recurring"), Some(EventTypeFilter::Recurring));
        assert_eq!(EventTypeFilter::parse("whatever"), None);
    }
}
