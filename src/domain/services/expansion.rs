use chrono::{Duration, NaiveDate};

use crate::domain::models::event::Event;
use crate::domain::models::exception::EventException;
use crate::domain::models::occurrence::Occurrence;
use crate::domain::models::recurrence::RecurrenceRule;

/// Builds the fully-resolved occurrence for one candidate date.
///
/// Field precedence is fixed: exception override, then computed virtual
/// value, then the value inherited from the event. The start date is the
/// candidate itself and the end date shifts by the event's original day
/// span, so multi-day events keep a constant length on every instance.
/// Times never shift across instances unless an exception overrides them.
///
/// A DELETED exception still produces an occurrence, flagged `is_deleted`;
/// filtering is the feed's responsibility, which keeps this a pure mapping.
pub fn build_occurrence(
    event: &Event,
    instance_date: NaiveDate,
    exception: Option<&EventException>,
) -> Occurrence {
    let overrides = exception.filter(|e| !e.is_deleted());
    let is_deleted = exception.is_some_and(|e| e.is_deleted());
    let is_modified = overrides.is_some_and(|e| e.has_overrides());

    let computed_end = instance_date + Duration::days(event.duration_days());

    let title = overrides
        .and_then(|e| e.title.clone().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| event.title.clone());
    let body = overrides
        .and_then(|e| e.body.clone().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| event.body.clone());
    let start_date = overrides.and_then(|e| e.start_date).unwrap_or(instance_date);
    let end_date = overrides.and_then(|e| e.end_date).unwrap_or(computed_end);
    let start_time = overrides
        .and_then(|e| e.start_time)
        .or(event.start_time);
    let end_time = overrides.and_then(|e| e.end_time).or(event.end_time);
    let all_day = overrides.and_then(|e| e.all_day).unwrap_or(event.all_day);

    Occurrence {
        event_id: event.id.clone(),
        event_slug: event.slug.clone(),
        virtual_id: Occurrence::virtual_id_for(&event.id, instance_date),
        instance_date,
        title,
        body,
        start_date,
        end_date,
        start_time,
        end_time,
        all_day,
        is_recurring: RecurrenceRule::from_event(event).recurs(),
        is_modified,
        is_deleted,
        category_ids: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::exception::{ACTION_DELETED, ACTION_MODIFIED};
    use chrono::{NaiveTime, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn multi_day_event() -> Event {
        Event {
            id: "e1".to_string(),
            slug: "retreat".to_string(),
            title: "Retreat".to_string(),
            body: "Annual retreat".to_string(),
            start_date: date(2025, 6, 16),
            start_time: NaiveTime::from_hms_opt(9, 30, 0),
            end_date: Some(date(2025, 6, 18)),
            end_time: NaiveTime::from_hms_opt(17, 0, 0),
            all_day: false,
            frequency: "WEEKLY".to_string(),
            repeat_interval: 1,
            repeat_until: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn exception_for(event: &Event, day: NaiveDate, action: &str) -> EventException {
        EventException {
            id: "x1".to_string(),
            event_id: event.id.clone(),
            instance_date: day,
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
    fn test_duration_preserved_across_instances() {
        let event = multi_day_event();
        let occ = build_occurrence(&event, date(2025, 7, 7), None);
        assert_eq!(occ.start_date, date(2025, 7, 7));
        assert_eq!(occ.end_date, date(2025, 7, 9));
        assert_eq!(
            (occ.end_date - occ.start_date).num_days(),
            event.duration_days()
        );
    }

    #[test]
    fn test_times_copied_verbatim() {
        let event = multi_day_event();
        let occ = build_occurrence(&event, date(2025, 7, 14), None);
        assert_eq!(occ.start_time, NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(occ.end_time, NaiveTime::from_hms_opt(17, 0, 0));
        assert!(!occ.is_modified);
        assert!(!occ.is_deleted);
    }

    #[test]
    fn test_override_precedence_per_field() {
        let event = multi_day_event();
        let mut ex = exception_for(&event, date(2025, 7, 7), ACTION_MODIFIED);
        ex.title = Some("Retreat (offsite)".to_string());
        ex.start_time = NaiveTime::from_hms_opt(11, 0, 0);

        let occ = build_occurrence(&event, date(2025, 7, 7), Some(&ex));
        assert_eq!(occ.title, "Retreat (offsite)");
        assert_eq!(occ.start_time, NaiveTime::from_hms_opt(11, 0, 0));
        // Untouched fields still resolve from the event.
        assert_eq!(occ.body, "Annual retreat");
        assert_eq!(occ.end_time, NaiveTime::from_hms_opt(17, 0, 0));
        assert_eq!(occ.end_date, date(2025, 7, 9));
        assert!(occ.is_modified);
    }

    #[test]
    fn test_empty_override_string_falls_through() {
        let event = multi_day_event();
        let mut ex = exception_for(&event, date(2025, 7, 7), ACTION_MODIFIED);
        ex.title = Some(String::new());

        let occ = build_occurrence(&event, date(2025, 7, 7), Some(&ex));
        assert_eq!(occ.title, "Retreat");
        assert!(!occ.is_modified);
    }

    #[test]
    fn test_deleted_exception_still_builds_flagged_occurrence() {
        let event = multi_day_event();
        let ex = exception_for(&event, date(2025, 7, 7), ACTION_DELETED);

        let occ = build_occurrence(&event, date(2025, 7, 7), Some(&ex));
        assert!(occ.is_deleted);
        assert!(!occ.is_modified);
        assert_eq!(occ.title, "Retreat");
    }

    #[test]
    fn test_virtual_id_is_deterministic() {
        let event = multi_day_event();
        let a = build_occurrence(&event, date(2025, 7, 7), None);
        let b = build_occurrence(&event, date(2025, 7, 7), None);
        assert_eq!(a.virtual_id, b.virtual_id);
        assert_eq!(a.virtual_id, "e1@2025-07-07");
        assert_eq!(a, b);
    }
}
