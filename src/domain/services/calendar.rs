use chrono::{Duration, NaiveTime};
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};

use crate::domain::models::occurrence::Occurrence;

/// Generates an iCalendar (.ics) string for a single occurrence
pub fn generate_ics(occurrence: &Occurrence) -> String {
    let mut calendar = Calendar::new();

    let mut ical_event = IcalEvent::new();
    ical_event
        .summary(&occurrence.title)
        .description(&occurrence.body)
        .uid(&occurrence.virtual_id);

    if occurrence.all_day {
        // DTEND is exclusive for all-day components.
        ical_event
            .starts(occurrence.start_date)
            .ends(occurrence.end_date + Duration::days(1));
    } else {
        let midnight = NaiveTime::MIN;
        let start = occurrence
            .start_date
            .and_time(occurrence.start_time.unwrap_or(midnight));
        let end = occurrence
            .end_date
            .and_time(occurrence.end_time.or(occurrence.start_time).unwrap_or(midnight));
        ical_event.starts(start).ends(end);
    }

    calendar.push(ical_event.done());
    calendar.to_string()
}
