use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::models::event::Event;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Lenient parse: unknown or empty values read as non-recurring.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Frequency::Daily,
            "WEEKLY" => Frequency::Weekly,
            "MONTHLY" => Frequency::Monthly,
            "YEARLY" => Frequency::Yearly,
            _ => Frequency::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::None => "NONE",
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }
}

/// Normalized view of an event's repeat configuration.
///
/// Construction never fails: a malformed rule on a stored event must not be
/// able to break occurrence generation, so bad values are substituted with
/// safe defaults instead of surfacing an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: u32,
    pub until: Option<NaiveDate>,
}

impl RecurrenceRule {
    pub fn from_event(event: &Event) -> Self {
        Self {
            frequency: Frequency::parse(&event.frequency),
            interval: event.repeat_interval.max(1) as u32,
            until: event.repeat_until,
        }
    }

    pub fn recurs(&self) -> bool {
        self.frequency != Frequency::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event_with(frequency: &str, interval: i32) -> Event {
        Event {
            id: "e1".to_string(),
            slug: "e1".to_string(),
            title: "Test".to_string(),
            body: String::new(),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 16).unwrap(),
            start_time: None,
            end_date: None,
            end_time: None,
            all_day: false,
            frequency: frequency.to_string(),
            repeat_interval: interval,
            repeat_until: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_frequency_parse_is_case_insensitive() {
        assert_eq!(Frequency::parse("weekly"), Frequency::Weekly);
        assert_eq!(Frequency::parse("MONTHLY"), Frequency::Monthly);
        assert_eq!(Frequency::parse(" Daily "), Frequency::Daily);
    }

    #[test]
    fn test_unknown_frequency_reads_as_none() {
        assert_eq!(Frequency::parse("FORTNIGHTLY"), Frequency::None);
        assert_eq!(Frequency::parse(""), Frequency::None);
        assert!(!RecurrenceRule::from_event(&event_with("garbage", 1)).recurs());
    }

    #[test]
    fn test_interval_floors_to_one() {
        // Deliberately silent normalization: editors never see an error for
        // a bad interval, the rule just behaves as every-1.
        assert_eq!(RecurrenceRule::from_event(&event_with("WEEKLY", 0)).interval, 1);
        assert_eq!(RecurrenceRule::from_event(&event_with("WEEKLY", -5)).interval, 1);
        assert_eq!(RecurrenceRule::from_event(&event_with("WEEKLY", 3)).interval, 3);
    }
}
