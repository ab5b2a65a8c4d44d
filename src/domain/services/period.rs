use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::models::event::Event;
use crate::domain::models::recurrence::{Frequency, RecurrenceRule};

/// Hard horizon for open-ended rules: a rule with no end date never expands
/// past two years beyond the window start.
pub const GENERATION_HORIZON_DAYS: i64 = 731;

/// Upper bound on candidates examined per expansion, including dates that
/// fall before the window and get filtered. Bounds worst-case latency for
/// dense rules over long windows.
pub const MAX_CANDIDATES: usize = 10_000;

/// Lazy, finite sequence of candidate occurrence dates for one event.
/// Single-pass; call [`generate`] again for a fresh iteration.
pub struct PeriodIter {
    anchor: NaiveDate,
    frequency: Frequency,
    interval: u32,
    lower: NaiveDate,
    upper: NaiveDate,
    next_index: u64,
    remaining: Option<usize>,
    examined: usize,
    done: bool,
}

/// Expands an event's recurrence rule into the dates falling inside
/// [window_start, window_end].
///
/// Candidates are always stepped from the event's original start date, not
/// the window edge: a biweekly rule queried mid-stream must land on the same
/// alternating weeks it always has. Dates before the effective lower bound
/// are generated and filtered; the iterator fast-forwards to just before the
/// bound so the filtering work stays O(interval).
pub fn generate(
    event: &Event,
    window_start: NaiveDate,
    window_end: NaiveDate,
    limit: Option<usize>,
) -> PeriodIter {
    let rule = RecurrenceRule::from_event(event);
    let anchor = event.start_date;

    if !rule.recurs() {
        let in_window = anchor >= window_start && anchor <= window_end;
        return PeriodIter {
            anchor,
            frequency: Frequency::None,
            interval: 1,
            lower: window_start,
            upper: window_end,
            next_index: 0,
            remaining: limit,
            examined: 0,
            done: !in_window,
        };
    }

    let lower = anchor.max(window_start);
    let horizon = window_start + Duration::days(GENERATION_HORIZON_DAYS);
    let upper = window_end.min(rule.until.unwrap_or(horizon));

    let mut iter = PeriodIter {
        anchor,
        frequency: rule.frequency,
        interval: rule.interval,
        lower,
        upper,
        next_index: 0,
        remaining: limit,
        examined: 0,
        done: upper < lower,
    };
    iter.next_index = iter.initial_index();
    iter
}

impl PeriodIter {
    /// Candidate n counted from the anchor. Computing each candidate from
    /// the anchor (rather than stepping the previous candidate) keeps the
    /// anchor's day-of-month: Jan 31 -> Feb 28 -> Mar 31, not Mar 28.
    fn candidate(&self, n: u64) -> NaiveDate {
        let interval = u64::from(self.interval);
        match self.frequency {
            Frequency::None => self.anchor,
            Frequency::Daily => self.anchor + Duration::days((n * interval) as i64),
            Frequency::Weekly => self.anchor + Duration::days((n * interval * 7) as i64),
            Frequency::Monthly => add_months(self.anchor, (n * interval) as u32),
            Frequency::Yearly => add_months(self.anchor, (n * interval * 12) as u32),
        }
    }

    /// First step index worth examining: at most one interval before the
    /// lower bound, so pre-window candidates never dominate the work.
    fn initial_index(&self) -> u64 {
        if self.lower <= self.anchor {
            return 0;
        }
        let interval = u64::from(self.interval);
        let gap_days = (self.lower - self.anchor).num_days() as u64;
        match self.frequency {
            Frequency::None => 0,
            Frequency::Daily => gap_days / interval,
            Frequency::Weekly => gap_days / (interval * 7),
            Frequency::Monthly => u64::from(month_gap(self.anchor, self.lower)) / interval,
            Frequency::Yearly => {
                u64::from(month_gap(self.anchor, self.lower)) / (interval * 12)
            }
        }
        .saturating_sub(1)
    }
}

impl Iterator for PeriodIter {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.done {
            return None;
        }
        if self.remaining == Some(0) {
            self.done = true;
            return None;
        }

        if self.frequency == Frequency::None {
            self.done = true;
            return Some(self.anchor);
        }

        loop {
            if self.examined >= MAX_CANDIDATES {
                self.done = true;
                return None;
            }
            self.examined += 1;

            let candidate = self.candidate(self.next_index);
            self.next_index += 1;

            if candidate > self.upper {
                self.done = true;
                return None;
            }
            if candidate < self.lower {
                continue;
            }
            if let Some(remaining) = self.remaining.as_mut() {
                *remaining -= 1;
            }
            return Some(candidate);
        }
    }
}

/// Whole months from `from` to `to`, ignoring days. Assumes `to >= from`.
fn month_gap(from: NaiveDate, to: NaiveDate) -> u32 {
    let years = (to.year() - from.year()) as u32;
    (years * 12 + to.month0()).saturating_sub(from.month0())
}

/// Adds calendar months, clamping to the last valid day of the target month
/// (Jan 31 + 1 month = Feb 28/29, never a rollover into March).
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    let total = date.month0() + months;
    let year = date.year() + (total / 12) as i32;
    let month = total % 12 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}
