//! ISO-week publication states
//!
//! Core domain logic: parse publication dates, bucket them by calendar
//! year, and derive a per-week Yes/No/Unknown sequence for each tracked
//! year. Everything here is pure; "now" is always passed in as a date.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Publish state of one ISO week
///
/// Wire values are single characters, matching the payload consumed by
/// the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeekState {
    /// At least one publication fell in this week
    #[serde(rename = "y")]
    Yes,
    /// The week is fully in the past with no publication
    #[serde(rename = "n")]
    No,
    /// The week is in the future (or in a not-yet-reached part of the
    /// current year)
    #[serde(rename = "u")]
    Unknown,
}

/// One observed publication event
///
/// `year` is the leading 4-digit substring of `date`; `week` is the ISO
/// week number of the date. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub date: String,
    pub year: String,
    pub week: u32,
}

/// Entries grouped by calendar year, source order kept within each bucket
pub type EntriesByYear = BTreeMap<String, Vec<Entry>>;

/// Per-week states for each tracked year, in week order
pub type WeekStatesByYear = BTreeMap<String, Vec<WeekState>>;

/// Payload served to the front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPayload {
    pub week_states_by_year: WeekStatesByYear,
    /// State of the current ISO week; absent when the current year is
    /// not tracked (or its final ISO week is excluded from the sequence)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_week_state: Option<WeekState>,
}

/// A date string that does not start with an ISO-8601 calendar date
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not an ISO-8601 date (expected YYYY-MM-DD prefix): {0:?}")]
pub struct ParseDateError(pub String);

/// Parse a raw date string into an [`Entry`]
///
/// Only the leading `YYYY-MM-DD` is consulted; trailing time/zone
/// suffixes are ignored. Unparseable input is an explicit error, the
/// caller decides whether to drop or log it.
pub fn parse_entry(date: &str) -> Result<Entry, ParseDateError> {
    let head = date
        .get(..10)
        .ok_or_else(|| ParseDateError(date.to_string()))?;
    let parsed = NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .map_err(|_| ParseDateError(date.to_string()))?;

    Ok(Entry {
        date: date.to_string(),
        year: head[..4].to_string(),
        week: parsed.iso_week().week(),
    })
}

/// Group raw date strings into entries by calendar year
///
/// Source order is preserved within each year. Unparseable dates are
/// logged and dropped; they never reach a bucket. No deduplication:
/// repeated dates produce repeated entries, which is harmless since
/// derivation only asks about week membership.
pub fn bucket_by_year<I, S>(dates: I) -> EntriesByYear
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut by_year = EntriesByYear::new();
    for date in dates {
        match parse_entry(date.as_ref()) {
            Ok(entry) => {
                by_year.entry(entry.year.clone()).or_default().push(entry);
            }
            Err(e) => {
                warn!("dropping publication date: {}", e);
            }
        }
    }
    by_year
}

/// Number of ISO weeks in a year (52 or 53)
pub fn iso_weeks_in_year(year: i32) -> u32 {
    // Week 53 only exists in long years
    if NaiveDate::from_isoywd_opt(year, 53, Weekday::Mon).is_some() {
        53
    } else {
        52
    }
}

/// Derive the per-week publish states for every tracked year
///
/// Each tracked year gets a sequence covering weeks 1 through
/// `iso_weeks_in_year − 1`; the year's final ISO week is not part of
/// the sequence, and consumers rely on that length. A tracked
/// year with no entries still gets a full sequence. Absence of data in
/// a past week is a definitive `No`; only future-ness yields `Unknown`.
pub fn derive_week_states(
    entries_by_year: &EntriesByYear,
    tracked_years: &[String],
    today: NaiveDate,
) -> WeekStatesByYear {
    let current_year = today.year();
    let current_week = today.iso_week().week();

    let mut result = WeekStatesByYear::new();
    for year_str in tracked_years {
        let Ok(year) = year_str.parse::<i32>() else {
            // Tracked years are validated at config load; skip defensively
            warn!(year = %year_str, "ignoring non-numeric tracked year");
            continue;
        };

        let weeks_with_entries: BTreeSet<u32> = entries_by_year
            .get(year_str)
            .map(|entries| entries.iter().map(|e| e.week).collect())
            .unwrap_or_default();

        let num_weeks = iso_weeks_in_year(year);
        let states = (1..num_weeks)
            .map(|week| {
                if year > current_year {
                    WeekState::Unknown
                } else if year == current_year && week > current_week {
                    WeekState::Unknown
                } else if weeks_with_entries.contains(&week) {
                    WeekState::Yes
                } else {
                    WeekState::No
                }
            })
            .collect();

        result.insert(year_str.clone(), states);
    }
    result
}

/// State of the current ISO week, if the current year is tracked
///
/// Indexes the current year's sequence at `current_week − 1`; `None`
/// when the year is untracked or the index falls outside the sequence.
pub fn current_week_state(
    week_states_by_year: &WeekStatesByYear,
    today: NaiveDate,
) -> Option<WeekState> {
    let states = week_states_by_year.get(&today.year().to_string())?;
    let index = today.iso_week().week().checked_sub(1)? as usize;
    states.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tracked(years: &[&str]) -> Vec<String> {
        years.iter().map(|y| y.to_string()).collect()
    }

    #[test]
    fn parse_entry_plain_date() {
        let entry = parse_entry("2024-01-08").unwrap();
        assert_eq!(entry.year, "2024");
        assert_eq!(entry.week, 2);
        assert_eq!(entry.date, "2024-01-08");
    }

    #[test]
    fn parse_entry_ignores_time_suffix() {
        let entry = parse_entry("2024-02-20T09:30:00Z").unwrap();
        assert_eq!(entry.year, "2024");
        assert_eq!(entry.week, 8);
    }

    #[test]
    fn parse_entry_rejects_garbage() {
        assert!(parse_entry("not a date").is_err());
        assert!(parse_entry("").is_err());
        assert!(parse_entry("2024").is_err());
        assert!(parse_entry("2024-13-99").is_err());
    }

    #[test]
    fn bucket_preserves_source_order_and_drops_bad_dates() {
        let by_year = bucket_by_year([
            "2024-03-01",
            "garbage",
            "2024-01-08",
            "2022-06-15",
        ]);

        let y2024: Vec<&str> = by_year["2024"].iter().map(|e| e.date.as_str()).collect();
        assert_eq!(y2024, vec!["2024-03-01", "2024-01-08"]);
        assert_eq!(by_year["2022"].len(), 1);
        assert_eq!(by_year.len(), 2);
    }

    #[test]
    fn bucket_keeps_duplicate_dates() {
        let by_year = bucket_by_year(["2024-01-08", "2024-01-08"]);
        assert_eq!(by_year["2024"].len(), 2);
    }

    #[test]
    fn weeks_in_year_long_and_short() {
        assert_eq!(iso_weeks_in_year(2020), 53);
        assert_eq!(iso_weeks_in_year(2022), 52);
        assert_eq!(iso_weeks_in_year(2024), 52);
    }

    #[test]
    fn sequence_length_is_weeks_minus_one() {
        let states = derive_week_states(
            &EntriesByYear::new(),
            &tracked(&["2020", "2022"]),
            date("2024-03-05"),
        );
        assert_eq!(states["2020"].len(), 52);
        assert_eq!(states["2022"].len(), 51);
    }

    #[test]
    fn past_year_without_entries_is_all_no() {
        let states = derive_week_states(
            &EntriesByYear::new(),
            &tracked(&["2022"]),
            date("2024-03-05"),
        );
        assert!(states["2022"].iter().all(|s| *s == WeekState::No));
    }

    #[test]
    fn future_year_is_all_unknown_even_with_entries() {
        // Fetched data for a future year must not leak into Yes/No
        let by_year = bucket_by_year(["2025-01-06"]);
        let states = derive_week_states(&by_year, &tracked(&["2025"]), date("2024-03-05"));
        assert!(states["2025"].iter().all(|s| *s == WeekState::Unknown));
    }

    #[test]
    fn worked_example_week_ten_of_2024() {
        // Today in ISO week 10 of 2024; posts in weeks 2 and 8
        let by_year = bucket_by_year(["2024-01-08", "2024-02-20"]);
        let today = date("2024-03-05");
        assert_eq!(today.iso_week().week(), 10);

        let states = derive_week_states(&by_year, &tracked(&["2022", "2024"]), today);

        assert!(states["2022"].iter().all(|s| *s == WeekState::No));

        let y2024 = &states["2024"];
        assert_eq!(y2024.len(), 51);
        for (index, state) in y2024.iter().enumerate() {
            let expected = match index {
                1 | 7 => WeekState::Yes,
                i if i <= 9 => WeekState::No,
                _ => WeekState::Unknown,
            };
            assert_eq!(*state, expected, "week index {}", index);
        }

        assert_eq!(current_week_state(&states, today), Some(WeekState::No));
    }

    #[test]
    fn current_week_state_yes_when_published_this_week() {
        let by_year = bucket_by_year(["2024-03-04"]);
        let today = date("2024-03-05");
        let states = derive_week_states(&by_year, &tracked(&["2024"]), today);
        assert_eq!(current_week_state(&states, today), Some(WeekState::Yes));
    }

    #[test]
    fn current_week_state_absent_for_untracked_year() {
        let states = derive_week_states(
            &EntriesByYear::new(),
            &tracked(&["2022"]),
            date("2024-03-05"),
        );
        assert_eq!(current_week_state(&states, date("2024-03-05")), None);
    }

    #[test]
    fn current_week_state_absent_in_excluded_final_week() {
        // The last ISO week is excluded from the sequence, so a read
        // during that week finds no state to index
        let today = date("2022-12-28");
        assert_eq!(today.iso_week().week(), 52);
        let states = derive_week_states(&EntriesByYear::new(), &tracked(&["2022"]), today);
        assert_eq!(states["2022"].len(), 51);
        assert_eq!(current_week_state(&states, today), None);
    }

    #[test]
    fn week_state_wire_values() {
        assert_eq!(serde_json::to_string(&WeekState::Yes).unwrap(), "\"y\"");
        assert_eq!(serde_json::to_string(&WeekState::No).unwrap(), "\"n\"");
        assert_eq!(serde_json::to_string(&WeekState::Unknown).unwrap(), "\"u\"");
    }

    #[test]
    fn payload_serializes_camel_case_and_omits_absent_state() {
        let payload = DataPayload {
            week_states_by_year: WeekStatesByYear::new(),
            current_week_state: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("weekStatesByYear").is_some());
        assert!(json.get("currentWeekState").is_none());
    }
}
