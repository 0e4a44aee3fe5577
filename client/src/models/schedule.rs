use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::time::SlotTime;

/// Canonical day name used on the wire ("Monday" .. "Sunday").
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// A single day of a provider's weekly schedule.
///
/// Times come over the wire as 12-hour strings and are ignored entirely when
/// `enabled` is false. The break window is optional; when only one of its
/// bounds is present it is treated as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day: String,
    pub enabled: bool,
    pub start_time: SlotTime,
    pub end_time: SlotTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_start: Option<SlotTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_end: Option<SlotTime>,
}

impl DaySchedule {
    /// The break window as a half-open interval, when both bounds are set.
    pub fn break_window(&self) -> Option<(SlotTime, SlotTime)> {
        match (self.break_start, self.break_end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

/// A provider's weekly schedule: one entry per day, keyed by day name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklySchedule {
    pub days: Vec<DaySchedule>,
}

impl WeeklySchedule {
    /// Look up the schedule entry for a day name.
    pub fn day(&self, name: &str) -> Option<&DaySchedule> {
        self.days.iter().find(|d| d.day.eq_ignore_ascii_case(name))
    }

    /// Look up the schedule entry for a calendar date's weekday.
    pub fn for_date(&self, date: NaiveDate) -> Option<&DaySchedule> {
        self.day(weekday_name(date.weekday()))
    }

    /// Whether the given date falls on an enabled working day.
    pub fn is_day_enabled(&self, date: NaiveDate) -> bool {
        self.for_date(date).map(|d| d.enabled).unwrap_or(false)
    }
}

/// The schedule served for providers who never saved availability:
/// weekdays 8:00 AM - 5:00 PM with a noon lunch break, weekends off.
pub fn default_weekly_schedule() -> WeeklySchedule {
    let weekday = |day: &str| DaySchedule {
        day: day.to_string(),
        enabled: true,
        start_time: SlotTime::hm(8, 0),
        end_time: SlotTime::hm(17, 0),
        break_start: Some(SlotTime::hm(12, 0)),
        break_end: Some(SlotTime::hm(13, 0)),
    };
    let weekend = |day: &str| DaySchedule {
        day: day.to_string(),
        enabled: false,
        start_time: SlotTime::hm(10, 0),
        end_time: SlotTime::hm(14, 0),
        break_start: Some(SlotTime::hm(12, 0)),
        break_end: Some(SlotTime::hm(12, 30)),
    };

    WeeklySchedule {
        days: vec![
            weekday("Monday"),
            weekday("Tuesday"),
            weekday("Wednesday"),
            weekday("Thursday"),
            weekday("Friday"),
            weekend("Saturday"),
            weekend("Sunday"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule_shape() {
        let schedule = default_weekly_schedule();
        assert_eq!(schedule.days.len(), 7);
        assert!(schedule.day("Monday").unwrap().enabled);
        assert!(schedule.day("Friday").unwrap().enabled);
        assert!(!schedule.day("Saturday").unwrap().enabled);
        assert!(!schedule.day("Sunday").unwrap().enabled);
    }

    #[test]
    fn test_day_lookup_is_case_insensitive() {
        let schedule = default_weekly_schedule();
        assert!(schedule.day("monday").is_some());
        assert!(schedule.day("MONDAY").is_some());
        assert!(schedule.day("Holiday").is_none());
    }

    #[test]
    fn test_for_date_resolves_weekday() {
        let schedule = default_weekly_schedule();
        // 2025-07-08 is a Tuesday, 2025-07-12 a Saturday.
        let tuesday = NaiveDate::from_ymd_opt(2025, 7, 8).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2025, 7, 12).unwrap();
        assert_eq!(tuesday.weekday(), chrono::Weekday::Tue);
        assert!(schedule.is_day_enabled(tuesday));
        assert!(!schedule.is_day_enabled(saturday));
    }

    #[test]
    fn test_deserializes_wire_format() {
        let json = r#"[
            {"day": "Monday", "enabled": true, "start_time": "8:00 AM",
             "end_time": "5:00 PM", "break_start": "12:00 PM", "break_end": "1:00 PM"},
            {"day": "Saturday", "enabled": false, "start_time": "10:00 AM",
             "end_time": "2:00 PM"}
        ]"#;
        let schedule: WeeklySchedule = serde_json::from_str(json).unwrap();
        let monday = schedule.day("Monday").unwrap();
        assert_eq!(monday.start_time, SlotTime::hm(8, 0));
        assert_eq!(monday.end_time, SlotTime::hm(17, 0));
        assert_eq!(
            monday.break_window(),
            Some((SlotTime::hm(12, 0), SlotTime::hm(13, 0)))
        );
        assert_eq!(schedule.day("Saturday").unwrap().break_window(), None);
    }

    #[test]
    fn test_half_break_window_is_ignored() {
        let day = DaySchedule {
            day: "Monday".to_string(),
            enabled: true,
            start_time: SlotTime::hm(8, 0),
            end_time: SlotTime::hm(17, 0),
            break_start: Some(SlotTime::hm(12, 0)),
            break_end: None,
        };
        assert_eq!(day.break_window(), None);
    }
}
