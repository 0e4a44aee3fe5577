//! The daily slot grid and per-slot availability rules.
//!
//! Slots are fixed one-hour intervals between opening and closing time. A
//! slot is offered when the selected day is enabled in the provider's weekly
//! schedule, the slot lies inside working hours, outside the break window,
//! and nobody has booked it already.

use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::api::BookedSlot;
use crate::models::{weekday_name, SlotTime, WeeklySchedule};

/// First slot of the day.
pub const OPENING_HOUR: u16 = 8;
/// Last slot of the day (inclusive).
pub const CLOSING_HOUR: u16 = 18;

static SLOT_GRID: Lazy<Vec<SlotTime>> = Lazy::new(|| {
    (OPENING_HOUR..=CLOSING_HOUR)
        .map(|hour| SlotTime::hm(hour, 0))
        .collect()
});

/// The fixed hourly grid, identical on every call.
pub fn time_slots() -> &'static [SlotTime] {
    &SLOT_GRID
}

/// One slot of the rendered grid, recomputed from scratch on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlot {
    pub label: String,
    pub value: SlotTime,
    pub available: bool,
    pub booked: bool,
}

/// Day-level reason the whole grid is closed, surfaced instead of marking
/// every slot individually. `None` means the day itself is workable.
pub fn day_unavailable_reason(
    schedule: &WeeklySchedule,
    date: Option<NaiveDate>,
) -> Option<String> {
    let date = date?;
    let name = weekday_name(date.weekday());
    match schedule.day(name) {
        Some(day) if day.enabled => None,
        _ => Some(format!("The provider is not available on {}s", name)),
    }
}

/// Decide whether a single candidate slot can be offered.
///
/// A missing date fails open: the grid must not block flows where no date
/// has been chosen yet.
pub fn is_slot_available(
    schedule: &WeeklySchedule,
    booked: &[BookedSlot],
    date: Option<NaiveDate>,
    slot: SlotTime,
) -> bool {
    let Some(date) = date else {
        return true;
    };

    let Some(day) = schedule.for_date(date) else {
        return false;
    };
    if !day.enabled {
        return false;
    }

    if slot < day.start_time || slot >= day.end_time {
        return false;
    }

    // Break window is half-open: a slot exactly at break_end is fine.
    if let Some((break_start, break_end)) = day.break_window() {
        if slot >= break_start && slot < break_end {
            return false;
        }
    }

    !booked.iter().any(|b| b.time == slot)
}

/// Build the full grid for a date, marking availability and booked state.
pub fn build_slot_grid(
    schedule: &WeeklySchedule,
    booked: &[BookedSlot],
    date: Option<NaiveDate>,
) -> Vec<TimeSlot> {
    time_slots()
        .iter()
        .map(|&value| TimeSlot {
            label: value.label_12h(),
            value,
            available: is_slot_available(schedule, booked, date, value),
            booked: booked.iter().any(|b| b.time == value),
        })
        .collect()
}

/// A nearby date with free capacity, suggested when the preferred slot
/// conflicts.
#[derive(Debug, Clone, PartialEq)]
pub struct AlternativeDate {
    pub date: NaiveDate,
    pub day_name: &'static str,
    pub available_slots: usize,
    pub total_slots: usize,
}

/// Scan the days after `preferred` and report those with at least one free
/// slot. `booked_by_date` holds whatever booked-slot lists the caller has
/// fetched; dates without an entry are evaluated against an empty list.
pub fn alternative_dates(
    schedule: &WeeklySchedule,
    booked_by_date: &HashMap<NaiveDate, Vec<BookedSlot>>,
    preferred: NaiveDate,
    days_ahead: u32,
) -> Vec<AlternativeDate> {
    static NO_BOOKINGS: Vec<BookedSlot> = Vec::new();

    (1..=days_ahead as i64)
        .filter_map(|offset| {
            let date = preferred + Duration::days(offset);
            if !schedule.is_day_enabled(date) {
                return None;
            }
            let booked = booked_by_date.get(&date).unwrap_or(&NO_BOOKINGS);
            let available = time_slots()
                .iter()
                .filter(|&&slot| is_slot_available(schedule, booked, Some(date), slot))
                .count();
            (available > 0).then(|| AlternativeDate {
                date,
                day_name: weekday_name(date.weekday()),
                available_slots: available,
                total_slots: time_slots().len(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_weekly_schedule;

    fn tuesday() -> NaiveDate {
        let date = NaiveDate::from_ymd_opt(2025, 7, 8).unwrap();
        assert_eq!(date.weekday(), chrono::Weekday::Tue);
        date
    }

    #[test]
    fn test_grid_is_fixed_and_ordered() {
        let slots = time_slots();
        assert_eq!(slots.len(), 11);
        assert_eq!(slots.first().unwrap().canonical(), "08:00:00");
        assert_eq!(slots.last().unwrap().canonical(), "18:00:00");
        assert!(slots.windows(2).all(|w| w[0] < w[1]));
        // Deterministic: same output every call.
        assert_eq!(time_slots(), time_slots());
    }

    #[test]
    fn test_missing_date_fails_open() {
        let schedule = default_weekly_schedule();
        for &slot in time_slots() {
            assert!(is_slot_available(&schedule, &[], None, slot));
        }
        assert_eq!(day_unavailable_reason(&schedule, None), None);
    }

    #[test]
    fn test_disabled_day_closes_everything() {
        let schedule = default_weekly_schedule();
        let saturday = NaiveDate::from_ymd_opt(2025, 7, 12).unwrap();
        assert_eq!(saturday.weekday(), chrono::Weekday::Sat);

        for &slot in time_slots() {
            assert!(!is_slot_available(&schedule, &[], Some(saturday), slot));
        }
        let reason = day_unavailable_reason(&schedule, Some(saturday)).unwrap();
        assert!(reason.contains("Saturday"));
    }

    #[test]
    fn test_working_hours_bounds() {
        let schedule = default_weekly_schedule();
        let date = Some(tuesday());
        // Default day runs 08:00-17:00; end is exclusive.
        assert!(is_slot_available(&schedule, &[], date, SlotTime::hm(8, 0)));
        assert!(is_slot_available(&schedule, &[], date, SlotTime::hm(16, 0)));
        assert!(!is_slot_available(&schedule, &[], date, SlotTime::hm(17, 0)));
        assert!(!is_slot_available(&schedule, &[], date, SlotTime::hm(18, 0)));
        assert!(!is_slot_available(&schedule, &[], date, SlotTime::hm(7, 0)));
    }

    #[test]
    fn test_break_window_is_half_open() {
        let schedule = default_weekly_schedule();
        let date = Some(tuesday());
        // Break 12:00-13:00: noon blocked, one o'clock open again.
        assert!(!is_slot_available(&schedule, &[], date, SlotTime::hm(12, 0)));
        assert!(is_slot_available(&schedule, &[], date, SlotTime::hm(13, 0)));
    }

    #[test]
    fn test_booked_slot_blocks_regardless_of_schedule() {
        let schedule = default_weekly_schedule();
        let booked = vec![BookedSlot::at(SlotTime::hm(14, 0))];
        assert!(!is_slot_available(
            &schedule,
            &booked,
            Some(tuesday()),
            SlotTime::hm(14, 0)
        ));
    }

    #[test]
    fn test_tuesday_grid_end_to_end() {
        let schedule = default_weekly_schedule();
        let booked = vec![BookedSlot::at(SlotTime::hm(14, 0))];
        let grid = build_slot_grid(&schedule, &booked, Some(tuesday()));

        let slot = |canonical: &str| {
            grid.iter()
                .find(|s| s.value.canonical() == canonical)
                .unwrap()
        };
        assert!(!slot("12:00:00").available); // break
        assert!(!slot("14:00:00").available); // booked
        assert!(slot("14:00:00").booked);
        assert!(slot("09:00:00").available);
        assert_eq!(slot("09:00:00").label, "09:00 AM");
    }

    #[test]
    fn test_alternative_dates_skip_weekends_and_full_days() {
        let schedule = default_weekly_schedule();
        // Book every offerable slot on Wednesday the 9th.
        let wednesday = NaiveDate::from_ymd_opt(2025, 7, 9).unwrap();
        let full_day: Vec<BookedSlot> = time_slots()
            .iter()
            .map(|&slot| BookedSlot::at(slot))
            .collect();
        let mut booked_by_date = HashMap::new();
        booked_by_date.insert(wednesday, full_day);

        let alternatives = alternative_dates(&schedule, &booked_by_date, tuesday(), 7);
        let dates: Vec<NaiveDate> = alternatives.iter().map(|a| a.date).collect();

        assert!(!dates.contains(&wednesday));
        // Sat 12th / Sun 13th are disabled days.
        assert!(!dates.contains(&NaiveDate::from_ymd_opt(2025, 7, 12).unwrap()));
        assert!(!dates.contains(&NaiveDate::from_ymd_opt(2025, 7, 13).unwrap()));
        // Thu 10th, Fri 11th, Mon 14th, Tue 15th remain.
        assert_eq!(alternatives.len(), 4);
        // 08:00-17:00 minus the noon break leaves eight free hourly slots.
        assert!(alternatives.iter().all(|a| a.available_slots == 8));
        assert_eq!(alternatives[0].day_name, "Thursday");
    }
}
