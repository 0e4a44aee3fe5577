//! Property tests for the pure booking rules.

use chrono::NaiveDate;
use proptest::prelude::*;
use sewa_client::api::{BookedSlot, Coordinates};
use sewa_client::models::{default_weekly_schedule, SlotTime};
use sewa_client::services::distance::haversine_distance;
use sewa_client::services::slots::{is_slot_available, time_slots};

proptest! {
    #[test]
    fn haversine_is_symmetric(
        lat_a in -89.0f64..89.0,
        lng_a in -179.0f64..179.0,
        lat_b in -89.0f64..89.0,
        lng_b in -179.0f64..179.0,
    ) {
        let a = Coordinates::new(lat_a, lng_a).unwrap();
        let b = Coordinates::new(lat_b, lng_b).unwrap();
        prop_assert_eq!(
            haversine_distance(&a, &b).value(),
            haversine_distance(&b, &a).value()
        );
    }

    #[test]
    fn haversine_to_self_is_zero(
        lat in -89.0f64..89.0,
        lng in -179.0f64..179.0,
    ) {
        let point = Coordinates::new(lat, lng).unwrap();
        prop_assert_eq!(haversine_distance(&point, &point).value(), 0.0);
    }

    #[test]
    fn haversine_is_rounded_to_two_decimals(
        lat_a in -89.0f64..89.0,
        lng_a in -179.0f64..179.0,
        lat_b in -89.0f64..89.0,
        lng_b in -179.0f64..179.0,
    ) {
        let a = Coordinates::new(lat_a, lng_a).unwrap();
        let b = Coordinates::new(lat_b, lng_b).unwrap();
        let d = haversine_distance(&a, &b).value();
        prop_assert_eq!((d * 100.0).round() / 100.0, d);
    }

    #[test]
    fn slot_times_roundtrip_through_canonical_form(hour in 0u16..24, minute in 0u16..60) {
        let time = SlotTime::hm(hour, minute);
        let parsed: SlotTime = time.canonical().parse().unwrap();
        prop_assert_eq!(parsed, time);
        let parsed_label: SlotTime = time.label_12h().parse().unwrap();
        prop_assert_eq!(parsed_label, time);
    }

    #[test]
    fn booked_slots_are_never_available(index in 0usize..11) {
        let schedule = default_weekly_schedule();
        let date = NaiveDate::from_ymd_opt(2025, 7, 8).unwrap(); // Tuesday
        let slot = time_slots()[index];
        let booked = vec![BookedSlot::at(slot)];
        prop_assert!(!is_slot_available(&schedule, &booked, Some(date), slot));
    }

    #[test]
    fn disabled_days_offer_nothing(index in 0usize..11) {
        let schedule = default_weekly_schedule();
        let sunday = NaiveDate::from_ymd_opt(2025, 7, 13).unwrap();
        prop_assert!(!is_slot_available(&schedule, &[], Some(sunday), time_slots()[index]));
    }
}
