//! End-to-end wizard flows: step gating, soft gates, draft assembly.

use chrono::NaiveDate;
use sewa_client::api::{
    Coordinates, PriceType, ProviderId, ProviderProfile, ServiceId, ServiceOffering,
};
use sewa_client::models::{default_weekly_schedule, SlotTime};
use sewa_client::services::submission::{assemble_request, request_fingerprint};
use sewa_client::services::wizard::{BookingWizard, WizardStep};

fn provider_with_radius(radius: Option<f64>) -> ProviderProfile {
    ProviderProfile {
        id: ProviderId::new(7),
        business_name: "Tamang Cleaning Co".to_string(),
        full_name: "Dawa Tamang".to_string(),
        email: "dawa@tamangcleaning.com.np".to_string(),
        phone_number: "9841000009".to_string(),
        city: "Kathmandu".to_string(),
        address: "Chabahil, Kathmandu".to_string(),
        bio: String::new(),
        coordinates: Some(Coordinates::new(27.7172, 85.3240).unwrap()),
        is_verified: true,
        services: vec![ServiceOffering {
            id: ServiceId::new(30),
            title: "Deep House Cleaning".to_string(),
            description: String::new(),
            base_price: 3000.0,
            price_type: PriceType::Fixed,
            minimum_charge: 0.0,
            estimated_duration: Some(qtty::Hours::new(3.0)),
            service_radius: radius.map(qtty::Kilometers::new),
            requires_site_visit: false,
            emergency_service: false,
            is_active: true,
        }],
    }
}

fn tuesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 8).unwrap()
}

fn complete_wizard(wizard: &mut BookingWizard) {
    wizard.set_service(ServiceId::new(30));
    wizard.set_date(tuesday());
    wizard.set_time(SlotTime::hm(9, 0));
    assert!(wizard.try_next());

    wizard.set_full_name("Asha Rai");
    wizard.set_phone("9812345678");
    wizard.set_email("asha@example.com");
    wizard.set_address("Baneshwor Height, Kathmandu");
    wizard.set_city("Kathmandu");
    wizard.set_coordinates(Some(Coordinates::new(27.7200, 85.3300).unwrap()));
    assert!(wizard.try_next());

    wizard.set_description("Full apartment deep clean before moving in");
    assert!(wizard.try_next());
    assert_eq!(wizard.step(), WizardStep::Review);
}

#[test]
fn wizard_walks_all_four_steps() {
    let mut wizard = BookingWizard::new(provider_with_radius(Some(5.0)), default_weekly_schedule());
    assert_eq!(wizard.step(), WizardStep::ServiceSchedule);
    complete_wizard(&mut wizard);
    assert!(wizard.error().is_none());
}

#[test]
fn assembled_request_reflects_the_draft() {
    let mut wizard = BookingWizard::new(provider_with_radius(Some(5.0)), default_weekly_schedule());
    complete_wizard(&mut wizard);
    wizard.set_special_instructions("  Ring the top-floor bell  ");

    let request = assemble_request(&wizard).unwrap();
    assert_eq!(request.service, ServiceId::new(30));
    assert_eq!(request.preferred_date, tuesday());
    assert_eq!(request.preferred_time.canonical(), "09:00:00");
    assert_eq!(request.customer_phone, "9812345678");
    assert_eq!(
        request.special_instructions.as_deref(),
        Some("Ring the top-floor bell")
    );
    assert_eq!(request.latitude, Some(27.7200));
    assert!(!request.emergency);

    // Fingerprint is reproducible for the same draft.
    assert_eq!(
        request_fingerprint(&request).unwrap(),
        request_fingerprint(&assemble_request(&wizard).unwrap()).unwrap()
    );
}

#[test]
fn assemble_refuses_incomplete_draft() {
    let wizard = BookingWizard::new(provider_with_radius(None), default_weekly_schedule());
    let error = assemble_request(&wizard).unwrap_err();
    assert!(error.contains("service"));
}

#[test]
fn no_radius_means_no_coordinate_gate() {
    let mut wizard = BookingWizard::new(provider_with_radius(None), default_weekly_schedule());
    wizard.set_service(ServiceId::new(30));
    wizard.set_date(tuesday());
    wizard.set_time(SlotTime::hm(9, 0));
    assert!(wizard.try_next());

    wizard.set_full_name("Asha Rai");
    wizard.set_phone("9712345678");
    wizard.set_email("asha@example.com");
    wizard.set_address("Baneshwor Height, Kathmandu");
    wizard.set_city("Kathmandu");
    // No coordinates set and no radius declared: step passes.
    assert!(wizard.try_next());
    assert_eq!(wizard.step(), WizardStep::JobDetails);
}

#[test]
fn radius_gate_blocks_only_missing_coordinates() {
    let mut wizard = BookingWizard::new(provider_with_radius(Some(5.0)), default_weekly_schedule());
    wizard.set_service(ServiceId::new(30));
    wizard.set_date(tuesday());
    wizard.set_time(SlotTime::hm(9, 0));
    assert!(wizard.try_next());

    wizard.set_full_name("Asha Rai");
    wizard.set_phone("9812345678");
    wizard.set_email("asha@example.com");
    wizard.set_address("Lakeside, Pokhara");
    wizard.set_city("Pokhara");

    // Missing coordinates with a declared radius: hard block.
    assert!(!wizard.try_next());
    assert!(wizard.error().is_some());

    // Known coordinates far outside the radius: warning, not a block.
    wizard.set_coordinates(Some(Coordinates::new(28.2096, 83.9856).unwrap()));
    let warning = wizard.radius_check().warning().unwrap();
    assert!(warning.contains("km"));
    assert!(wizard.try_next());
}

#[test]
fn backward_navigation_never_validates() {
    let mut wizard = BookingWizard::new(provider_with_radius(Some(5.0)), default_weekly_schedule());
    complete_wizard(&mut wizard);

    wizard.back();
    assert_eq!(wizard.step(), WizardStep::JobDetails);
    // Wreck the draft, then walk back freely.
    wizard.set_description("");
    wizard.back();
    wizard.back();
    assert_eq!(wizard.step(), WizardStep::ServiceSchedule);
}
