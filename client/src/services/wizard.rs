//! The four-step booking wizard.
//!
//! Forward navigation from a step requires that step's validation to pass;
//! going back is always allowed. A failed validation sets a single
//! human-readable error message; editing any tracked field clears it
//! optimistically, and the next validation pass re-surfaces it if the input
//! is still invalid.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::api::{
    Coordinates, ImageKind, ImageUpload, ProviderProfile, ServiceId, ServiceOffering,
    MAX_ADVANCE_BOOKING_DAYS, MAX_IMAGE_SIZE_BYTES, MIN_ADVANCE_MINUTES,
    MIN_ADVANCE_MINUTES_EMERGENCY,
};
use crate::models::{nepal_offset, weekday_name, SlotTime, WeeklySchedule};
use crate::services::distance::{check_service_radius, RadiusCheck};

/// Ordered wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    ServiceSchedule,
    ContactLocation,
    JobDetails,
    Review,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            Self::ServiceSchedule => 1,
            Self::ContactLocation => 2,
            Self::JobDetails => 3,
            Self::Review => 4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::ServiceSchedule => "Service & Schedule",
            Self::ContactLocation => "Contact & Location",
            Self::JobDetails => "Job Details",
            Self::Review => "Review & Confirm",
        }
    }

    fn next(&self) -> Option<Self> {
        match self {
            Self::ServiceSchedule => Some(Self::ContactLocation),
            Self::ContactLocation => Some(Self::JobDetails),
            Self::JobDetails => Some(Self::Review),
            Self::Review => None,
        }
    }

    fn previous(&self) -> Option<Self> {
        match self {
            Self::ServiceSchedule => None,
            Self::ContactLocation => Some(Self::ServiceSchedule),
            Self::JobDetails => Some(Self::ContactLocation),
            Self::Review => Some(Self::JobDetails),
        }
    }
}

/// Validate a Nepali mobile number: optional `+977`/`977` country prefix,
/// then `97` or `98`, then eight digits.
pub fn is_valid_mobile(phone: &str) -> bool {
    // A bare "977..." is only a country prefix when a full 10-digit number
    // follows it; "9771234567" is itself a valid 97-prefixed number.
    let digits = match phone.strip_prefix("+977") {
        Some(rest) => rest,
        None => match phone.strip_prefix("977") {
            Some(rest) if rest.len() == 10 => rest,
            _ => phone,
        },
    };
    digits.len() == 10
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits.starts_with("97") || digits.starts_with("98"))
}

/// The in-progress, client-only booking draft. Created when the wizard
/// starts, mutated by each step, discarded on submit or navigation away.
#[derive(Debug, Clone, Default)]
pub struct BookingDraft {
    pub service: Option<ServiceId>,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<SlotTime>,
    pub estimated_hours: Option<f64>,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub district: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub description: String,
    pub special_instructions: String,
    pub emergency: bool,
    pub attachments: Vec<ImageUpload>,
}

/// Wizard state: the draft, the provider context it validates against, the
/// current step and the current error message.
#[derive(Debug, Clone)]
pub struct BookingWizard {
    provider: ProviderProfile,
    schedule: WeeklySchedule,
    draft: BookingDraft,
    step: WizardStep,
    error: Option<String>,
}

impl BookingWizard {
    pub fn new(provider: ProviderProfile, schedule: WeeklySchedule) -> Self {
        Self {
            provider,
            schedule,
            draft: BookingDraft::default(),
            step: WizardStep::ServiceSchedule,
            error: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn provider(&self) -> &ProviderProfile {
        &self.provider
    }

    /// The service currently selected in the draft, if any.
    pub fn selected_service(&self) -> Option<&ServiceOffering> {
        self.draft.service.and_then(|id| self.provider.service(id))
    }

    // ---- field setters; each edit clears the error optimistically ----

    pub fn set_service(&mut self, service: ServiceId) {
        self.draft.service = Some(service);
        self.error = None;
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.draft.preferred_date = Some(date);
        self.error = None;
    }

    pub fn set_time(&mut self, time: SlotTime) {
        self.draft.preferred_time = Some(time);
        self.error = None;
    }

    pub fn set_estimated_hours(&mut self, hours: f64) {
        self.draft.estimated_hours = Some(hours);
        self.error = None;
    }

    pub fn set_full_name(&mut self, name: impl Into<String>) {
        self.draft.full_name = name.into();
        self.error = None;
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.draft.phone = phone.into();
        self.error = None;
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.draft.email = email.into();
        self.error = None;
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.draft.address = address.into();
        self.error = None;
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.draft.city = city.into();
        self.error = None;
    }

    pub fn set_district(&mut self, district: Option<String>) {
        self.draft.district = district;
        self.error = None;
    }

    pub fn set_coordinates(&mut self, coordinates: Option<Coordinates>) {
        self.draft.coordinates = coordinates;
        self.error = None;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
        self.error = None;
    }

    pub fn set_special_instructions(&mut self, text: impl Into<String>) {
        self.draft.special_instructions = text.into();
        self.error = None;
    }

    pub fn set_emergency(&mut self, emergency: bool) {
        self.draft.emergency = emergency;
        self.error = None;
    }

    /// Stage a photo for the best-effort "before" upload after submission.
    pub fn attach_image(&mut self, image: ImageUpload) -> Result<(), String> {
        if !image.content_type.starts_with("image/") {
            return Err("Only image files are allowed".to_string());
        }
        if image.bytes.len() > MAX_IMAGE_SIZE_BYTES {
            return Err("Image size must be less than 5MB".to_string());
        }
        if self.draft.attachments.len() >= ImageKind::Before.max_per_booking() {
            return Err(format!(
                "Maximum {} before images allowed per booking",
                ImageKind::Before.max_per_booking()
            ));
        }
        self.draft.attachments.push(image);
        self.error = None;
        Ok(())
    }

    /// Try to advance to the next step. Returns `true` on success; on
    /// failure the wizard stays put and [`BookingWizard::error`] is set.
    pub fn try_next(&mut self) -> bool {
        match self.validate_step(self.step) {
            Ok(()) => {
                if let Some(next) = self.step.next() {
                    self.step = next;
                }
                self.error = None;
                true
            }
            Err(message) => {
                self.error = Some(message);
                false
            }
        }
    }

    /// Go back one step. Always allowed, never validates.
    pub fn back(&mut self) {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
            self.error = None;
        }
    }

    /// The radius classification for the current draft.
    pub fn radius_check(&self) -> RadiusCheck {
        let radius = self.selected_service().and_then(|s| s.service_radius);
        check_service_radius(
            radius,
            self.provider.coordinates.as_ref(),
            self.draft.coordinates.as_ref(),
        )
    }

    /// Non-blocking warning when the chosen slot violates the booking
    /// timing rules: already past, too soon, or too far out. The backend
    /// rejects such requests; surfacing them early saves a round trip.
    pub fn timing_warning(&self, now: DateTime<Utc>) -> Option<String> {
        let date = self.draft.preferred_date?;
        let time = self.draft.preferred_time?;

        let now_npt = now.with_timezone(&nepal_offset());
        let requested = date
            .and_time(time.to_naive())
            .and_local_timezone(nepal_offset())
            .single()?;

        if requested <= now_npt {
            return Some(
                "Selected time is in the past (Nepal time). Please pick a future slot.".to_string(),
            );
        }

        let lead = requested - now_npt;
        if lead > Duration::days(MAX_ADVANCE_BOOKING_DAYS) {
            return Some(format!(
                "Bookings can only be made up to {} days in advance.",
                MAX_ADVANCE_BOOKING_DAYS
            ));
        }

        let emergency = self
            .selected_service()
            .map(|s| s.emergency_service)
            .unwrap_or(false);
        let (min_minutes, label) = if emergency {
            (MIN_ADVANCE_MINUTES_EMERGENCY, "30 minutes")
        } else {
            (MIN_ADVANCE_MINUTES, "1 hour")
        };
        if lead < Duration::minutes(min_minutes) {
            return Some(format!(
                "You must book at least {} before the service time.",
                label
            ));
        }

        None
    }

    fn validate_step(&self, step: WizardStep) -> Result<(), String> {
        match step {
            WizardStep::ServiceSchedule => self.validate_service_schedule(),
            WizardStep::ContactLocation => self.validate_contact_location(),
            WizardStep::JobDetails => self.validate_job_details(),
            WizardStep::Review => Ok(()),
        }
    }

    fn validate_service_schedule(&self) -> Result<(), String> {
        if self.draft.service.is_none() {
            return Err("Please select a service".to_string());
        }
        let (Some(date), Some(_)) = (self.draft.preferred_date, self.draft.preferred_time) else {
            return Err("Please choose a preferred date and time".to_string());
        };
        if !self.schedule.is_day_enabled(date) {
            return Err(format!(
                "The provider is not available on {}s. Please pick another date.",
                weekday_name(chrono::Datelike::weekday(&date))
            ));
        }
        Ok(())
    }

    fn validate_contact_location(&self) -> Result<(), String> {
        if self.draft.full_name.trim().is_empty() {
            return Err("Please enter your full name".to_string());
        }
        if !is_valid_mobile(self.draft.phone.trim()) {
            return Err("Enter a valid mobile number (e.g. 9812345678)".to_string());
        }
        if self.draft.email.trim().is_empty() {
            return Err("Please enter your email address".to_string());
        }
        if self.draft.address.trim().len() < 5 {
            return Err("Please enter the full service address".to_string());
        }
        if self.draft.city.trim().is_empty() {
            return Err("Please enter your city".to_string());
        }
        if self.radius_check().blocks_progress() {
            return Err(
                "Set the service location on the map so we can check the provider's coverage"
                    .to_string(),
            );
        }
        Ok(())
    }

    fn validate_job_details(&self) -> Result<(), String> {
        if self.draft.description.trim().is_empty() {
            return Err("Please describe the job".to_string());
        }
        Ok(())
    }

    /// Validate every gated step at once, as done right before submission.
    pub fn validate_all(&self) -> Result<(), String> {
        self.validate_service_schedule()?;
        self.validate_contact_location()?;
        self.validate_job_details()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PriceType, ProviderId};
    use crate::models::default_weekly_schedule;

    fn provider() -> ProviderProfile {
        ProviderProfile {
            id: ProviderId::new(1),
            business_name: "Shrestha Plumbing".to_string(),
            full_name: "Hari Shrestha".to_string(),
            email: "hari@example.com".to_string(),
            phone_number: "9812345678".to_string(),
            city: "Kathmandu".to_string(),
            address: "Baneshwor".to_string(),
            bio: String::new(),
            coordinates: Some(Coordinates::new(27.7172, 85.3240).unwrap()),
            is_verified: true,
            services: vec![ServiceOffering {
                id: ServiceId::new(10),
                title: "Pipe Repair".to_string(),
                description: String::new(),
                base_price: 1500.0,
                price_type: PriceType::Hourly,
                minimum_charge: 500.0,
                estimated_duration: Some(qtty::Hours::new(1.0)),
                service_radius: Some(qtty::Kilometers::new(5.0)),
                requires_site_visit: false,
                emergency_service: false,
                is_active: true,
            }],
        }
    }

    fn wizard() -> BookingWizard {
        BookingWizard::new(provider(), default_weekly_schedule())
    }

    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 8).unwrap()
    }

    fn fill_step_one(w: &mut BookingWizard) {
        w.set_service(ServiceId::new(10));
        w.set_date(tuesday());
        w.set_time(SlotTime::hm(9, 0));
    }

    fn fill_step_two(w: &mut BookingWizard) {
        w.set_full_name("Asha Rai");
        w.set_phone("9812345678");
        w.set_email("asha@example.com");
        w.set_address("Baneshwor, Kathmandu");
        w.set_city("Kathmandu");
        w.set_coordinates(Some(Coordinates::new(27.7200, 85.3300).unwrap()));
    }

    #[test]
    fn test_phone_validation() {
        assert!(is_valid_mobile("9812345678"));
        assert!(is_valid_mobile("9712345678"));
        assert!(is_valid_mobile("+9779812345678"));
        assert!(is_valid_mobile("9779812345678"));
        assert!(is_valid_mobile("9771234567")); // 97-prefixed, not a country code
        assert!(!is_valid_mobile("9912345678"));
        assert!(!is_valid_mobile("981234567"));
        assert!(!is_valid_mobile("98123456789"));
        assert!(!is_valid_mobile("981234567a"));
        assert!(!is_valid_mobile(""));
    }

    #[test]
    fn test_step_one_requires_service_and_datetime() {
        let mut w = wizard();
        assert!(!w.try_next());
        assert_eq!(w.step(), WizardStep::ServiceSchedule);
        assert!(w.error().is_some());

        w.set_service(ServiceId::new(10));
        assert!(w.error().is_none()); // edit cleared the error
        assert!(!w.try_next());
        assert!(w.error().unwrap().contains("date and time"));

        w.set_date(tuesday());
        w.set_time(SlotTime::hm(9, 0));
        assert!(w.try_next());
        assert_eq!(w.step(), WizardStep::ContactLocation);
    }

    #[test]
    fn test_step_one_rejects_disabled_day() {
        let mut w = wizard();
        w.set_service(ServiceId::new(10));
        w.set_date(NaiveDate::from_ymd_opt(2025, 7, 12).unwrap()); // Saturday
        w.set_time(SlotTime::hm(9, 0));
        assert!(!w.try_next());
        assert!(w.error().unwrap().contains("Saturday"));
    }

    #[test]
    fn test_step_two_field_gates() {
        let mut w = wizard();
        fill_step_one(&mut w);
        assert!(w.try_next());

        assert!(!w.try_next());
        assert!(w.error().unwrap().contains("full name"));

        w.set_full_name("Asha Rai");
        w.set_phone("12345");
        assert!(!w.try_next());
        assert!(w.error().unwrap().contains("mobile number"));

        w.set_phone("9812345678");
        assert!(!w.try_next());
        assert!(w.error().unwrap().contains("email"));

        w.set_email("asha@example.com");
        w.set_address("abc");
        assert!(!w.try_next());
        assert!(w.error().unwrap().contains("address"));

        w.set_address("Baneshwor, Kathmandu");
        assert!(!w.try_next());
        assert!(w.error().unwrap().contains("city"));

        w.set_city("Kathmandu");
        // Radius declared, coordinates still missing: blocked.
        assert!(!w.try_next());
        assert!(w.error().unwrap().contains("location"));

        w.set_coordinates(Some(Coordinates::new(27.7200, 85.3300).unwrap()));
        assert!(w.try_next());
        assert_eq!(w.step(), WizardStep::JobDetails);
    }

    #[test]
    fn test_out_of_radius_warns_but_does_not_block() {
        let mut w = wizard();
        fill_step_one(&mut w);
        assert!(w.try_next());
        fill_step_two(&mut w);
        // ~7.3 km away from the provider, radius is 5 km.
        w.set_coordinates(Some(Coordinates::new(27.7830, 85.3240).unwrap()));

        assert!(w.radius_check().warning().is_some());
        assert!(w.try_next());
        assert_eq!(w.step(), WizardStep::JobDetails);
    }

    #[test]
    fn test_step_three_requires_description() {
        let mut w = wizard();
        fill_step_one(&mut w);
        assert!(w.try_next());
        fill_step_two(&mut w);
        assert!(w.try_next());

        w.set_description("   ");
        assert!(!w.try_next());
        assert!(w.error().unwrap().contains("describe"));

        w.set_description("Kitchen sink is leaking under the counter");
        assert!(w.try_next());
        assert_eq!(w.step(), WizardStep::Review);
    }

    #[test]
    fn test_back_is_unconditional() {
        let mut w = wizard();
        fill_step_one(&mut w);
        assert!(w.try_next());
        w.back();
        assert_eq!(w.step(), WizardStep::ServiceSchedule);
        w.back();
        assert_eq!(w.step(), WizardStep::ServiceSchedule);
    }

    #[test]
    fn test_attach_image_limits() {
        let mut w = wizard();
        let image = |name: &str| ImageUpload {
            file_name: name.to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![0u8; 128],
        };
        for i in 0..3 {
            w.attach_image(image(&format!("photo{}.jpg", i))).unwrap();
        }
        assert!(w.attach_image(image("one-too-many.jpg")).is_err());

        let mut w = wizard();
        assert!(w
            .attach_image(ImageUpload {
                file_name: "notes.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                bytes: vec![0u8; 128],
            })
            .is_err());
        assert!(w
            .attach_image(ImageUpload {
                file_name: "huge.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                bytes: vec![0u8; MAX_IMAGE_SIZE_BYTES + 1],
            })
            .is_err());
    }

    #[test]
    fn test_timing_warnings() {
        let mut w = wizard();
        w.set_service(ServiceId::new(10));

        // 2025-07-08 06:15 UTC == 12:00 NPT.
        let now = chrono::DateTime::parse_from_rfc3339("2025-07-08T06:15:00Z")
            .unwrap()
            .with_timezone(&Utc);

        w.set_date(tuesday());
        w.set_time(SlotTime::hm(9, 0)); // earlier the same day
        assert!(w.timing_warning(now).unwrap().contains("past"));

        w.set_time(SlotTime::hm(12, 30)); // 30 minutes ahead, non-emergency
        assert!(w.timing_warning(now).unwrap().contains("1 hour"));

        w.set_time(SlotTime::hm(15, 0));
        assert!(w.timing_warning(now).is_none());

        w.set_date(tuesday() + Duration::days(10));
        w.set_time(SlotTime::hm(9, 0));
        assert!(w.timing_warning(now).unwrap().contains("days in advance"));
    }
}
