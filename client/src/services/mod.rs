//! Booking rules and orchestration.
//!
//! Everything in this module is side-effect free except [`submission`] and
//! [`session`], which drive the remote API traits.

pub mod distance;
pub mod session;
pub mod slots;
pub mod submission;
pub mod wizard;

pub use distance::{check_service_radius, haversine_distance, RadiusCheck};
pub use session::BookingSession;
pub use slots::{
    alternative_dates, build_slot_grid, day_unavailable_reason, is_slot_available, time_slots,
    AlternativeDate, TimeSlot,
};
pub use submission::{
    assemble_request, request_fingerprint, submit_booking, ImageUploadOutcome, SubmissionOutcome,
};
pub use wizard::{is_valid_mobile, BookingDraft, BookingWizard, WizardStep};
