//! Booking submission orchestration.
//!
//! Turns a finished wizard draft into one create-booking request, submits
//! it, and then uploads any attached photos as "before" imagery. The photo
//! upload is best-effort: its failure is reported but never rolls back or
//! invalidates the booking that was already created.

use sha2::{Digest, Sha256};

use crate::api::{Booking, BookingImage, BookingRequest, ImageKind, ImageUpload};
use crate::remote::bookings::BookingApi;
use crate::remote::error::ClientResult;
use crate::services::wizard::BookingWizard;

/// SHA-256 fingerprint of the canonical serialized request.
///
/// Two submissions of an identical draft produce the same fingerprint,
/// letting callers detect an accidental double-submit before it hits the
/// backend.
pub fn request_fingerprint(request: &BookingRequest) -> ClientResult<String> {
    let canonical = serde_json::to_string(request)?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Assemble the create-booking request from a wizard whose steps all pass.
///
/// # Returns
/// * `Ok(BookingRequest)` - ready to submit
/// * `Err(String)` - the first step validation message, for display
pub fn assemble_request(wizard: &BookingWizard) -> Result<BookingRequest, String> {
    wizard.validate_all()?;
    let draft = wizard.draft();

    let service = wizard
        .selected_service()
        .ok_or_else(|| "Please select a service".to_string())?;
    let (service_id, date, time) = match (draft.service, draft.preferred_date, draft.preferred_time)
    {
        (Some(service), Some(date), Some(time)) => (service, date, time),
        _ => return Err("Please choose a preferred date and time".to_string()),
    };

    let special_instructions = draft.special_instructions.trim();
    Ok(BookingRequest {
        service: service_id,
        preferred_date: date,
        preferred_time: time,
        service_address: draft.address.trim().to_string(),
        service_city: draft.city.trim().to_string(),
        service_district: draft.district.clone(),
        latitude: draft.coordinates.map(|c| c.lat),
        longitude: draft.coordinates.map(|c| c.lng),
        description: draft.description.trim().to_string(),
        special_instructions: (!special_instructions.is_empty())
            .then(|| special_instructions.to_string()),
        customer_name: draft.full_name.trim().to_string(),
        customer_phone: draft.phone.trim().to_string(),
        emergency: draft.emergency || service.emergency_service,
        estimated_hours: draft.estimated_hours.map(qtty::Hours::new),
    })
}

/// What happened to the secondary photo upload.
#[derive(Debug)]
pub enum ImageUploadOutcome {
    /// No photos were attached.
    NothingToUpload,
    Uploaded(Vec<BookingImage>),
    /// The booking exists but its photos did not make it. Not retried
    /// automatically; the message is surfaced as a warning.
    Failed(String),
}

impl ImageUploadOutcome {
    /// Warning text for display, if the upload failed.
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::Failed(message) => Some(format!(
                "Your booking was created, but the photos could not be uploaded: {}",
                message
            )),
            _ => None,
        }
    }
}

/// Result of a successful submission.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub booking: Booking,
    pub images: ImageUploadOutcome,
}

/// Submit the assembled request, then upload attachments best-effort.
///
/// A failure of the primary call returns `Err` and creates nothing; the
/// caller stays on the review step. A failure of the photo upload is
/// recorded in the outcome and logged, never propagated.
pub async fn submit_booking(
    api: &dyn BookingApi,
    request: &BookingRequest,
    attachments: &[ImageUpload],
) -> ClientResult<SubmissionOutcome> {
    let booking = api.create_booking(request).await?;

    let images = if attachments.is_empty() {
        ImageUploadOutcome::NothingToUpload
    } else {
        match api
            .upload_images(booking.id, ImageKind::Before, attachments, None)
            .await
        {
            Ok(records) => ImageUploadOutcome::Uploaded(records),
            Err(error) => {
                log::warn!(
                    "booking {} created but before-image upload failed: {}",
                    booking.id,
                    error
                );
                ImageUploadOutcome::Failed(error.to_string())
            }
        }
    };

    Ok(SubmissionOutcome { booking, images })
}
