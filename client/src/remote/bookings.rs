//! Booking operations: creation, images and lifecycle transitions.
//!
//! Each lifecycle method maps to a backend endpoint named after the action.
//! The backend enforces the same transition table as
//! [`crate::models::status::transition`]; implementations surface its
//! refusals as `ClientError::ValidationError`.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::ClientResult;
use crate::api::{
    Booking, BookingId, BookingImage, BookingRequest, ImageKind, ImageUpload,
};
use crate::models::SlotTime;

/// Booking creation and lifecycle operations.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Create a new booking. The created booking starts out pending.
    async fn create_booking(&self, request: &BookingRequest) -> ClientResult<Booking>;

    /// Fetch one booking with full details.
    async fn fetch_booking(&self, booking: BookingId) -> ClientResult<Booking>;

    /// Fetch the caller's bookings, newest first.
    async fn my_bookings(&self) -> ClientResult<Vec<Booking>>;

    /// Upload photos for a booking.
    ///
    /// # Arguments
    /// * `booking` - the booking the photos belong to
    /// * `kind` - when the photos were taken (before/during/after)
    /// * `images` - the image payloads, all sent in one request
    /// * `description` - optional text shown with the photos
    ///
    /// # Returns
    /// * `Ok(Vec<BookingImage>)` - the stored image records
    /// * `Err(ClientError::ValidationError)` - count or size limit exceeded
    async fn upload_images(
        &self,
        booking: BookingId,
        kind: ImageKind,
        images: &[ImageUpload],
        description: Option<&str>,
    ) -> ClientResult<Vec<BookingImage>>;

    /// Cancel a booking (either party, while still cancellable).
    async fn cancel_booking(&self, booking: BookingId, reason: &str) -> ClientResult<Booking>;

    /// Provider accepts a pending booking.
    async fn accept_booking(&self, booking: BookingId) -> ClientResult<Booking>;

    /// Provider declines a pending booking.
    async fn decline_booking(&self, booking: BookingId, reason: &str) -> ClientResult<Booking>;

    /// Provider fixes the date and time of a confirmed booking.
    async fn schedule_booking(
        &self,
        booking: BookingId,
        date: NaiveDate,
        time: SlotTime,
    ) -> ClientResult<Booking>;

    /// Provider starts work.
    async fn start_booking(&self, booking: BookingId) -> ClientResult<Booking>;

    /// Provider marks the job done, optionally adjusting the final price.
    async fn complete_booking(
        &self,
        booking: BookingId,
        final_price: Option<f64>,
    ) -> ClientResult<Booking>;

    /// Customer disputes a completed job. A reason is required.
    async fn dispute_booking(
        &self,
        booking: BookingId,
        reason: &str,
        note: Option<&str>,
    ) -> ClientResult<Booking>;
}
