//! Data Transfer Objects exchanged with the marketplace backend.
//!
//! This file consolidates the wire types for the REST API.
//! All types derive Serialize/Deserialize for JSON serialization.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::define_id_type;
use crate::models::{BookingStatus, SlotTime, WeeklySchedule};

define_id_type!(i64, ProviderId);
define_id_type!(i64, ServiceId);
define_id_type!(i64, BookingId);
define_id_type!(i64, ImageId);

pub use crate::models::time::nepal_offset;

/// Image upload constraints enforced by the backend and mirrored client-side.
pub const MAX_BEFORE_IMAGES: usize = 3;
pub const MAX_DURING_IMAGES: usize = 5;
pub const MAX_AFTER_IMAGES: usize = 3;
pub const MAX_IMAGE_SIZE_BYTES: usize = 5 * 1024 * 1024;

/// Bookings may be placed at most this many days ahead.
pub const MAX_ADVANCE_BOOKING_DAYS: i64 = 5;
/// Minimum lead time for a normal service.
pub const MIN_ADVANCE_MINUTES: i64 = 60;
/// Minimum lead time for an emergency service.
pub const MIN_ADVANCE_MINUTES_EMERGENCY: i64 = 30;

/// Geographic point (latitude, longitude) in decimal degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err("Latitude must be between -90 and 90 degrees".to_string());
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err("Longitude must be between -180 and 180 degrees".to_string());
        }
        Ok(Self { lat, lng })
    }
}

/// How a service is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    Fixed,
    Hourly,
    Negotiable,
}

/// A service offered by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub id: ServiceId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Base price in NRS
    pub base_price: f64,
    pub price_type: PriceType,
    /// Minimum charge / call-out fee in NRS
    #[serde(default)]
    pub minimum_charge: f64,
    /// Estimated duration of one job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<qtty::Hours>,
    /// Maximum distance the provider travels for this service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_radius: Option<qtty::Kilometers>,
    #[serde(default)]
    pub requires_site_visit: bool,
    #[serde(default)]
    pub emergency_service: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// A provider's public profile, as served by the provider-detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub id: ProviderId,
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub services: Vec<ServiceOffering>,
}

impl ProviderProfile {
    /// Find one of the provider's services by id.
    pub fn service(&self, id: ServiceId) -> Option<&ServiceOffering> {
        self.services.iter().find(|s| s.id == id)
    }
}

/// Booking-rule settings attached to a provider's availability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySettings {
    /// Minutes of buffer kept free after each booked job
    #[serde(default = "default_buffer_minutes")]
    pub buffer_minutes: u32,
    /// How many days ahead bookings are accepted
    #[serde(default = "default_max_advance_days")]
    pub max_advance_days: u32,
    #[serde(default)]
    pub emergency_availability: bool,
}

fn default_buffer_minutes() -> u32 {
    15
}

fn default_max_advance_days() -> u32 {
    MAX_ADVANCE_BOOKING_DAYS as u32
}

impl Default for AvailabilitySettings {
    fn default() -> Self {
        Self {
            buffer_minutes: default_buffer_minutes(),
            max_advance_days: default_max_advance_days(),
            emergency_availability: false,
        }
    }
}

/// Response of the public availability endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    #[serde(default)]
    pub weekly_schedule: WeeklySchedule,
    #[serde(default)]
    pub settings: AvailabilitySettings,
}

/// A time already reserved for a provider on a given date.
///
/// Fetched fresh whenever the selected date changes; never cached across
/// dates. Only bookings the provider has accepted block slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedSlot {
    pub time: SlotTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<SlotTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time_with_buffer: Option<SlotTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
}

impl BookedSlot {
    pub fn at(time: SlotTime) -> Self {
        Self {
            time,
            end_time: None,
            end_time_with_buffer: None,
            duration_minutes: None,
            status: None,
        }
    }
}

/// Response of the booked-slots endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedSlotsResponse {
    pub date: NaiveDate,
    pub booked_slots: Vec<BookedSlot>,
}

/// The create-booking request assembled from a finished wizard draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub service: ServiceId,
    pub preferred_date: NaiveDate,
    pub preferred_time: SlotTime,
    pub service_address: String,
    pub service_city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub emergency: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<qtty::Hours>,
}

/// A booking as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub service: ServiceId,
    pub provider: ProviderId,
    pub status: BookingStatus,
    pub preferred_date: NaiveDate,
    pub preferred_time: SlotTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<SlotTime>,
    pub service_address: String,
    pub service_city: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoted_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispute_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// When a booking photo was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    Before,
    During,
    After,
}

impl ImageKind {
    /// Per-booking upload limit for this kind.
    pub fn max_per_booking(&self) -> usize {
        match self {
            Self::Before => MAX_BEFORE_IMAGES,
            Self::During => MAX_DURING_IMAGES,
            Self::After => MAX_AFTER_IMAGES,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::During => "during",
            Self::After => "after",
        }
    }
}

/// An image payload staged for upload. Never serialized as JSON; the bytes
/// go out as one part of a multipart request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A stored booking image record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingImage {
    pub id: ImageId,
    pub booking: BookingId,
    pub image_type: ImageKind,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}
