//! In-memory backend for unit testing and local development.
//!
//! Mirrors the real backend's observable behavior: booking creation
//! enforces the timing rules, lifecycle endpoints enforce the transition
//! table, image uploads enforce the per-kind limits, and booked slots are
//! derived from accepted bookings only.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use parking_lot::RwLock;

use crate::api::{
    AvailabilityResponse, BookedSlot, Booking, BookingId, BookingImage, BookingRequest,
    Coordinates, ImageId, ImageKind, ImageUpload, PriceType, ProviderId, ProviderProfile,
    ServiceId, ServiceOffering, MAX_ADVANCE_BOOKING_DAYS, MAX_IMAGE_SIZE_BYTES,
    MIN_ADVANCE_MINUTES, MIN_ADVANCE_MINUTES_EMERGENCY,
};
use crate::models::status::{transition, BookingAction, BookingStatus};
use crate::models::time::nepal_offset;
use crate::models::{default_weekly_schedule, SlotTime};
use crate::remote::bookings::BookingApi;
use crate::remote::catalog::CatalogApi;
use crate::remote::error::{ClientError, ClientResult, ErrorContext};
use crate::remote::geocode::GeocodeApi;

/// Provider present in the seeded data set.
pub const SEED_PROVIDER_ID: ProviderId = ProviderId(1);
/// Hourly plumbing service offered by the seeded provider.
pub const SEED_SERVICE_ID: ServiceId = ServiceId(10);
/// Emergency service offered by the seeded provider.
pub const SEED_EMERGENCY_SERVICE_ID: ServiceId = ServiceId(11);

#[derive(Default)]
struct LocalState {
    providers: HashMap<ProviderId, ProviderProfile>,
    availability: HashMap<ProviderId, AvailabilityResponse>,
    bookings: HashMap<BookingId, Booking>,
    durations: HashMap<BookingId, u32>,
    images: HashMap<BookingId, Vec<BookingImage>>,
    next_booking_id: i64,
    next_image_id: i64,
}

/// In-memory marketplace backend.
pub struct LocalClient {
    state: RwLock<LocalState>,
}

impl Default for LocalClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalClient {
    /// Create an empty backend with no providers.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LocalState {
                next_booking_id: 1,
                next_image_id: 1,
                ..LocalState::default()
            }),
        }
    }

    /// Create a backend seeded with a plumber and an electrician in the
    /// Kathmandu valley.
    pub fn seeded() -> Self {
        let client = Self::new();

        client.insert_provider(
            ProviderProfile {
                id: SEED_PROVIDER_ID,
                business_name: "Shrestha Plumbing Services".to_string(),
                full_name: "Hari Shrestha".to_string(),
                email: "hari@shresthaplumbing.com.np".to_string(),
                phone_number: "9841000001".to_string(),
                city: "Kathmandu".to_string(),
                address: "Naya Baneshwor, Kathmandu".to_string(),
                bio: "Licensed plumber, 12 years of residential work.".to_string(),
                coordinates: Some(Coordinates {
                    lat: 27.7172,
                    lng: 85.3240,
                }),
                is_verified: true,
                services: vec![
                    ServiceOffering {
                        id: SEED_SERVICE_ID,
                        title: "Pipe & Fitting Repair".to_string(),
                        description: "Leak detection and repair for kitchens and bathrooms."
                            .to_string(),
                        base_price: 1500.0,
                        price_type: PriceType::Hourly,
                        minimum_charge: 500.0,
                        estimated_duration: Some(qtty::Hours::new(1.0)),
                        service_radius: Some(qtty::Kilometers::new(5.0)),
                        requires_site_visit: false,
                        emergency_service: false,
                        is_active: true,
                    },
                    ServiceOffering {
                        id: SEED_EMERGENCY_SERVICE_ID,
                        title: "Emergency Drain Cleaning".to_string(),
                        description: "24/7 call-out for blocked drains.".to_string(),
                        base_price: 2500.0,
                        price_type: PriceType::Fixed,
                        minimum_charge: 1000.0,
                        estimated_duration: Some(qtty::Hours::new(2.0)),
                        service_radius: Some(qtty::Kilometers::new(10.0)),
                        requires_site_visit: false,
                        emergency_service: true,
                        is_active: true,
                    },
                ],
            },
            AvailabilityResponse {
                weekly_schedule: default_weekly_schedule(),
                settings: Default::default(),
            },
        );

        client.insert_provider(
            ProviderProfile {
                id: ProviderId(2),
                business_name: "Gurung Electric Works".to_string(),
                full_name: "Maya Gurung".to_string(),
                email: "maya@gurungelectric.com.np".to_string(),
                phone_number: "9841000002".to_string(),
                city: "Lalitpur".to_string(),
                address: "Pulchowk, Lalitpur".to_string(),
                bio: String::new(),
                coordinates: Some(Coordinates {
                    lat: 27.6588,
                    lng: 85.3247,
                }),
                is_verified: true,
                services: vec![ServiceOffering {
                    id: ServiceId(20),
                    title: "House Wiring Inspection".to_string(),
                    description: String::new(),
                    base_price: 1200.0,
                    price_type: PriceType::Fixed,
                    minimum_charge: 0.0,
                    estimated_duration: Some(qtty::Hours::new(1.5)),
                    service_radius: Some(qtty::Kilometers::new(8.0)),
                    requires_site_visit: true,
                    emergency_service: false,
                    is_active: true,
                }],
            },
            AvailabilityResponse::default(),
        );

        client
    }

    /// Register a provider with its availability.
    pub fn insert_provider(&self, profile: ProviderProfile, availability: AvailabilityResponse) {
        let mut state = self.state.write();
        state.availability.insert(profile.id, availability);
        state.providers.insert(profile.id, profile);
    }

    fn now_npt(&self) -> DateTime<chrono::FixedOffset> {
        Utc::now().with_timezone(&nepal_offset())
    }

    fn apply_action(
        &self,
        booking_id: BookingId,
        action: BookingAction,
        mutate: impl FnOnce(&mut Booking),
    ) -> ClientResult<Booking> {
        let mut state = self.state.write();
        let booking = state.bookings.get_mut(&booking_id).ok_or_else(|| {
            ClientError::not_found_with_context(
                "booking not found",
                ErrorContext::new("transition")
                    .with_entity("booking")
                    .with_entity_id(booking_id),
            )
        })?;

        let next = transition(booking.status, action).map_err(|e| {
            ClientError::validation_with_context(
                e.to_string(),
                ErrorContext::new("transition")
                    .with_entity("booking")
                    .with_entity_id(booking_id),
            )
        })?;
        booking.status = next;
        mutate(booking);
        Ok(booking.clone())
    }

    fn validate_timing(&self, request: &BookingRequest, emergency: bool) -> ClientResult<()> {
        let now = self.now_npt();
        let requested = request
            .preferred_date
            .and_time(request.preferred_time.to_naive())
            .and_local_timezone(nepal_offset())
            .single()
            .ok_or_else(|| ClientError::validation("Invalid preferred date/time"))?;

        if requested <= now {
            return Err(ClientError::validation(format!(
                "Selected time is in the past. Current Nepal time: {}",
                now.format("%Y-%m-%d %H:%M:%S")
            )));
        }

        let lead = requested - now;
        if lead > Duration::days(MAX_ADVANCE_BOOKING_DAYS) {
            return Err(ClientError::validation(format!(
                "Bookings can only be made up to {} days in advance",
                MAX_ADVANCE_BOOKING_DAYS
            )));
        }

        let (min_minutes, label) = if emergency {
            (MIN_ADVANCE_MINUTES_EMERGENCY, "30 minutes")
        } else {
            (MIN_ADVANCE_MINUTES, "1 hour")
        };
        if lead < Duration::minutes(min_minutes) {
            return Err(ClientError::validation(format!(
                "You must book at least {} before the service time",
                label
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogApi for LocalClient {
    async fn fetch_provider(&self, provider: ProviderId) -> ClientResult<ProviderProfile> {
        self.state
            .read()
            .providers
            .get(&provider)
            .cloned()
            .ok_or_else(|| {
                ClientError::not_found_with_context(
                    "provider not found",
                    ErrorContext::new("fetch_provider")
                        .with_entity("provider")
                        .with_entity_id(provider),
                )
            })
    }

    async fn fetch_availability(&self, provider: ProviderId) -> ClientResult<AvailabilityResponse> {
        let state = self.state.read();
        if !state.providers.contains_key(&provider) {
            return Err(ClientError::not_found_with_context(
                "provider not found",
                ErrorContext::new("fetch_availability")
                    .with_entity("provider")
                    .with_entity_id(provider),
            ));
        }
        // Providers without saved availability get the platform default.
        Ok(state
            .availability
            .get(&provider)
            .cloned()
            .unwrap_or_else(|| AvailabilityResponse {
                weekly_schedule: default_weekly_schedule(),
                settings: Default::default(),
            }))
    }

    async fn fetch_booked_slots(
        &self,
        provider: ProviderId,
        date: NaiveDate,
    ) -> ClientResult<Vec<BookedSlot>> {
        let state = self.state.read();
        let buffer_minutes = state
            .availability
            .get(&provider)
            .map(|a| a.settings.buffer_minutes)
            .unwrap_or(15);

        let mut slots: Vec<BookedSlot> = state
            .bookings
            .values()
            .filter(|b| {
                b.provider == provider
                    && b.preferred_date == date
                    && matches!(
                        b.status,
                        BookingStatus::Confirmed
                            | BookingStatus::Scheduled
                            | BookingStatus::InProgress
                    )
            })
            .map(|b| {
                let duration = state.durations.get(&b.id).copied().unwrap_or(60);
                BookedSlot {
                    time: b.preferred_time,
                    end_time: Some(b.preferred_time.add_minutes(duration)),
                    end_time_with_buffer: Some(
                        b.preferred_time.add_minutes(duration + buffer_minutes),
                    ),
                    duration_minutes: Some(duration),
                    status: Some(b.status),
                }
            })
            .collect();
        slots.sort_by_key(|s| s.time);
        Ok(slots)
    }
}

#[async_trait]
impl BookingApi for LocalClient {
    async fn create_booking(&self, request: &BookingRequest) -> ClientResult<Booking> {
        let (provider_id, service) = {
            let state = self.state.read();
            state
                .providers
                .values()
                .find_map(|p| p.service(request.service).map(|s| (p.id, s.clone())))
                .ok_or_else(|| {
                    ClientError::not_found_with_context(
                        "service not found",
                        ErrorContext::new("create_booking")
                            .with_entity("service")
                            .with_entity_id(request.service),
                    )
                })?
        };

        self.validate_timing(request, service.emergency_service || request.emergency)?;

        let duration_minutes = request
            .estimated_hours
            .map(|h| (h.value() * 60.0).round() as u32)
            .or_else(|| {
                service
                    .estimated_duration
                    .map(|h| (h.value() * 60.0).round() as u32)
            })
            .unwrap_or(60);

        let mut state = self.state.write();
        let id = BookingId(state.next_booking_id);
        state.next_booking_id += 1;

        let booking = Booking {
            id,
            service: request.service,
            provider: provider_id,
            status: BookingStatus::Pending,
            preferred_date: request.preferred_date,
            preferred_time: request.preferred_time,
            scheduled_date: None,
            scheduled_time: None,
            service_address: request.service_address.clone(),
            service_city: request.service_city.clone(),
            description: request.description.clone(),
            special_instructions: request.special_instructions.clone(),
            customer_name: request.customer_name.clone(),
            customer_phone: request.customer_phone.clone(),
            quoted_price: None,
            final_price: None,
            cancellation_reason: None,
            dispute_reason: None,
            created_at: Utc::now(),
        };
        state.durations.insert(id, duration_minutes);
        state.bookings.insert(id, booking.clone());
        Ok(booking)
    }

    async fn fetch_booking(&self, booking: BookingId) -> ClientResult<Booking> {
        self.state
            .read()
            .bookings
            .get(&booking)
            .cloned()
            .ok_or_else(|| {
                ClientError::not_found_with_context(
                    "booking not found",
                    ErrorContext::new("fetch_booking")
                        .with_entity("booking")
                        .with_entity_id(booking),
                )
            })
    }

    async fn my_bookings(&self) -> ClientResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self.state.read().bookings.values().cloned().collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(bookings)
    }

    async fn upload_images(
        &self,
        booking: BookingId,
        kind: ImageKind,
        images: &[ImageUpload],
        description: Option<&str>,
    ) -> ClientResult<Vec<BookingImage>> {
        if images.is_empty() {
            return Err(ClientError::validation("No images provided"));
        }

        let mut state = self.state.write();
        if !state.bookings.contains_key(&booking) {
            return Err(ClientError::not_found_with_context(
                "booking not found",
                ErrorContext::new("upload_images")
                    .with_entity("booking")
                    .with_entity_id(booking),
            ));
        }

        let existing = state
            .images
            .get(&booking)
            .map(|all| all.iter().filter(|i| i.image_type == kind).count())
            .unwrap_or(0);
        if existing + images.len() > kind.max_per_booking() {
            return Err(ClientError::validation(format!(
                "Maximum {} {} images allowed per booking",
                kind.max_per_booking(),
                kind.as_str()
            )));
        }

        for image in images {
            if !image.content_type.starts_with("image/") {
                return Err(ClientError::validation("Only image files are allowed"));
            }
            if image.bytes.len() > MAX_IMAGE_SIZE_BYTES {
                return Err(ClientError::validation("Image size must be less than 5MB"));
            }
        }

        let mut created = Vec::with_capacity(images.len());
        for image in images {
            let id = ImageId(state.next_image_id);
            state.next_image_id += 1;
            let extension = image
                .file_name
                .rsplit_once('.')
                .map(|(_, ext)| ext)
                .unwrap_or("jpg");
            let record = BookingImage {
                id,
                booking,
                image_type: kind,
                url: format!(
                    "local://bookings/booking_{}/{}_{}.{}",
                    booking,
                    kind.as_str(),
                    id,
                    extension
                ),
                description: description
                    .filter(|d| !d.is_empty())
                    .map(|d| d.to_string()),
                uploaded_at: Utc::now(),
            };
            state.images.entry(booking).or_default().push(record.clone());
            created.push(record);
        }
        Ok(created)
    }

    async fn cancel_booking(&self, booking: BookingId, reason: &str) -> ClientResult<Booking> {
        let reason = reason.to_string();
        self.apply_action(booking, BookingAction::Cancel, move |b| {
            b.cancellation_reason = Some(reason);
        })
    }

    async fn accept_booking(&self, booking: BookingId) -> ClientResult<Booking> {
        self.apply_action(booking, BookingAction::Accept, |_| {})
    }

    async fn decline_booking(&self, booking: BookingId, reason: &str) -> ClientResult<Booking> {
        let reason = reason.to_string();
        self.apply_action(booking, BookingAction::Decline, move |b| {
            b.cancellation_reason = Some(reason);
        })
    }

    async fn schedule_booking(
        &self,
        booking: BookingId,
        date: NaiveDate,
        time: SlotTime,
    ) -> ClientResult<Booking> {
        self.apply_action(booking, BookingAction::Schedule, move |b| {
            b.scheduled_date = Some(date);
            b.scheduled_time = Some(time);
        })
    }

    async fn start_booking(&self, booking: BookingId) -> ClientResult<Booking> {
        self.apply_action(booking, BookingAction::Start, |_| {})
    }

    async fn complete_booking(
        &self,
        booking: BookingId,
        final_price: Option<f64>,
    ) -> ClientResult<Booking> {
        self.apply_action(booking, BookingAction::Complete, move |b| {
            if final_price.is_some() {
                b.final_price = final_price;
            }
        })
    }

    async fn dispute_booking(
        &self,
        booking: BookingId,
        reason: &str,
        _note: Option<&str>,
    ) -> ClientResult<Booking> {
        let reason = reason.trim().to_string();
        if reason.is_empty() {
            return Err(ClientError::validation("A dispute reason is required"));
        }
        self.apply_action(booking, BookingAction::Dispute, move |b| {
            b.dispute_reason = Some(reason);
        })
    }
}

#[async_trait]
impl GeocodeApi for LocalClient {
    async fn geocode(&self, address: &str, city: &str) -> ClientResult<Option<Coordinates>> {
        // Small gazetteer covering the seeded area.
        const PLACES: [(&str, f64, f64); 4] = [
            ("kathmandu", 27.7172, 85.3240),
            ("lalitpur", 27.6588, 85.3247),
            ("bhaktapur", 27.6710, 85.4298),
            ("pokhara", 28.2096, 83.9856),
        ];

        let haystack = format!("{} {}", address, city).to_lowercase();
        Ok(PLACES
            .iter()
            .find(|(name, _, _)| haystack.contains(name))
            .map(|&(_, lat, lng)| Coordinates { lat, lng }))
    }
}
