//! Catalog access: providers, their availability and their booked slots.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::ClientResult;
use crate::api::{AvailabilityResponse, BookedSlot, ProviderId, ProviderProfile};

/// Read-only access to providers and their calendars.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch a provider's public profile including offered services.
    ///
    /// # Returns
    /// * `Ok(ProviderProfile)` - the provider with its service list
    /// * `Err(ClientError::NotFound)` - no active provider with that id
    async fn fetch_provider(&self, provider: ProviderId) -> ClientResult<ProviderProfile>;

    /// Fetch a provider's weekly schedule and booking settings.
    ///
    /// Providers who never saved availability get the platform default
    /// schedule, never an error.
    async fn fetch_availability(&self, provider: ProviderId) -> ClientResult<AvailabilityResponse>;

    /// Fetch the times already reserved for a provider on one date.
    ///
    /// Only bookings the provider has accepted (confirmed, scheduled or in
    /// progress) block slots; pending requests do not.
    async fn fetch_booked_slots(
        &self,
        provider: ProviderId,
        date: NaiveDate,
    ) -> ClientResult<Vec<BookedSlot>>;
}
