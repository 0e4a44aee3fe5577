//! Booking-page session state.
//!
//! Owns the provider context and the booked-slot list for the currently
//! selected date. Booked slots are fetched fresh on every date change and
//! never cached across dates.
//!
//! Date changes can outrun their fetches. Every change bumps a generation
//! counter and hands out a token; a response is applied only while its
//! token is still current, so a late-arriving response for a stale date can
//! never overwrite the grid of the date selected after it.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::api::{AvailabilityResponse, BookedSlot, ProviderId, ProviderProfile};
use crate::models::WeeklySchedule;
use crate::remote::catalog::CatalogApi;
use crate::remote::error::ClientResult;
use crate::services::slots::{build_slot_grid, day_unavailable_reason, TimeSlot};
use crate::services::wizard::BookingWizard;

/// Token identifying one date-change fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken {
    generation: u64,
    date: NaiveDate,
}

/// State behind one booking page visit.
pub struct BookingSession {
    catalog: Arc<dyn CatalogApi>,
    provider: ProviderProfile,
    availability: AvailabilityResponse,
    selected_date: Option<NaiveDate>,
    booked: Vec<BookedSlot>,
    generation: u64,
}

impl BookingSession {
    /// Fetch provider profile and availability together and open a session.
    ///
    /// Both fetches block page readiness, so they run concurrently.
    pub async fn load(catalog: Arc<dyn CatalogApi>, provider: ProviderId) -> ClientResult<Self> {
        let (profile, availability) = futures::future::try_join(
            catalog.fetch_provider(provider),
            catalog.fetch_availability(provider),
        )
        .await?;

        Ok(Self {
            catalog,
            provider: profile,
            availability,
            selected_date: None,
            booked: Vec::new(),
            generation: 0,
        })
    }

    pub fn provider(&self) -> &ProviderProfile {
        &self.provider
    }

    pub fn schedule(&self) -> &WeeklySchedule {
        &self.availability.weekly_schedule
    }

    pub fn availability(&self) -> &AvailabilityResponse {
        &self.availability
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    /// Booked slots for the currently selected date.
    pub fn booked_slots(&self) -> &[BookedSlot] {
        &self.booked
    }

    /// Record a date change and get the token the matching fetch must
    /// present. Any outstanding older token becomes stale immediately.
    pub fn begin_date_change(&mut self, date: NaiveDate) -> FetchToken {
        self.generation += 1;
        self.selected_date = Some(date);
        self.booked.clear();
        FetchToken {
            generation: self.generation,
            date,
        }
    }

    /// Apply a fetched booked-slot list if its token is still current.
    ///
    /// Returns `false` when the response was stale and discarded.
    pub fn apply_booked_slots(&mut self, token: FetchToken, slots: Vec<BookedSlot>) -> bool {
        if token.generation != self.generation {
            log::debug!(
                "discarding stale booked-slot response for {} (generation {} != {})",
                token.date,
                token.generation,
                self.generation
            );
            return false;
        }
        self.booked = slots;
        true
    }

    /// Select a date and fetch its booked slots.
    pub async fn select_date(&mut self, date: NaiveDate) -> ClientResult<()> {
        let token = self.begin_date_change(date);
        let slots = self
            .catalog
            .fetch_booked_slots(self.provider.id, date)
            .await?;
        self.apply_booked_slots(token, slots);
        Ok(())
    }

    /// The slot grid for the current selection, recomputed on every call.
    pub fn slot_grid(&self) -> Vec<TimeSlot> {
        build_slot_grid(self.schedule(), &self.booked, self.selected_date)
    }

    /// Day-level closure reason for the current selection, if any.
    pub fn day_unavailable_reason(&self) -> Option<String> {
        day_unavailable_reason(self.schedule(), self.selected_date)
    }

    /// Start a wizard for this provider.
    pub fn start_wizard(&self) -> BookingWizard {
        BookingWizard::new(self.provider.clone(), self.schedule().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::BookedSlot;
    use crate::models::SlotTime;

    fn empty_session() -> BookingSession {
        // A session with no catalog calls needed: state-only tests.
        struct NoCatalog;
        #[async_trait::async_trait]
        impl CatalogApi for NoCatalog {
            async fn fetch_provider(
                &self,
                _: ProviderId,
            ) -> crate::remote::error::ClientResult<ProviderProfile> {
                unreachable!("state-only test")
            }
            async fn fetch_availability(
                &self,
                _: ProviderId,
            ) -> crate::remote::error::ClientResult<AvailabilityResponse> {
                unreachable!("state-only test")
            }
            async fn fetch_booked_slots(
                &self,
                _: ProviderId,
                _: NaiveDate,
            ) -> crate::remote::error::ClientResult<Vec<BookedSlot>> {
                unreachable!("state-only test")
            }
        }

        BookingSession {
            catalog: Arc::new(NoCatalog),
            provider: ProviderProfile {
                id: ProviderId::new(1),
                business_name: String::new(),
                full_name: String::new(),
                email: String::new(),
                phone_number: String::new(),
                city: String::new(),
                address: String::new(),
                bio: String::new(),
                coordinates: None,
                is_verified: false,
                services: Vec::new(),
            },
            availability: AvailabilityResponse {
                weekly_schedule: crate::models::default_weekly_schedule(),
                settings: Default::default(),
            },
            selected_date: None,
            booked: Vec::new(),
            generation: 0,
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut session = empty_session();

        let token_tuesday = session.begin_date_change(date(8));
        let token_wednesday = session.begin_date_change(date(9));

        // The Tuesday fetch resolves after the user already moved on.
        let applied = session.apply_booked_slots(
            token_tuesday,
            vec![BookedSlot::at(SlotTime::hm(14, 0))],
        );
        assert!(!applied);
        assert!(session.booked_slots().is_empty());
        assert_eq!(session.selected_date(), Some(date(9)));

        let applied = session.apply_booked_slots(
            token_wednesday,
            vec![BookedSlot::at(SlotTime::hm(10, 0))],
        );
        assert!(applied);
        assert_eq!(session.booked_slots().len(), 1);
    }

    #[test]
    fn test_date_change_clears_previous_slots() {
        let mut session = empty_session();
        let token = session.begin_date_change(date(8));
        session.apply_booked_slots(token, vec![BookedSlot::at(SlotTime::hm(14, 0))]);
        assert_eq!(session.booked_slots().len(), 1);

        session.begin_date_change(date(9));
        assert!(session.booked_slots().is_empty());
    }

    #[test]
    fn test_grid_fails_open_without_date() {
        let session = empty_session();
        assert!(session.slot_grid().iter().all(|s| s.available));
        assert!(session.day_unavailable_reason().is_none());
    }
}
