//! Geocoding collaborator: address text to coordinates, read-only.

use async_trait::async_trait;

use super::error::ClientResult;
use crate::api::Coordinates;

/// Forward geocoding of service addresses.
///
/// Nothing is ever pushed to the geocoder; it only populates draft
/// coordinates. A miss is `Ok(None)`, not an error.
#[async_trait]
pub trait GeocodeApi: Send + Sync {
    /// Resolve a free-text address within a city to coordinates.
    async fn geocode(&self, address: &str, city: &str) -> ClientResult<Option<Coordinates>>;
}
