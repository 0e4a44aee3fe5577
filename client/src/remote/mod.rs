//! Backend access layer.
//!
//! This module abstracts the marketplace REST API and the geocoding
//! collaborator behind object-safe async traits, allowing different
//! backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Services (wizard, session, submission)                  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  API Traits - Abstract Interface                         │
//! │  CatalogApi / BookingApi / GeocodeApi / MarketplaceApi   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │  HttpClient (reqwest)  │  LocalClient (mem)   │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! **Create a backend through the factory:**
//! ```ignore
//! use sewa_client::remote::{ClientFactory, BackendKind};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = ClientFactory::from_env()?;
//!     let provider = api.fetch_provider(12.into()).await?;
//!     Ok(())
//! }
//! ```

// Feature flag priority: http > local
// When multiple features are enabled (e.g. --all-features), http takes precedence.
#[cfg(not(any(feature = "http-api", feature = "local-api")))]
compile_error!("Enable at least one backend feature.");

pub mod bookings;
pub mod catalog;
pub mod clients;
pub mod config;
pub mod error;
pub mod factory;
pub mod geocode;

pub use bookings::BookingApi;
pub use catalog::CatalogApi;
#[cfg(feature = "http-api")]
pub use clients::HttpClient;
#[cfg(feature = "local-api")]
pub use clients::LocalClient;
pub use config::{ClientConfig, HttpSettings};
pub use error::{ClientError, ClientResult, ErrorContext};
pub use factory::{BackendKind, ClientBuilder, ClientFactory};
pub use geocode::GeocodeApi;

/// Everything a booking surface needs from the outside world.
pub trait MarketplaceApi: CatalogApi + BookingApi + GeocodeApi {}

impl<T: CatalogApi + BookingApi + GeocodeApi> MarketplaceApi for T {}
