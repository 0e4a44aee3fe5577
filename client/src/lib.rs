//! # Sewa Client Engine
//!
//! Client-side engine for the Sewa home-services marketplace (plumbers,
//! electricians, cleaners and the like). The crate owns everything a booking
//! surface computes locally and wraps the remote collaborators behind typed
//! async traits.
//!
//! ## Features
//!
//! - **Slot grid**: the fixed hourly booking grid with 12-hour labels
//! - **Availability**: per-slot evaluation against a provider's weekly
//!   schedule, break windows and already-booked times
//! - **Distance**: haversine distance and service-radius classification
//! - **Wizard**: the four-step booking form with per-step validation gating
//! - **Status machine**: explicit booking lifecycle transitions
//! - **Submission**: draft assembly, duplicate fingerprinting and
//!   best-effort photo upload after booking creation
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Services (wizard, slots, distance, submission, session)  │
//! │  - Pure booking rules, no I/O                             │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Remote traits (CatalogApi / BookingApi / GeocodeApi)     │
//! │  - Object-safe async contracts                            │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │   HttpClient (reqwest)  │  LocalClient (mem)  │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Data Transfer Objects exchanged with the marketplace backend
//! - [`models`]: wall-clock times, weekly schedules, the booking status machine
//! - [`services`]: booking rules and orchestration
//! - [`remote`]: backend access layer (HTTP and in-memory implementations)
//! - [`events`]: in-process account event fan-out

pub mod api;
pub mod events;
pub mod models;
pub mod remote;
pub mod services;
