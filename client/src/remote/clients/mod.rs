//! Backend implementations.
//!
//! This module contains the implementations of the API traits:
//! - `http`: reqwest-based client for the real marketplace backend
//! - `local`: in-memory implementation for unit testing and local development

#[cfg(feature = "http-api")]
pub mod http;
#[cfg(feature = "local-api")]
pub mod local;

#[cfg(feature = "http-api")]
pub use http::HttpClient;
#[cfg(feature = "local-api")]
pub use local::LocalClient;
