//! reqwest-based client for the real marketplace backend.
//!
//! Paths mirror the backend's REST surface under `/bookings/`. Lifecycle
//! endpoints are named after the action they perform; the backend answers
//! transition refusals with a 400 and an `error` field, which surfaces here
//! as `ClientError::ValidationError`.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::api::{
    AvailabilityResponse, BookedSlot, BookedSlotsResponse, Booking, BookingId, BookingImage,
    BookingRequest, Coordinates, ImageKind, ImageUpload, ProviderId, ProviderProfile,
};
use crate::models::SlotTime;
use crate::remote::bookings::BookingApi;
use crate::remote::catalog::CatalogApi;
use crate::remote::config::HttpSettings;
use crate::remote::error::{ClientError, ClientResult, ErrorContext};
use crate::remote::geocode::GeocodeApi;

/// HTTP implementation of the marketplace API traits.
pub struct HttpClient {
    http: reqwest::Client,
    settings: HttpSettings,
}

/// Error body shapes the backend uses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
}

impl HttpClient {
    /// Build a client from settings.
    pub fn new(settings: HttpSettings) -> ClientResult<Self> {
        settings.validate()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| ClientError::configuration(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self { http, settings })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    async fn handle<T: DeserializeOwned>(
        response: Response,
        context: ErrorContext,
    ) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ClientError::decode(e.to_string()));
        }

        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error.or(body.detail).or(body.message))
            .unwrap_or_else(|| status.to_string());

        Err(match status {
            StatusCode::NOT_FOUND => ClientError::not_found_with_context(message, context),
            StatusCode::BAD_REQUEST => ClientError::validation_with_context(message, context),
            _ => ClientError::ApiError {
                status: status.as_u16(),
                message,
                context,
            },
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        operation: &str,
    ) -> ClientResult<T> {
        let request_id = Self::request_id();
        tracing::debug!(%request_id, operation, path, "GET");
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .header("x-request-id", &request_id)
            .send()
            .await?;
        Self::handle(response, ErrorContext::new(operation).with_details(request_id)).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
        operation: &str,
    ) -> ClientResult<T> {
        let request_id = Self::request_id();
        tracing::debug!(%request_id, operation, path, "POST");
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .header("x-request-id", &request_id)
            .send()
            .await?;
        Self::handle(response, ErrorContext::new(operation).with_details(request_id)).await
    }
}

#[async_trait]
impl CatalogApi for HttpClient {
    async fn fetch_provider(&self, provider: ProviderId) -> ClientResult<ProviderProfile> {
        self.get_json(
            &format!("bookings/providers/{}/", provider),
            &[],
            "fetch_provider",
        )
        .await
    }

    async fn fetch_availability(&self, provider: ProviderId) -> ClientResult<AvailabilityResponse> {
        self.get_json(
            &format!("bookings/providers/{}/availability/", provider),
            &[],
            "fetch_availability",
        )
        .await
    }

    async fn fetch_booked_slots(
        &self,
        provider: ProviderId,
        date: NaiveDate,
    ) -> ClientResult<Vec<BookedSlot>> {
        let response: BookedSlotsResponse = self
            .get_json(
                &format!("bookings/providers/{}/booked-slots/", provider),
                &[("date", date.format("%Y-%m-%d").to_string())],
                "fetch_booked_slots",
            )
            .await?;
        Ok(response.booked_slots)
    }
}

#[async_trait]
impl BookingApi for HttpClient {
    async fn create_booking(&self, request: &BookingRequest) -> ClientResult<Booking> {
        let body = serde_json::to_value(request)?;
        self.post_json("bookings/bookings/create/", &body, "create_booking")
            .await
    }

    async fn fetch_booking(&self, booking: BookingId) -> ClientResult<Booking> {
        self.get_json(
            &format!("bookings/bookings/{}/", booking),
            &[],
            "fetch_booking",
        )
        .await
    }

    async fn my_bookings(&self) -> ClientResult<Vec<Booking>> {
        self.get_json("bookings/my-bookings/", &[], "my_bookings").await
    }

    async fn upload_images(
        &self,
        booking: BookingId,
        kind: ImageKind,
        images: &[ImageUpload],
        description: Option<&str>,
    ) -> ClientResult<Vec<BookingImage>> {
        let request_id = Self::request_id();
        tracing::debug!(%request_id, booking = %booking, count = images.len(), "upload images");

        let mut form = Form::new()
            .text("image_type", kind.as_str())
            .text("description", description.unwrap_or("").to_string());
        for image in images {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.content_type)
                .map_err(|e| ClientError::validation(format!("bad content type: {}", e)))?;
            form = form.part("images", part);
        }

        let response = self
            .http
            .post(self.url(&format!("bookings/bookings/{}/images/", booking)))
            .multipart(form)
            .header("x-request-id", &request_id)
            .send()
            .await?;
        Self::handle(
            response,
            ErrorContext::new("upload_images")
                .with_entity("booking")
                .with_entity_id(booking)
                .with_details(request_id),
        )
        .await
    }

    async fn cancel_booking(&self, booking: BookingId, reason: &str) -> ClientResult<Booking> {
        self.post_json(
            &format!("bookings/bookings/{}/cancel/", booking),
            &json!({ "reason": reason }),
            "cancel_booking",
        )
        .await
    }

    async fn accept_booking(&self, booking: BookingId) -> ClientResult<Booking> {
        self.post_json(
            &format!("bookings/bookings/{}/accept/", booking),
            &json!({}),
            "accept_booking",
        )
        .await
    }

    async fn decline_booking(&self, booking: BookingId, reason: &str) -> ClientResult<Booking> {
        self.post_json(
            &format!("bookings/bookings/{}/decline/", booking),
            &json!({ "reason": reason }),
            "decline_booking",
        )
        .await
    }

    async fn schedule_booking(
        &self,
        booking: BookingId,
        date: NaiveDate,
        time: SlotTime,
    ) -> ClientResult<Booking> {
        self.post_json(
            &format!("bookings/bookings/{}/schedule/", booking),
            &json!({
                "scheduled_date": date.format("%Y-%m-%d").to_string(),
                "scheduled_time": time.canonical(),
            }),
            "schedule_booking",
        )
        .await
    }

    async fn start_booking(&self, booking: BookingId) -> ClientResult<Booking> {
        self.post_json(
            &format!("bookings/bookings/{}/start/", booking),
            &json!({}),
            "start_booking",
        )
        .await
    }

    async fn complete_booking(
        &self,
        booking: BookingId,
        final_price: Option<f64>,
    ) -> ClientResult<Booking> {
        let body = match final_price {
            Some(price) => json!({ "final_price": price }),
            None => json!({}),
        };
        self.post_json(
            &format!("bookings/bookings/{}/complete/", booking),
            &body,
            "complete_booking",
        )
        .await
    }

    async fn dispute_booking(
        &self,
        booking: BookingId,
        reason: &str,
        note: Option<&str>,
    ) -> ClientResult<Booking> {
        self.post_json(
            &format!("bookings/bookings/{}/dispute/", booking),
            &json!({ "reason": reason, "note": note.unwrap_or("") }),
            "dispute_booking",
        )
        .await
    }
}

#[async_trait]
impl GeocodeApi for HttpClient {
    async fn geocode(&self, address: &str, city: &str) -> ClientResult<Option<Coordinates>> {
        let request_id = Self::request_id();
        let url = format!(
            "{}/search",
            self.settings.geocode_url.trim_end_matches('/')
        );
        tracing::debug!(%request_id, address, city, "geocode");

        let query = format!("{}, {}", address, city);
        let response = self
            .http
            .get(url)
            .query(&[
                ("format", "json"),
                ("limit", "1"),
                ("countrycodes", "np"),
                ("q", query.as_str()),
            ])
            .header("accept", "application/json")
            .send()
            .await?;

        let hits: Vec<NominatimHit> = Self::handle(
            response,
            ErrorContext::new("geocode").with_details(request_id),
        )
        .await?;

        Ok(hits.first().and_then(|hit| {
            let lat = hit.lat.parse().ok()?;
            let lng = hit.lon.parse().ok()?;
            Coordinates::new(lat, lng).ok()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> HttpSettings {
        HttpSettings {
            base_url: "https://api.sewa.example".to_string(),
            ..HttpSettings::default()
        }
    }

    #[test]
    fn test_url_joining() {
        let client = HttpClient::new(settings()).unwrap();
        assert_eq!(
            client.url("/bookings/my-bookings/"),
            "https://api.sewa.example/bookings/my-bookings/"
        );
        assert_eq!(
            client.url("bookings/providers/5/"),
            "https://api.sewa.example/bookings/providers/5/"
        );
    }

    #[test]
    fn test_rejects_unusable_settings() {
        let bad = HttpSettings {
            base_url: String::new(),
            ..HttpSettings::default()
        };
        assert!(HttpClient::new(bad).is_err());
    }

    #[test]
    fn test_error_body_parsing() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"error": "Only pending bookings can be accepted"}"#).unwrap();
        assert_eq!(
            body.error.as_deref(),
            Some("Only pending bookings can be accepted")
        );
        let body: ApiErrorBody = serde_json::from_str(r#"{"detail": "Not found."}"#).unwrap();
        assert_eq!(body.detail.as_deref(), Some("Not found."));
    }
}
