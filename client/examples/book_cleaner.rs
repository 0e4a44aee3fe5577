//! Walk the full booking flow against the in-memory backend:
//! load a provider, pick a free slot, fill the wizard, submit with a
//! before-photo, then drive the booking through its lifecycle.
//!
//! ```bash
//! cargo run --example book_cleaner
//! ```

use std::sync::Arc;

use chrono::{Datelike, Duration, Utc};
use sewa_client::api::{Coordinates, ImageUpload};
use sewa_client::models::nepal_offset;
use sewa_client::remote::clients::local::{LocalClient, SEED_PROVIDER_ID, SEED_SERVICE_ID};
use sewa_client::remote::BookingApi;
use sewa_client::services::session::BookingSession;
use sewa_client::services::submission::{assemble_request, submit_booking};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let api = Arc::new(LocalClient::seeded());

    let mut session = BookingSession::load(api.clone(), SEED_PROVIDER_ID).await?;
    println!("Booking with: {}", session.provider().business_name);

    // Next weekday at least two days out keeps the lead-time rules happy.
    let mut date = Utc::now().with_timezone(&nepal_offset()).date_naive() + Duration::days(2);
    while matches!(date.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun) {
        date += Duration::days(1);
    }

    session.select_date(date).await?;
    println!("\nSlots on {}:", date);
    for slot in session.slot_grid() {
        let marker = if slot.booked {
            "booked"
        } else if slot.available {
            "free"
        } else {
            "-"
        };
        println!("  {}  {}", slot.label, marker);
    }

    let free_slot = session
        .slot_grid()
        .into_iter()
        .find(|s| s.available)
        .expect("seeded provider has free slots");

    let mut wizard = session.start_wizard();
    wizard.set_service(SEED_SERVICE_ID);
    wizard.set_date(date);
    wizard.set_time(free_slot.value);
    anyhow::ensure!(wizard.try_next(), "step 1: {:?}", wizard.error());

    wizard.set_full_name("Asha Rai");
    wizard.set_phone("9812345678");
    wizard.set_email("asha@example.com");
    wizard.set_address("Baneshwor Height, Kathmandu");
    wizard.set_city("Kathmandu");
    wizard.set_coordinates(Some(Coordinates::new(27.7200, 85.3300).map_err(
        anyhow::Error::msg,
    )?));
    anyhow::ensure!(wizard.try_next(), "step 2: {:?}", wizard.error());

    wizard.set_description("Kitchen sink leaking under the counter");
    anyhow::ensure!(wizard.try_next(), "step 3: {:?}", wizard.error());

    if let Some(warning) = wizard.radius_check().warning() {
        println!("\nwarning: {}", warning);
    }

    let request = assemble_request(&wizard).map_err(anyhow::Error::msg)?;
    let photo = ImageUpload {
        file_name: "sink.jpg".to_string(),
        content_type: "image/jpeg".to_string(),
        bytes: vec![0u8; 2048],
    };
    let outcome = submit_booking(api.as_ref(), &request, &[photo]).await?;
    println!(
        "\nCreated booking #{} ({})",
        outcome.booking.id,
        outcome.booking.status.label()
    );

    // Provider side: accept, schedule and run the job.
    let booking = api.accept_booking(outcome.booking.id).await?;
    let booking = api
        .schedule_booking(booking.id, booking.preferred_date, booking.preferred_time)
        .await?;
    let booking = api.start_booking(booking.id).await?;
    let booking = api.complete_booking(booking.id, Some(1800.0)).await?;
    println!(
        "Lifecycle finished: {} (final price NRS {})",
        booking.status.label(),
        booking.final_price.unwrap_or_default()
    );

    Ok(())
}
