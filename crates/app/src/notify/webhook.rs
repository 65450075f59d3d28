//! Webhook delivery.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::domain::bookings::records::BookingRecord;

use super::NotificationDispatcher;

/// Payload posted to the configured endpoint.
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    event: &'static str,
    booking: &'a BookingRecord,
}

/// Posts each event to a single configured URL as JSON.
#[derive(Debug, Clone)]
pub struct WebhookDispatcher {
    client: Client,
    url: String,
}

impl WebhookDispatcher {
    #[must_use]
    pub fn new(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }
}

#[async_trait]
impl NotificationDispatcher for WebhookDispatcher {
    async fn booking_created(&self, booking: BookingRecord) {
        let envelope = Envelope {
            event: "booking.created",
            booking: &booking,
        };

        let result = self
            .client
            .post(&self.url)
            .json(&envelope)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);

        if let Err(error) = result {
            tracing::warn!(
                booking_uuid = %booking.uuid,
                error = %error,
                "booking.created webhook delivery failed"
            );
        }
    }
}
