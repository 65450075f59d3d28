//! Outbound booking notifications.
//!
//! Notifications are strictly post-commit and fire-and-forget: a booking
//! that committed stays committed whether or not anyone could be told
//! about it. Deliveries run on a detached task and failures are logged,
//! never propagated.

pub mod webhook;

pub use webhook::WebhookDispatcher;

use async_trait::async_trait;
use mockall::automock;

use crate::domain::bookings::records::BookingRecord;

/// Delivery channel for booking lifecycle events.
#[automock]
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Deliver a booking-created event.
    async fn booking_created(&self, booking: BookingRecord);
}

/// Dispatcher for deployments with no webhook configured; drops every
/// event with a debug log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDispatcher;

#[async_trait]
impl NotificationDispatcher for NullDispatcher {
    async fn booking_created(&self, booking: BookingRecord) {
        tracing::debug!(booking_uuid = %booking.uuid, "dropping booking.created event, no dispatcher configured");
    }
}
