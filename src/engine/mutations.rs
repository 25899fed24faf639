use std::time::Instant;

use tracing::{debug, info};
use ulid::Ulid;

use crate::model::*;
use crate::observability::{BOOKINGS_TOTAL, CANCELLATIONS_TOTAL, OPERATION_DURATION_SECONDS};

use super::validate::{ALREADY_STARTED, validate_booking_id, validate_booking_request};
use super::{Engine, EngineError};

impl Engine {
    /// Reserve `room_id` for `[start, end)`.
    ///
    /// `Ok(false)` means the room is taken for some part of the interval; nothing
    /// was saved or sent. On `Ok(true)` the room has been saved with the new
    /// booking and a confirmation was attempted.
    pub async fn book_room(
        &self,
        room_id: Option<&str>,
        start: Option<Ms>,
        end: Option<Ms>,
    ) -> Result<bool, EngineError> {
        let started = Instant::now();
        let result = self.book_room_inner(room_id, start, end).await;
        let status = match &result {
            Ok(true) => "confirmed",
            Ok(false) => "unavailable",
            Err(_) => "rejected",
        };
        metrics::counter!(BOOKINGS_TOTAL, "status" => status).increment(1);
        metrics::histogram!(OPERATION_DURATION_SECONDS, "op" => "book_room")
            .record(started.elapsed().as_secs_f64());
        result
    }

    async fn book_room_inner(
        &self,
        room_id: Option<&str>,
        start: Option<Ms>,
        end: Option<Ms>,
    ) -> Result<bool, EngineError> {
        let now = self.clock.now();
        let (room_id, span) = validate_booking_request(room_id, start, end, now)?;

        let mut room = self.load_room(room_id).await?;
        if !room.is_available(span.start, span.end) {
            debug!(room_id, start = span.start, end = span.end, "room unavailable");
            return Ok(false);
        }

        let booking = Booking::new(
            Ulid::new().to_string(),
            room_id,
            Some(span.start),
            Some(span.end),
        )?;
        room.add_booking(booking.clone());
        self.store.save(&room).await?;
        info!(booking_id = booking.id(), room_id, start = span.start, end = span.end, "booking confirmed");

        let sent = self.notifier.send_booking_confirmation(&booking).await;
        self.absorb_notify_failure("booking", &booking, sent);
        Ok(true)
    }

    /// Cancel a future booking.
    ///
    /// `Ok(false)` when no room holds `booking_id`. A booking whose start is at
    /// or before now fails with [`EngineError::InvalidState`] and is kept.
    pub async fn cancel_booking(&self, booking_id: Option<&str>) -> Result<bool, EngineError> {
        let started = Instant::now();
        let result = self.cancel_booking_inner(booking_id).await;
        let status = match &result {
            Ok(true) => "cancelled",
            Ok(false) => "not_found",
            Err(EngineError::InvalidState(_)) => "started",
            Err(_) => "rejected",
        };
        metrics::counter!(CANCELLATIONS_TOTAL, "status" => status).increment(1);
        metrics::histogram!(OPERATION_DURATION_SECONDS, "op" => "cancel_booking")
            .record(started.elapsed().as_secs_f64());
        result
    }

    async fn cancel_booking_inner(&self, booking_id: Option<&str>) -> Result<bool, EngineError> {
        let booking_id = validate_booking_id(booking_id)?;

        let Some((room, booking)) = self.detach_booking(booking_id).await? else {
            debug!(booking_id, "booking not found");
            return Ok(false);
        };

        // `room` is a loaded copy; bailing out here leaves the store untouched.
        if booking.has_started(self.clock.now()) {
            return Err(EngineError::InvalidState(ALREADY_STARTED));
        }

        self.store.save(&room).await?;
        info!(booking_id, room_id = room.id.as_str(), "booking cancelled");

        let sent = self.notifier.send_cancellation_confirmation(&booking).await;
        self.absorb_notify_failure("cancellation", &booking, sent);
        Ok(true)
    }
}
