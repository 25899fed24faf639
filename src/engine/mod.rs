mod availability;
mod error;
mod mutations;
mod queries;
mod validate;

pub use availability::{free_spans, merge_overlapping, subtract_intervals};
pub use error::EngineError;

use std::sync::Arc;

use tracing::warn;

use crate::clock::Clock;
use crate::model::*;
use crate::notify::Notifier;
use crate::observability::NOTIFY_FAILURES_TOTAL;
use crate::store::RoomStore;

use error::SideEffect;
use validate::UNKNOWN_ROOM;

/// Reservation engine: validates requests, checks overlap, mutates rooms,
/// persists them, and sends best-effort confirmations.
///
/// Each operation reads the clock at most once.
pub struct Engine {
    clock: Arc<dyn Clock>,
    store: Arc<dyn RoomStore>,
    notifier: Arc<dyn Notifier>,
}

impl Engine {
    pub fn new(clock: Arc<dyn Clock>, store: Arc<dyn RoomStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            clock,
            store,
            notifier,
        }
    }

    /// Load a room or fail with "room does not exist".
    pub(super) async fn load_room(&self, room_id: &str) -> Result<Room, EngineError> {
        self.store
            .find_by_id(room_id)
            .await?
            .ok_or(EngineError::InvalidArgument(UNKNOWN_ROOM))
    }

    /// Linear scan over all rooms; first room holding `booking_id` wins.
    /// Returns that room with the booking already taken out, plus the booking.
    pub(super) async fn detach_booking(&self, booking_id: &str) -> Result<Option<(Room, Booking)>, EngineError> {
        let rooms = self.store.find_all().await?;
        Ok(rooms.into_iter().find_map(|mut room| {
            let booking = room.remove_booking(booking_id)?;
            Some((room, booking))
        }))
    }

    /// Notification failures end here: logged and counted, never returned.
    pub(super) fn absorb_notify_failure(&self, kind: &'static str, booking: &Booking, result: SideEffect) {
        if let Err(e) = result {
            warn!(booking_id = booking.id(), room_id = booking.room_id(), kind, "notification failed: {e}");
            metrics::counter!(NOTIFY_FAILURES_TOTAL, "kind" => kind).increment(1);
        }
    }
}
