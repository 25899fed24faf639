use std::time::Instant;

use crate::model::*;
use crate::observability::OPERATION_DURATION_SECONDS;

use super::availability::free_spans;
use super::validate::{validate_booking_id, validate_window};
use super::{Engine, EngineError};

impl Engine {
    /// Rooms with no booking overlapping `[start, end)`, in store order.
    pub async fn available_rooms(
        &self,
        start: Option<Ms>,
        end: Option<Ms>,
    ) -> Result<Vec<Room>, EngineError> {
        let started = Instant::now();
        let result = self.available_rooms_inner(start, end).await;
        metrics::histogram!(OPERATION_DURATION_SECONDS, "op" => "available_rooms")
            .record(started.elapsed().as_secs_f64());
        result
    }

    async fn available_rooms_inner(&self, start: Option<Ms>, end: Option<Ms>) -> Result<Vec<Room>, EngineError> {
        let window = validate_window(start, end)?;
        let rooms = self.store.find_all().await?;
        Ok(rooms
            .into_iter()
            .filter(|room| room.is_available(window.start, window.end))
            .collect())
    }

    /// Free sub-intervals of `[start, end)` for one room.
    pub async fn room_availability(
        &self,
        room_id: &str,
        start: Option<Ms>,
        end: Option<Ms>,
    ) -> Result<Vec<Span>, EngineError> {
        let started = Instant::now();
        let result = async {
            let window = validate_window(start, end)?;
            let room = self.load_room(room_id).await?;
            Ok::<_, EngineError>(free_spans(&room, &window))
        }
        .await;
        metrics::histogram!(OPERATION_DURATION_SECONDS, "op" => "room_availability")
            .record(started.elapsed().as_secs_f64());
        result
    }

    pub async fn room_bookings(&self, room_id: &str) -> Result<Vec<Booking>, EngineError> {
        let room = self.load_room(room_id).await?;
        Ok(room.bookings().to_vec())
    }

    pub async fn find_booking(&self, booking_id: Option<&str>) -> Result<Option<Booking>, EngineError> {
        let booking_id = validate_booking_id(booking_id)?;
        Ok(self.detach_booking(booking_id).await?.map(|(_, booking)| booking))
    }

    pub async fn list_rooms(&self) -> Result<Vec<Room>, EngineError> {
        Ok(self.store.find_all().await?)
    }
}
