use serde::{Deserialize, Serialize};

use crate::engine::EngineError;

const INCOMPLETE_BOOKING: &str = "booking requires an id, a room id, and start/end times";
const END_NOT_AFTER_START: &str = "end time must be after start time";

/// Unix milliseconds, the only time type.
pub type Ms = i64;

pub type RoomId = String;
pub type BookingId = String;

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSpan")]
pub struct Span {
    pub start: Ms,
    pub end: Ms,
}

impl Span {
    pub fn new(start: Ms, end: Ms) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    pub fn duration_ms(&self) -> Ms {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_instant(&self, t: Ms) -> bool {
        self.start <= t && t < self.end
    }
}

/// Wire shape of a [`Span`] before its bounds are checked.
#[derive(Deserialize)]
struct RawSpan {
    start: Ms,
    end: Ms,
}

impl TryFrom<RawSpan> for Span {
    type Error = EngineError;

    fn try_from(raw: RawSpan) -> Result<Self, Self::Error> {
        if raw.end <= raw.start {
            return Err(EngineError::InvalidArgument(END_NOT_AFTER_START));
        }
        Ok(Self {
            start: raw.start,
            end: raw.end,
        })
    }
}

/// A confirmed reservation of one room. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBooking")]
pub struct Booking {
    id: BookingId,
    room_id: RoomId,
    span: Span,
}

impl Booking {
    /// Empty ids and `None` times count as absent.
    pub fn new(
        id: impl Into<BookingId>,
        room_id: impl Into<RoomId>,
        start: Option<Ms>,
        end: Option<Ms>,
    ) -> Result<Self, EngineError> {
        let id = id.into();
        let room_id = room_id.into();
        let (Some(start), Some(end)) = (start, end) else {
            return Err(EngineError::InvalidArgument(INCOMPLETE_BOOKING));
        };
        if id.is_empty() || room_id.is_empty() {
            return Err(EngineError::InvalidArgument(INCOMPLETE_BOOKING));
        }
        if end <= start {
            return Err(EngineError::InvalidArgument(END_NOT_AFTER_START));
        }
        Ok(Self {
            id,
            room_id,
            span: Span::new(start, end),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn start(&self) -> Ms {
        self.span.start
    }

    pub fn end(&self) -> Ms {
        self.span.end
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Same half-open rule as [`Span::overlaps`]: touching endpoints are free.
    pub fn overlaps(&self, start: Ms, end: Ms) -> bool {
        start < self.span.end && end > self.span.start
    }

    /// A booking whose start is at or before `now` can no longer be cancelled.
    pub fn has_started(&self, now: Ms) -> bool {
        self.span.start <= now
    }
}

/// Stored bookings go back through [`Booking::new`].
#[derive(Deserialize)]
struct RawBooking {
    id: BookingId,
    room_id: RoomId,
    span: RawSpan,
}

impl TryFrom<RawBooking> for Booking {
    type Error = EngineError;

    fn try_from(raw: RawBooking) -> Result<Self, Self::Error> {
        Booking::new(raw.id, raw.room_id, Some(raw.span.start), Some(raw.span.end))
    }
}

/// A bookable room and the bookings it currently holds.
///
/// The room reports overlap but never refuses an insert; keeping bookings
/// disjoint is the engine's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRoom")]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    /// Sorted by `span.start`.
    bookings: Vec<Booking>,
}

impl Room {
    pub fn new(id: impl Into<RoomId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            bookings: Vec::new(),
        }
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// Insert booking maintaining sort order by start. Does not check overlap.
    pub fn add_booking(&mut self, booking: Booking) {
        let pos = self
            .bookings
            .binary_search_by_key(&booking.start(), |b| b.start())
            .unwrap_or_else(|e| e);
        self.bookings.insert(pos, booking);
    }

    pub fn has_booking(&self, id: &str) -> bool {
        self.bookings.iter().any(|b| b.id == id)
    }

    pub fn find_booking(&self, id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    /// Remove booking by id.
    pub fn remove_booking(&mut self, id: &str) -> Option<Booking> {
        let pos = self.bookings.iter().position(|b| b.id == id)?;
        Some(self.bookings.remove(pos))
    }

    /// Return only bookings that overlap `[start, end)`.
    /// Uses binary search to skip bookings starting at or after `end`.
    pub fn overlapping(&self, start: Ms, end: Ms) -> impl Iterator<Item = &Booking> {
        let right_bound = self.bookings.partition_point(|b| b.start() < end);
        self.bookings[..right_bound]
            .iter()
            .filter(move |b| b.overlaps(start, end))
    }

    pub fn is_available(&self, start: Ms, end: Ms) -> bool {
        self.overlapping(start, end).next().is_none()
    }
}

/// Stored booking order is not trusted; `overlapping` needs it sorted.
#[derive(Deserialize)]
struct RawRoom {
    id: RoomId,
    name: String,
    #[serde(default)]
    bookings: Vec<Booking>,
}

impl From<RawRoom> for Room {
    fn from(raw: RawRoom) -> Self {
        let mut bookings = raw.bookings;
        bookings.sort_by_key(|b| b.start());
        Self {
            id: raw.id,
            name: raw.name,
            bookings,
        }
    }
}

/// Event published to listeners after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notice {
    BookingConfirmed { booking: Booking },
    BookingCancelled { booking: Booking },
}
