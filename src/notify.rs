use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::model::{Booking, Notice, RoomId};

const DEFAULT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Nobody was listening for the notice.
    NoSubscribers,
    /// Transport-specific delivery failure.
    Delivery(String),
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifyError::NoSubscribers => write!(f, "no subscribers"),
            NotifyError::Delivery(msg) => write!(f, "delivery failed: {msg}"),
        }
    }
}

impl std::error::Error for NotifyError {}

/// Confirmation port. Failures are reported, and the engine decides to ignore them.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_booking_confirmation(&self, booking: &Booking) -> Result<(), NotifyError>;

    async fn send_cancellation_confirmation(&self, booking: &Booking) -> Result<(), NotifyError>;
}

/// Broadcast hub for booking notices, per room plus one firehose channel.
pub struct NotifyHub {
    capacity: usize,
    channels: DashMap<RoomId, broadcast::Sender<Notice>>,
    all: broadcast::Sender<Notice>,
}

impl Default for NotifyHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            channels: DashMap::new(),
            all: broadcast::channel(capacity).0,
        }
    }

    /// Subscribe to notices for one room. Creates the channel if needed.
    pub fn subscribe(&self, room_id: &str) -> broadcast::Receiver<Notice> {
        let sender = self
            .channels
            .entry(room_id.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        sender.subscribe()
    }

    /// Subscribe to notices for every room.
    pub fn subscribe_all(&self) -> broadcast::Receiver<Notice> {
        self.all.subscribe()
    }

    /// Remove a room's channel.
    pub fn remove(&self, room_id: &str) {
        self.channels.remove(room_id);
    }

    /// Publish a notice. Fails if no receiver got it.
    pub fn send(&self, room_id: &str, notice: Notice) -> Result<usize, NotifyError> {
        let mut delivered = 0;
        if let Some(sender) = self.channels.get(room_id) {
            delivered += sender.send(notice.clone()).unwrap_or(0);
        }
        delivered += self.all.send(notice).unwrap_or(0);
        if delivered == 0 {
            return Err(NotifyError::NoSubscribers);
        }
        Ok(delivered)
    }
}

#[async_trait]
impl Notifier for NotifyHub {
    async fn send_booking_confirmation(&self, booking: &Booking) -> Result<(), NotifyError> {
        let notice = Notice::BookingConfirmed {
            booking: booking.clone(),
        };
        self.send(booking.room_id(), notice).map(|_| ())
    }

    async fn send_cancellation_confirmation(&self, booking: &Booking) -> Result<(), NotifyError> {
        let notice = Notice::BookingCancelled {
            booking: booking.clone(),
        };
        self.send(booking.room_id(), notice).map(|_| ())
    }
}
