use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::model::{Room, RoomId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not serve the request.
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Backend(msg) => write!(f, "backend: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Persistence port for rooms. Rooms are handed out by value; a mutation only
/// becomes visible to other callers once it is passed back through `save`.
#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Room>, StoreError>;

    /// All rooms in the store's own iteration order.
    async fn find_all(&self) -> Result<Vec<Room>, StoreError>;

    async fn save(&self, room: &Room) -> Result<(), StoreError>;
}

/// Process-local store. Iterates rooms in first-insertion order.
pub struct InMemoryStore {
    rooms: DashMap<RoomId, (u64, Room)>,
    next_seq: AtomicU64,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn contains_room(&self, id: &str) -> bool {
        self.rooms.contains_key(id)
    }

    /// Insert or replace a room. A replaced room keeps its original position.
    pub fn insert_room(&self, room: Room) {
        self.rooms
            .entry(room.id.clone())
            .and_modify(|(_, existing)| *existing = room.clone())
            .or_insert_with(|| (self.next_seq.fetch_add(1, Ordering::Relaxed), room));
    }
}

#[async_trait]
impl RoomStore for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Room>, StoreError> {
        Ok(self.rooms.get(id).map(|e| e.value().1.clone()))
    }

    async fn find_all(&self) -> Result<Vec<Room>, StoreError> {
        let mut rooms: Vec<(u64, Room)> = self
            .rooms
            .iter()
            .map(|e| (e.value().0, e.value().1.clone()))
            .collect();
        rooms.sort_by_key(|(seq, _)| *seq);
        Ok(rooms.into_iter().map(|(_, room)| room).collect())
    }

    async fn save(&self, room: &Room) -> Result<(), StoreError> {
        self.insert_room(room.clone());
        Ok(())
    }
}
