use crate::model::Room;

const DEFAULT_NOTIFY_CAPACITY: usize = 256;

/// Process settings, read from `ROOMBOOK_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Rooms to seed the in-memory store with, from `ROOMBOOK_ROOMS`
    /// (`id=Name,id=Name`; a bare `id` uses the id as the name).
    pub rooms: Vec<Room>,
    /// Prometheus exporter port, from `ROOMBOOK_METRICS_PORT`. Disabled if unset.
    pub metrics_port: Option<u16>,
    /// Broadcast channel capacity, from `ROOMBOOK_NOTIFY_CAPACITY`.
    pub notify_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rooms: Vec::new(),
            metrics_port: None,
            notify_capacity: DEFAULT_NOTIFY_CAPACITY,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable numbers fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let rooms = lookup("ROOMBOOK_ROOMS")
            .map(|s| parse_rooms(&s))
            .unwrap_or_default();
        let metrics_port = lookup("ROOMBOOK_METRICS_PORT").and_then(|s| s.parse().ok());
        let notify_capacity = lookup("ROOMBOOK_NOTIFY_CAPACITY")
            .and_then(|s| s.parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(DEFAULT_NOTIFY_CAPACITY);
        Self {
            rooms,
            metrics_port,
            notify_capacity,
        }
    }
}

pub fn parse_rooms(spec: &str) -> Vec<Room> {
    spec.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.split_once('=') {
            Some((id, name)) if !id.trim().is_empty() => Some(Room::new(id.trim(), name.trim())),
            Some(_) => None,
            None => Some(Room::new(entry, entry)),
        })
        .collect()
}
