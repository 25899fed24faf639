use std::time::Instant;

use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::command::{Command, parse_command};
use crate::engine::{Engine, EngineError};
use crate::observability::{COMMAND_DURATION_SECONDS, COMMANDS_TOTAL, command_label};

/// Run one command and render its outcome as a JSON object.
pub async fn execute_command(engine: &Engine, cmd: Command) -> Result<Value, EngineError> {
    match cmd {
        Command::Rooms => {
            let rooms = engine.list_rooms().await?;
            Ok(json!({ "rooms": rooms }))
        }
        Command::Book { room_id, start, end } => {
            let booked = engine.book_room(room_id.as_deref(), start, end).await?;
            Ok(json!({ "booked": booked }))
        }
        Command::Available { start, end } => {
            let rooms = engine.available_rooms(start, end).await?;
            let ids: Vec<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
            Ok(json!({ "available": ids }))
        }
        Command::Free { room_id, start, end } => {
            let free = engine.room_availability(&room_id, start, end).await?;
            Ok(json!({ "room_id": room_id, "free": free }))
        }
        Command::Cancel { booking_id } => {
            let cancelled = engine.cancel_booking(booking_id.as_deref()).await?;
            Ok(json!({ "cancelled": cancelled }))
        }
        Command::Bookings { room_id } => {
            let bookings = engine.room_bookings(&room_id).await?;
            Ok(json!({ "room_id": room_id, "bookings": bookings }))
        }
        Command::Show { booking_id } => {
            let booking = engine.find_booking(booking_id.as_deref()).await?;
            Ok(json!({ "booking": booking }))
        }
    }
}

/// Parse, execute, and render one input line. Errors become `{"error": ...}`.
pub async fn handle_line(engine: &Engine, line: &str) -> Value {
    let cmd = match parse_command(line) {
        Ok(cmd) => cmd,
        Err(e) => return json!({ "error": e.to_string() }),
    };
    let label = command_label(&cmd);
    let started = Instant::now();
    let result = execute_command(engine, cmd).await;
    metrics::histogram!(COMMAND_DURATION_SECONDS, "command" => label)
        .record(started.elapsed().as_secs_f64());
    match result {
        Ok(value) => {
            metrics::counter!(COMMANDS_TOTAL, "command" => label, "status" => "ok").increment(1);
            value
        }
        Err(e) => {
            metrics::counter!(COMMANDS_TOTAL, "command" => label, "status" => "error").increment(1);
            debug!("{label} failed: {e}");
            json!({ "error": e.to_string() })
        }
    }
}

/// Read commands line by line until EOF, answering each with one JSON line.
pub async fn run<R, W>(engine: &Engine, input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(engine, &line).await;
        let mut rendered = response.to_string();
        rendered.push('\n');
        if let Err(e) = output.write_all(rendered.as_bytes()).await {
            warn!("write error: {e}");
            return Err(e);
        }
        output.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};

    use super::*;
    use crate::clock::ManualClock;
    use crate::model::Room;
    use crate::notify::NotifyHub;
    use crate::observability::OPERATION_DURATION_SECONDS;
    use crate::store::InMemoryStore;

    const NOW: i64 = 1_767_776_400_000;
    const H: i64 = 3_600_000;

    /// Remembers every histogram touched, as `name{k=v,...}`.
    #[derive(Default)]
    struct HistogramNames(Mutex<Vec<String>>);

    impl HistogramNames {
        fn seen(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Recorder for HistogramNames {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, _: &Key, _: &Metadata<'_>) -> Counter {
            Counter::noop()
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, key: &Key, _: &Metadata<'_>) -> Histogram {
            let labels: Vec<String> = key.labels().map(|l| format!("{}={}", l.key(), l.value())).collect();
            self.0.lock().unwrap().push(format!("{}{{{}}}", key.name(), labels.join(",")));
            Histogram::noop()
        }
    }

    fn engine() -> Engine {
        let store = Arc::new(InMemoryStore::new());
        store.insert_room(Room::new("room-1", "Room A"));
        Engine::new(Arc::new(ManualClock::new(NOW)), store, Arc::new(NotifyHub::new()))
    }

    #[tokio::test]
    async fn commands_and_engine_ops_use_separate_histograms() {
        let recorder = HistogramNames::default();
        let _guard = metrics::set_default_local_recorder(&recorder);
        let engine = engine();

        let line = format!("BOOK room-1 {} {}", NOW + H, NOW + 2 * H);
        assert_eq!(handle_line(&engine, &line).await, json!({ "booked": true }));

        let seen = recorder.seen();
        assert!(seen.contains(&format!("{COMMAND_DURATION_SECONDS}{{command=book}}")), "{seen:?}");
        assert!(seen.contains(&format!("{OPERATION_DURATION_SECONDS}{{op=book_room}}")), "{seen:?}");
        assert!(!seen.contains(&format!("{OPERATION_DURATION_SECONDS}{{op=book}}")), "{seen:?}");
    }

    #[tokio::test]
    async fn query_latency_is_recorded_when_validation_fails() {
        let recorder = HistogramNames::default();
        let _guard = metrics::set_default_local_recorder(&recorder);
        let engine = engine();

        let reply = handle_line(&engine, "AVAILABLE - -").await;
        assert!(reply.get("error").is_some(), "{reply}");
        let reply = handle_line(&engine, &format!("FREE room-1 {} -", NOW)).await;
        assert!(reply.get("error").is_some(), "{reply}");

        let seen = recorder.seen();
        assert!(seen.contains(&format!("{OPERATION_DURATION_SECONDS}{{op=available_rooms}}")), "{seen:?}");
        assert!(seen.contains(&format!("{OPERATION_DURATION_SECONDS}{{op=room_availability}}")), "{seen:?}");
    }
}
