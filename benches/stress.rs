use std::sync::Arc;
use std::time::{Duration, Instant};

use roombook::clock::ManualClock;
use roombook::engine::Engine;
use roombook::model::{Ms, Room};
use roombook::notify::NotifyHub;
use roombook::store::InMemoryStore;

const HOUR: i64 = 3_600_000; // 1 hour in ms
const NOW: Ms = 1_767_776_400_000;
const ROOMS: usize = 50;

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let idx = ((sorted.len() as f64) * p / 100.0) as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn print_latency(label: &str, latencies: &mut [Duration]) {
    if latencies.is_empty() {
        return;
    }
    latencies.sort();
    let total: Duration = latencies.iter().sum();
    let avg = total / latencies.len() as u32;
    println!("  {label}:");
    println!(
        "    n={}, avg={:.2}ms, p50={:.2}ms, p95={:.2}ms, p99={:.2}ms, max={:.2}ms",
        latencies.len(),
        avg.as_secs_f64() * 1000.0,
        percentile(latencies, 50.0).as_secs_f64() * 1000.0,
        percentile(latencies, 95.0).as_secs_f64() * 1000.0,
        percentile(latencies, 99.0).as_secs_f64() * 1000.0,
        latencies[latencies.len() - 1].as_secs_f64() * 1000.0,
    );
}

fn setup() -> (Engine, Vec<String>) {
    let store = Arc::new(InMemoryStore::new());
    let ids: Vec<String> = (0..ROOMS).map(|i| format!("room-{i}")).collect();
    for id in &ids {
        store.insert_room(Room::new(id.as_str(), id.as_str()));
    }
    // The hub has no subscribers, so every confirmation exercises the failure path.
    let engine = Engine::new(
        Arc::new(ManualClock::new(NOW)),
        store,
        Arc::new(NotifyHub::new()),
    );
    println!("  created {} rooms", ids.len());
    (engine, ids)
}

async fn phase1_sequential_bookings(engine: &Engine, room: &str) {
    let n = 2_000;
    let mut latencies = Vec::with_capacity(n);
    let start = Instant::now();
    for i in 0..n as i64 {
        let s = NOW + HOUR + i * HOUR;
        let t = Instant::now();
        let booked = engine.book_room(Some(room), Some(s), Some(s + HOUR)).await;
        latencies.push(t.elapsed());
        if !matches!(booked, Ok(true)) {
            eprintln!("  unexpected result at {i}: {booked:?}");
        }
    }
    let elapsed = start.elapsed();
    let ops = n as f64 / elapsed.as_secs_f64();
    println!("  {n} bookings in {:.2}s = {ops:.0} ops/sec", elapsed.as_secs_f64());
    print_latency("book_room", &mut latencies);
}

async fn phase2_conflicting_bookings(engine: &Engine, room: &str) {
    let n = 2_000;
    let mut latencies = Vec::with_capacity(n);
    let mut rejected = 0;
    for _ in 0..n {
        let t = Instant::now();
        if let Ok(false) = engine.book_room(Some(room), Some(NOW + HOUR), Some(NOW + 2 * HOUR)).await {
            rejected += 1;
        }
        latencies.push(t.elapsed());
    }
    println!("  {rejected}/{n} rejected as unavailable");
    print_latency("book_room (taken)", &mut latencies);
}

async fn phase3_availability_scan(engine: &Engine) {
    let n = 500;
    let mut latencies = Vec::with_capacity(n);
    for i in 0..n as i64 {
        let s = NOW + HOUR + (i % 100) * HOUR;
        let t = Instant::now();
        let _ = engine.available_rooms(Some(s), Some(s + HOUR)).await;
        latencies.push(t.elapsed());
    }
    print_latency("available_rooms", &mut latencies);
}

async fn phase4_cancellation_scan(engine: &Engine, room: &str) {
    let bookings = engine.room_bookings(room).await.unwrap_or_default();
    let mut latencies = Vec::with_capacity(bookings.len());
    for b in bookings.iter().take(500) {
        let t = Instant::now();
        let _ = engine.cancel_booking(Some(b.id())).await;
        latencies.push(t.elapsed());
    }
    print_latency("cancel_booking", &mut latencies);
}

#[tokio::main]
async fn main() {
    println!("=== roombook stress benchmark ===\n");

    println!("[setup]");
    let (engine, ids) = setup();

    println!("\n[phase 1] sequential booking throughput");
    phase1_sequential_bookings(&engine, &ids[0]).await;

    println!("\n[phase 2] conflicting bookings");
    phase2_conflicting_bookings(&engine, &ids[0]).await;

    println!("\n[phase 3] availability across rooms");
    phase3_availability_scan(&engine).await;

    println!("\n[phase 4] cancellation by linear scan");
    phase4_cancellation_scan(&engine, &ids[0]).await;

    println!("\n=== benchmark complete ===");
}
