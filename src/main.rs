use std::sync::Arc;

use tokio::io::BufReader;
use tokio::sync::broadcast::error::RecvError;
use tracing::info;

use roombook::clock::SystemClock;
use roombook::config::Config;
use roombook::console;
use roombook::engine::Engine;
use roombook::notify::NotifyHub;
use roombook::store::InMemoryStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    roombook::observability::init(config.metrics_port)?;

    let store = Arc::new(InMemoryStore::new());
    for room in &config.rooms {
        store.insert_room(room.clone());
    }
    let hub = Arc::new(NotifyHub::with_capacity(config.notify_capacity));
    let engine = Engine::new(Arc::new(SystemClock), store.clone(), hub.clone());

    info!("roombook ready");
    info!("  rooms: {}", store.room_count());
    info!("  notify capacity: {}", config.notify_capacity);
    info!("  metrics: {}", config.metrics_port.map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics")));

    // Log every notice; the console answers on stdout.
    let mut notices = hub.subscribe_all();
    tokio::spawn(async move {
        loop {
            match notices.recv().await {
                Ok(notice) => match serde_json::to_string(&notice) {
                    Ok(line) => info!(target: "roombook::notice", "{line}"),
                    Err(e) => tracing::warn!("notice encode error: {e}"),
                },
                Err(RecvError::Lagged(n)) => tracing::warn!("notice listener lagged by {n}"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    tokio::select! {
        result = console::run(&engine, stdin, stdout) => result?,
        _ = tokio::signal::ctrl_c() => info!("shutdown signal received"),
    }

    info!("roombook stopped");
    Ok(())
}
