use std::net::SocketAddr;

use crate::command::Command;

/// Counter: booking attempts. Labels: status (confirmed, unavailable, rejected).
pub const BOOKINGS_TOTAL: &str = "roombook_bookings_total";

/// Counter: cancellation attempts. Labels: status (cancelled, not_found, started, rejected).
pub const CANCELLATIONS_TOTAL: &str = "roombook_cancellations_total";

/// Counter: confirmations that could not be delivered. Labels: kind.
pub const NOTIFY_FAILURES_TOTAL: &str = "roombook_notify_failures_total";

/// Histogram: engine operation latency in seconds. Labels: op.
pub const OPERATION_DURATION_SECONDS: &str = "roombook_operation_duration_seconds";

/// Histogram: front-end command latency in seconds, parse excluded. Labels: command.
pub const COMMAND_DURATION_SECONDS: &str = "roombook_command_duration_seconds";

/// Counter: front-end commands executed. Labels: command, status.
pub const COMMANDS_TOTAL: &str = "roombook_commands_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

/// Map a Command variant to a short label for metrics.
pub fn command_label(cmd: &Command) -> &'static str {
    match cmd {
        Command::Rooms => "rooms",
        Command::Book { .. } => "book",
        Command::Available { .. } => "available",
        Command::Free { .. } => "free",
        Command::Cancel { .. } => "cancel",
        Command::Bookings { .. } => "bookings",
        Command::Show { .. } => "show",
    }
}
