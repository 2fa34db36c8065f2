//! Metrics collection and exposition.
//!
//! # Metrics
//! - `minter_http_requests_total` (counter): requests by route and status
//! - `minter_tokens_minted_total` (counter): tokens accepted by the platform
//! - `minter_registrations_total` (counter): registrations by outcome
//! - `minter_confirmation_waits_total` (counter): waits by outcome
//! - `minter_confirmation_wait_seconds` (histogram): time spent waiting

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint enabled"),
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus exporter"),
    }
}

pub fn record_http_request(route: &str, status: u16) {
    ::metrics::counter!(
        "minter_http_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_tokens_minted(count: u64) {
    ::metrics::counter!("minter_tokens_minted_total").increment(count);
}

pub fn record_registration(outcome: &'static str) {
    ::metrics::counter!("minter_registrations_total", "outcome" => outcome).increment(1);
}

pub fn record_confirmation_wait(outcome: &'static str, started: Instant) {
    ::metrics::counter!("minter_confirmation_waits_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("minter_confirmation_wait_seconds")
        .record(started.elapsed().as_secs_f64());
}
