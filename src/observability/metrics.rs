//! Metrics collection and exposition.
//!
//! # Metrics
//! - `viewer_proxy_requests_total` (counter): proxied requests by status
//! - `viewer_proxy_request_duration_seconds` (histogram): time to response head
//! - `viewer_proxy_in_flight` (gauge): admission tokens currently held
//! - `viewer_proxy_relay_errors_total` (counter): bodies cut short after the status was sent
//! - `viewer_item_lookups_total` (counter): item lookups by outcome
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_proxy_request(status: u16, start: Instant) {
    counter!("viewer_proxy_requests_total", "status" => status.to_string()).increment(1);
    histogram!("viewer_proxy_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn gate_acquired() {
    gauge!("viewer_proxy_in_flight").increment(1.0);
}

pub fn gate_released() {
    gauge!("viewer_proxy_in_flight").decrement(1.0);
}

pub fn record_relay_error(stage: &'static str) {
    counter!("viewer_proxy_relay_errors_total", "stage" => stage).increment(1);
}

pub fn record_item_lookup(outcome: &'static str) {
    counter!("viewer_item_lookups_total", "outcome" => outcome).increment(1);
}
