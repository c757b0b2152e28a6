//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_decisions_total` (counter): root-request decisions by outcome
//! - `gate_forbidden_total` (counter): rejected API requests answered 403
//! - `gate_upstream_requests_total` (counter): forwarded requests by status
//! - `gate_upstream_duration_seconds` (histogram): upstream latency
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter serves its own scrape endpoint

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::access::Verdict;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the verdict of a root request.
pub fn record_decision(verdict: &Verdict) {
    metrics::counter!("gate_decisions_total", "outcome" => verdict.outcome()).increment(1);
    if verdict.status.is_some() {
        metrics::counter!("gate_forbidden_total").increment(1);
    }
}

/// Record a forwarded request.
pub fn record_upstream(status: u16, start: Instant) {
    metrics::counter!("gate_upstream_requests_total", "status" => status.to_string())
        .increment(1);
    metrics::histogram!("gate_upstream_duration_seconds").record(start.elapsed().as_secs_f64());
}
