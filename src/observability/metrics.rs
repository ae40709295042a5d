//! Metrics collection and exposition.
//!
//! # Metrics
//! - `replica_proof_submissions_total` (counter): submissions by `result`
//!   (`mined` or the failing stage)
//! - `replica_proof_confirmation_seconds` (histogram): broadcast to mined
//! - `replica_proof_rpc_health` (gauge): 1=reachable, 0=unreachable
//!
//! Without an installed recorder every call is a no-op.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Start the Prometheus scrape endpoint. Must run inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Count a finished submission.
pub fn record_submission(result: &'static str) {
    counter!("replica_proof_submissions_total", "result" => result).increment(1);
}

/// Record how long a broadcast transaction took to be mined.
pub fn record_confirmation(elapsed: Duration) {
    histogram!("replica_proof_confirmation_seconds").record(elapsed.as_secs_f64());
}

/// Record ledger reachability.
pub fn record_rpc_health(healthy: bool) {
    gauge!("replica_proof_rpc_health").set(if healthy { 1.0 } else { 0.0 });
}
