//! Prometheus metrics
//!
//! Counters are recorded through the `metrics` facade. Without an installed
//! recorder (tests) they are no-ops.

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder. Call once, from `main`.
pub fn install_recorder() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {}", e))
}

pub fn record_auth_rejection(reason: &'static str) {
    metrics::counter!("todo_auth_rejections_total", "reason" => reason).increment(1);
}

/// `outcome` is `success`, `rejected` or `error`
pub fn record_signin(outcome: &'static str) {
    metrics::counter!("todo_signins_total", "outcome" => outcome).increment(1);
}

pub fn record_user_registered() {
    metrics::counter!("todo_users_registered_total").increment(1);
}

pub fn record_todo_created() {
    metrics::counter!("todo_todos_created_total").increment(1);
}
