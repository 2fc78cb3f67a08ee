use std::env;
use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{info, warn};

pub const RANKINGS_TOTAL: &str = "lexmatch_rankings_total";
pub const CANDIDATES_SCORED_TOTAL: &str = "lexmatch_candidates_scored_total";
pub const RANKED_MATCHES: &str = "lexmatch_ranked_matches";
pub const RANKING_DURATION_SECONDS: &str = "lexmatch_ranking_duration_seconds";

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn resolve_port(raw: Option<String>, default_port: u16) -> u16 {
    raw.and_then(|raw| raw.trim().parse::<u16>().ok())
        .unwrap_or(default_port)
}

/// Serves Prometheus metrics on `0.0.0.0:<port>` once per process.
///
/// The port comes from `port_env` or falls back to `default_port`. The
/// exporter runs as a task on the current tokio runtime, so this must be
/// called from inside one. Later calls return the existing handle.
pub fn init_metrics(port_env: &str, default_port: u16) -> Option<&'static PrometheusHandle> {
    if let Some(existing) = PROMETHEUS_HANDLE.get() {
        return Some(existing);
    }

    let port = resolve_port(env::var(port_env).ok(), default_port);
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        warn!(metrics_port = port, "no tokio runtime; prometheus exporter not started");
        return None;
    };

    let (recorder, exporter) = match PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .build()
    {
        Ok(parts) => parts,
        Err(err) => {
            warn!(error = %err, metrics_port = port, "failed to bind prometheus exporter");
            return None;
        }
    };

    let handle = recorder.handle();
    if let Err(err) = metrics::set_global_recorder(recorder) {
        warn!(error = %err, "metrics recorder already installed");
        return None;
    }

    runtime.spawn(async move {
        if let Err(err) = exporter.await {
            warn!(error = ?err, "prometheus exporter stopped");
        }
    });

    let _ = PROMETHEUS_HANDLE.set(handle);
    describe_metrics();
    info!(metrics_port = port, "serving prometheus metrics");
    PROMETHEUS_HANDLE.get()
}

fn describe_metrics() {
    describe_counter!(RANKINGS_TOTAL, "Completed ranking runs");
    describe_counter!(CANDIDATES_SCORED_TOTAL, "Candidates scored across all runs");
    describe_histogram!(RANKED_MATCHES, "Matches returned per ranking run");
    describe_histogram!(RANKING_DURATION_SECONDS, "Wall time of one ranking run");
}

/// Records one completed ranking run. A no-op until a recorder is installed.
pub fn record_ranking(mode: &str, pool_size: usize, returned: usize, elapsed: Duration) {
    let mode = mode.to_string();
    counter!(RANKINGS_TOTAL, "mode" => mode.clone()).increment(1);
    counter!(CANDIDATES_SCORED_TOTAL, "mode" => mode.clone()).increment(pool_size as u64);
    histogram!(RANKED_MATCHES, "mode" => mode.clone()).record(returned as f64);
    histogram!(RANKING_DURATION_SECONDS, "mode" => mode).record(elapsed.as_secs_f64());
}
