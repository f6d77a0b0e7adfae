//! Metrics emitted by the JWKS client.
//!
//! All metrics follow Prometheus naming conventions:
//! - `jwks_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! Labels are bounded: `result` (hit, miss), `operation` (discovery,
//! key_set), `status` (success, error) and `error_type` (`JwksError::kind`).
//! No metric is labeled by `kid`.

use metrics::{counter, histogram};
use std::time::Duration;

/// Record a cache lookup.
///
/// Metric: `jwks_cache_lookups_total`
/// Labels: `result`
pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("jwks_cache_lookups_total", "result" => result).increment(1);
}

/// Record a discovery or key set request.
///
/// Metric: `jwks_fetches_total`, `jwks_fetch_duration_seconds`
/// Labels: `operation`, `status`
pub fn record_fetch(operation: &'static str, success: bool, duration: Duration) {
    let status = if success { "success" } else { "error" };

    histogram!("jwks_fetch_duration_seconds", "operation" => operation)
        .record(duration.as_secs_f64());

    counter!("jwks_fetches_total",
        "operation" => operation,
        "status" => status
    )
    .increment(1);
}

/// Record a failed key lookup.
///
/// Metric: `jwks_key_lookup_errors_total`
/// Labels: `error_type`
pub fn record_key_lookup_error(error_type: &'static str) {
    counter!("jwks_key_lookup_errors_total", "error_type" => error_type).increment(1);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};

    fn counter_value(
        snapshot: &[(
            metrics_util::CompositeKey,
            Option<metrics::Unit>,
            Option<metrics::SharedString>,
            DebugValue,
        )],
        name: &str,
        label: (&str, &str),
    ) -> u64 {
        snapshot
            .iter()
            .filter(|(key, _, _, _)| key.key().name() == name)
            .filter(|(key, _, _, _)| {
                key.key()
                    .labels()
                    .any(|l| l.key() == label.0 && l.value() == label.1)
            })
            .map(|(_, _, _, value)| match value {
                DebugValue::Counter(count) => *count,
                _ => 0,
            })
            .sum()
    }

    #[test]
    fn test_cache_lookup_counters() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        metrics::with_local_recorder(&recorder, || {
            record_cache_lookup(true);
            record_cache_lookup(true);
            record_cache_lookup(false);
        });

        let snapshot = snapshotter.snapshot().into_vec();
        assert_eq!(
            counter_value(&snapshot, "jwks_cache_lookups_total", ("result", "hit")),
            2
        );
        assert_eq!(
            counter_value(&snapshot, "jwks_cache_lookups_total", ("result", "miss")),
            1
        );
    }

    #[test]
    fn test_fetch_metrics() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        metrics::with_local_recorder(&recorder, || {
            record_fetch("discovery", true, Duration::from_millis(20));
            record_fetch("key_set", false, Duration::from_millis(5));
        });

        let snapshot = snapshotter.snapshot().into_vec();
        assert_eq!(
            counter_value(&snapshot, "jwks_fetches_total", ("operation", "discovery")),
            1
        );
        assert_eq!(
            counter_value(&snapshot, "jwks_fetches_total", ("status", "error")),
            1
        );
        assert!(snapshot
            .iter()
            .any(|(key, _, _, _)| key.key().name() == "jwks_fetch_duration_seconds"));
    }

    #[test]
    fn test_key_lookup_error_counter() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        metrics::with_local_recorder(&recorder, || {
            record_key_lookup_error("key_not_found");
        });

        let snapshot = snapshotter.snapshot().into_vec();
        assert_eq!(
            counter_value(
                &snapshot,
                "jwks_key_lookup_errors_total",
                ("error_type", "key_not_found")
            ),
            1
        );
    }
}
