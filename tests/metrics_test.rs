//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use url::Url;

use linkpeek::telemetry;
use linkpeek::{CacheConfig, ContentProbe, LinkPeekError, MarkupRelay, Resolver, Result};

// ============================================================================
// Mocks
// ============================================================================

struct StaticProbe(Option<&'static str>);

#[async_trait]
impl ContentProbe for StaticProbe {
    fn name(&self) -> &str {
        "static"
    }

    async fn content_type(&self, _url: &Url) -> Result<Option<String>> {
        Ok(self.0.map(String::from))
    }
}

struct FailingProbe;

#[async_trait]
impl ContentProbe for FailingProbe {
    fn name(&self) -> &str {
        "failing"
    }

    async fn content_type(&self, _url: &Url) -> Result<Option<String>> {
        Err(LinkPeekError::Http("timed out".to_string()))
    }
}

struct DownRelay;

#[async_trait]
impl MarkupRelay for DownRelay {
    fn name(&self) -> &str {
        "down"
    }

    async fn fetch_markup(&self, _url: &Url) -> Result<String> {
        Err(LinkPeekError::RelayStatus {
            status: 502,
            message: "bad gateway".to_string(),
        })
    }
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Sum counter values for `name` whose labels include `label = value`.
fn counter_with_label(snapshot: &SnapshotVec, name: &str, label: &str, value: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter
                && key.key().name() == name
                && key
                    .key()
                    .labels()
                    .any(|l| l.key() == label && l.value() == value)
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

// ============================================================================
// Tests
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn resolution_records_counter_and_duration() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let record = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let resolver = Resolver::builder()
                    .probe(StaticProbe(Some("image/png")))
                    .relay(DownRelay)
                    .build()
                    .unwrap();
                resolver.classify_and_resolve("https://img.test/a.png").await
            })
        })
    });
    assert_eq!(record.title, "Image");

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::RESOLUTIONS_TOTAL), 1);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::RESOLUTIONS_TOTAL, "category", "image"),
        1
    );
    assert!(
        has_histogram(&snapshot, telemetry::RESOLUTION_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn transport_failures_are_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let resolver = Resolver::builder()
                    .probe(FailingProbe)
                    .relay(DownRelay)
                    .build()
                    .unwrap();
                resolver.classify_and_resolve("https://down.test/").await
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::PROBE_FAILURES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::RELAY_FAILURES_TOTAL), 1);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::RESOLUTIONS_TOTAL, "status", "fallback"),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn cache_hits_misses_and_evictions_are_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let resolver = Resolver::builder()
                    .probe(StaticProbe(Some("video/mp4")))
                    .relay(DownRelay)
                    .cache_config(CacheConfig::new().capacity(1))
                    .build()
                    .unwrap();
                resolver.classify_and_resolve("https://v.test/1.mp4").await;
                resolver.classify_and_resolve("https://v.test/1.mp4").await;
                resolver.classify_and_resolve("https://v.test/2.mp4").await;
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(
        counter_with_label(&snapshot, telemetry::CACHE_HITS_TOTAL, "scope", "resolver"),
        1
    );
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 2);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_EVICTIONS_TOTAL), 1);
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let resolver = Resolver::builder()
        .probe(StaticProbe(None))
        .relay(DownRelay)
        .build()
        .unwrap();
    let _record = resolver.classify_and_resolve("https://quiet.test/").await;
}
