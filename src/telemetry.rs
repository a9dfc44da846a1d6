//! Telemetry metric name constants.
//!
//! Centralised metric names for linkpeek operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `linkpeek_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `category`: content category ("image", "pdf", "video", "html")
//! - `status`: outcome: "ok" or "fallback"
//! - `scope`: which cache: "resolver" or "client"

/// Total resolutions performed by the resolver (cache hits excluded).
///
/// Labels: `category`, `status` ("ok" | "fallback").
pub const RESOLUTIONS_TOTAL: &str = "linkpeek_resolutions_total";

/// Resolution duration in seconds, probe included.
///
/// Labels: `category`.
pub const RESOLUTION_DURATION_SECONDS: &str = "linkpeek_resolution_duration_seconds";

/// Total preview cache hits.
///
/// Labels: `scope`.
pub const CACHE_HITS_TOTAL: &str = "linkpeek_cache_hits_total";

/// Total preview cache misses.
///
/// Labels: `scope`.
pub const CACHE_MISSES_TOTAL: &str = "linkpeek_cache_misses_total";

/// Total entries pushed out of a full cache.
///
/// Labels: `scope`.
pub const CACHE_EVICTIONS_TOTAL: &str = "linkpeek_cache_evictions_total";

/// Total content-type probes that failed and defaulted to HTML.
pub const PROBE_FAILURES_TOTAL: &str = "linkpeek_probe_failures_total";

/// Total relay fetches that failed and degraded to a domain-only record.
pub const RELAY_FAILURES_TOTAL: &str = "linkpeek_relay_failures_total";
