//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus, statsd);
//! without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `whatflower_`. Counters end in `_total`,
//! histograms use seconds.
//!
//! # Common labels
//!
//! - `status`: "ok", "model_error", "network_error" or "parse_error" for
//!   runs; "found", "not_found" or "error" for lookups
//! - `stage`: "classify" or "enrich"
//! - `client`: encyclopedia client name (e.g. "wikipedia")

/// Total pipeline runs that reached a result.
///
/// Labels: `status`.
pub const RUNS_TOTAL: &str = "whatflower_runs_total";

/// End-to-end pipeline run duration in seconds.
pub const RUN_DURATION_SECONDS: &str = "whatflower_run_duration_seconds";

/// Per-stage duration in seconds.
///
/// Labels: `stage` ("classify" | "enrich").
pub const STAGE_DURATION_SECONDS: &str = "whatflower_stage_duration_seconds";

/// Pipeline runs abandoned through their cancellation token.
pub const RUNS_CANCELLED_TOTAL: &str = "whatflower_runs_cancelled_total";

/// Total encyclopedia lookups.
///
/// Labels: `client`, `status` ("found" | "not_found" | "error").
pub const LOOKUPS_TOTAL: &str = "whatflower_lookups_total";

/// Encyclopedia request duration in seconds.
///
/// Labels: `client`.
pub const LOOKUP_DURATION_SECONDS: &str = "whatflower_lookup_duration_seconds";
