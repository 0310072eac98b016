//! Metrics declarations for solarsim.
//!
//! This crate re-exports the `metrics` crate and declares every metric the
//! workspace emits as a structured [`Metric`] constant, so names are never
//! typed twice.
//!
//! Without an installed recorder all metric calls are no-ops.
//!
//! # Example
//!
//! ```rust
//! use solarsim_metrics::{metric_defs, Metric, MetricKind};
//!
//! assert_eq!(metric_defs::TILES_DOWNLOADED.kind, MetricKind::Counter);
//! metrics::counter!(metric_defs::TILES_DOWNLOADED.name).increment(1);
//! ```

pub use metrics;

use metrics::{describe_counter, describe_gauge, describe_histogram, Unit};

/// The kind of metric (counter, gauge, or histogram).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// A monotonically increasing counter.
    Counter,
    /// A gauge that can go up and down.
    Gauge,
    /// A histogram for recording distributions.
    Histogram,
}

impl MetricKind {
    /// Returns the kind as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metric declaration with its metadata.
///
/// ```rust
/// use solarsim_metrics::Metric;
/// use metrics::Unit;
///
/// const RETRIES: Metric = Metric::counter("solarsim.example.retries")
///     .with_description("Example counter")
///     .with_unit(Unit::Count)
///     .with_labels(&["stage"]);
///
/// assert_eq!(RETRIES.labels, &["stage"]);
/// ```
#[derive(Debug, Clone)]
pub struct Metric {
    /// The metric name (e.g., "solarsim.tiles.downloaded").
    pub name: &'static str,
    /// The kind of metric.
    pub kind: MetricKind,
    /// Human-readable description.
    pub description: &'static str,
    /// The unit of measurement (optional).
    pub unit: Option<Unit>,
    /// Expected label keys.
    pub labels: &'static [&'static str],
}

impl Metric {
    /// Creates a new counter metric with the given name.
    pub const fn counter(name: &'static str) -> Self {
        Self::new(name, MetricKind::Counter)
    }

    /// Creates a new gauge metric with the given name.
    pub const fn gauge(name: &'static str) -> Self {
        Self::new(name, MetricKind::Gauge)
    }

    /// Creates a new histogram metric with the given name.
    pub const fn histogram(name: &'static str) -> Self {
        Self::new(name, MetricKind::Histogram)
    }

    const fn new(name: &'static str, kind: MetricKind) -> Self {
        Self {
            name,
            kind,
            description: "",
            unit: None,
            labels: &[],
        }
    }

    /// Sets the description for the metric.
    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Sets the unit for the metric.
    pub const fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Sets the expected label keys for the metric.
    pub const fn with_labels(mut self, labels: &'static [&'static str]) -> Self {
        self.labels = labels;
        self
    }

    /// Registers this metric's description with the installed recorder.
    pub fn describe(&self) {
        match (self.kind, self.unit) {
            (MetricKind::Counter, Some(unit)) => {
                describe_counter!(self.name, unit, self.description);
            }
            (MetricKind::Counter, None) => {
                describe_counter!(self.name, self.description);
            }
            (MetricKind::Gauge, Some(unit)) => {
                describe_gauge!(self.name, unit, self.description);
            }
            (MetricKind::Gauge, None) => {
                describe_gauge!(self.name, self.description);
            }
            (MetricKind::Histogram, Some(unit)) => {
                describe_histogram!(self.name, unit, self.description);
            }
            (MetricKind::Histogram, None) => {
                describe_histogram!(self.name, self.description);
            }
        }
    }
}

/// All metric definitions.
pub mod metric_defs {
    use super::{Metric, Unit};

    // ========================================================================
    // Tile Sync
    // ========================================================================

    /// Tiles downloaded into the cache.
    pub const TILES_DOWNLOADED: Metric = Metric::counter("solarsim.tiles.downloaded")
        .with_description("Tiles downloaded into the local cache")
        .with_unit(Unit::Count);

    /// Bytes written to tile files.
    pub const TILES_BYTES: Metric = Metric::counter("solarsim.tiles.bytes")
        .with_description("Bytes downloaded into tile files")
        .with_unit(Unit::Bytes);

    /// Listed tiles that were already present locally.
    pub const TILES_SKIPPED: Metric = Metric::counter("solarsim.tiles.skipped")
        .with_description("Listed tiles already present in the cache")
        .with_unit(Unit::Count);

    /// Tiles in the cache when a sync starts.
    pub const TILES_CACHED: Metric = Metric::gauge("solarsim.tiles.cached")
        .with_description("Tiles present in the cache at the start of a sync")
        .with_unit(Unit::Count);

    // ========================================================================
    // Engine
    // ========================================================================

    /// Operations sent to the GIS engine.
    ///
    /// Labels: op
    pub const ENGINE_OPERATIONS: Metric = Metric::counter("solarsim.engine.operations")
        .with_description("Operations executed by the GIS engine")
        .with_unit(Unit::Count)
        .with_labels(&["op"]);

    /// Wall-clock time of each engine operation.
    ///
    /// Labels: op
    pub const ENGINE_OPERATION_TIME: Metric = Metric::histogram("solarsim.engine.operation_time_s")
        .with_description("Wall-clock time of an engine operation in seconds")
        .with_unit(Unit::Seconds)
        .with_labels(&["op"]);

    /// Wall-clock time of the area solar radiation run.
    pub const SOLAR_RADIATION_TIME: Metric = Metric::histogram("solarsim.solar.radiation_time_s")
        .with_description("Wall-clock time of the solar radiation simulation in seconds")
        .with_unit(Unit::Seconds);

    /// Every declared metric.
    pub const ALL: &[&Metric] = &[
        &TILES_DOWNLOADED,
        &TILES_BYTES,
        &TILES_SKIPPED,
        &TILES_CACHED,
        &ENGINE_OPERATIONS,
        &ENGINE_OPERATION_TIME,
        &SOLAR_RADIATION_TIME,
    ];
}

/// Register descriptions for all metrics. Call once at startup.
pub fn describe_metrics() {
    for metric in metric_defs::ALL {
        metric.describe();
    }
}
