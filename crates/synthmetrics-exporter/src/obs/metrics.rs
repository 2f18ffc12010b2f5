//! Process-wide metrics registry for the exporter.
//!
//! Instruments are plain atomics so a scrape never waits on the generator.
//! Floating point values are stored as their bit pattern in `AtomicU64`.
//! Rendering follows the Prometheus text exposition format; histogram bucket
//! bounds are in seconds.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use synthmetrics_core::{ResourceKind, ResourceSample};

/// Histogram bounds for `request_processing_seconds`.
pub const REQUEST_BUCKETS_SECS: [f64; 7] = [0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0];

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Float formatting as scrapers expect it (`1.0`, `+Inf`, `NaN`).
fn fmt_float(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "+Inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format!("{v:?}")
    }
}

fn write_header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {name} {help}");
    let _ = writeln!(out, "# TYPE {name} {kind}");
}

#[derive(Default)]
struct AtomicF64(AtomicU64);

impl AtomicF64 {
    fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn store(&self, v: f64) {
        self.0.store(v.to_bits(), Ordering::Relaxed);
    }

    fn add(&self, v: f64) {
        let mut cur = self.0.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(cur) + v).to_bits();
            match self
                .0
                .compare_exchange_weak(cur, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return,
                Err(actual) => cur = actual,
            }
        }
    }
}

/// Latest value, overwritten on every `set`.
#[derive(Default)]
pub struct Gauge {
    value: AtomicF64,
}

impl Gauge {
    pub fn set(&self, v: f64) {
        self.value.store(v);
    }

    pub fn get(&self) -> f64 {
        self.value.load()
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "gauge");
        let _ = writeln!(out, "{} {}", name, fmt_float(self.get()));
    }
}

/// Monotonic integer count.
#[derive(Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    /// Increment by 1.
    pub fn inc(&self) {
        self.add(1);
    }

    pub fn add(&self, v: u64) {
        self.value.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "counter");
        let _ = writeln!(out, "{} {}", name, self.get());
    }
}

/// Counter family keyed by label set.
#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    fn key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut key: Vec<(String, String)> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        key.sort();
        key
    }

    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(Self::key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for a label set; 0 if never incremented.
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&Self::key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "counter");
        let mut rows: Vec<(String, u64)> = self
            .map
            .iter()
            .map(|r| {
                let label_str = r
                    .key()
                    .iter()
                    .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                    .collect::<Vec<_>>()
                    .join(",");
                (label_str, r.value().load(Ordering::Relaxed))
            })
            .collect();
        rows.sort();
        for (label_str, val) in rows {
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str, val);
        }
    }
}

/// Fixed-bucket histogram.
pub struct Histogram {
    bounds: Vec<f64>,
    buckets: Vec<AtomicU64>,
    count: AtomicU64,
    sum: AtomicF64,
}

impl Histogram {
    pub fn new(bounds: &[f64]) -> Self {
        Self {
            bounds: bounds.to_vec(),
            buckets: bounds.iter().map(|_| AtomicU64::new(0)).collect(),
            count: AtomicU64::new(0),
            sum: AtomicF64::default(),
        }
    }

    /// Record one observation into every bucket whose bound covers it.
    pub fn observe(&self, v: f64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum.add(v);
        for (i, &b) in self.bounds.iter().enumerate() {
            if v <= b {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> f64 {
        self.sum.load()
    }

    /// Cumulative `(le, count)` pairs, excluding `+Inf`.
    pub fn buckets(&self) -> Vec<(f64, u64)> {
        self.bounds
            .iter()
            .zip(&self.buckets)
            .map(|(&le, c)| (le, c.load(Ordering::Relaxed)))
            .collect()
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "histogram");
        for (le, count) in self.buckets() {
            let _ = writeln!(out, "{}_bucket{{le=\"{}\"}} {}", name, fmt_float(le), count);
        }
        let count = self.count();
        let _ = writeln!(out, "{}_bucket{{le=\"+Inf\"}} {}", name, count);
        let _ = writeln!(out, "{}_count {}", name, count);
        let _ = writeln!(out, "{}_sum {}", name, fmt_float(self.sum()));
    }
}

/// Running count and sum of observations.
#[derive(Default)]
pub struct Summary {
    count: AtomicU64,
    sum: AtomicF64,
}

impl Summary {
    pub fn observe(&self, v: f64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum.add(v);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> f64 {
        self.sum.load()
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "summary");
        let _ = writeln!(out, "{}_count {}", name, self.count());
        let _ = writeln!(out, "{}_sum {}", name, fmt_float(self.sum()));
    }
}

/// Every instrument the exporter publishes. Built once at startup and shared
/// behind an `Arc`; no instrument is added or removed afterwards.
pub struct ResourceMetrics {
    pub cpu_usage: Gauge,
    pub memory_usage: Gauge,
    pub disk_io: Gauge,
    pub network_bandwidth: Gauge,
    pub request_time: Histogram, // In seconds
    pub errors: Counter,
    pub updates: Counter,
    pub memory_summary: Summary,
    pub spikes: CounterVec,
}

impl Default for ResourceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceMetrics {
    pub fn new() -> Self {
        Self {
            cpu_usage: Gauge::default(),
            memory_usage: Gauge::default(),
            disk_io: Gauge::default(),
            network_bandwidth: Gauge::default(),
            request_time: Histogram::new(&REQUEST_BUCKETS_SECS),
            errors: Counter::default(),
            updates: Counter::default(),
            memory_summary: Summary::default(),
            spikes: CounterVec::default(),
        }
    }

    pub fn gauge(&self, kind: ResourceKind) -> &Gauge {
        match kind {
            ResourceKind::Cpu => &self.cpu_usage,
            ResourceKind::Memory => &self.memory_usage,
            ResourceKind::DiskIo => &self.disk_io,
            ResourceKind::NetworkBandwidth => &self.network_bandwidth,
        }
    }

    /// Record a full sample: the four gauges plus the memory summary.
    pub fn record_sample(&self, sample: &ResourceSample) {
        for kind in ResourceKind::ALL {
            self.gauge(kind).set(sample.get(kind));
        }
        self.memory_summary.observe(sample.memory);
    }

    /// Current values of the four gauges.
    pub fn snapshot(&self) -> ResourceSample {
        ResourceSample {
            cpu: self.cpu_usage.get(),
            memory: self.memory_usage.get(),
            disk_io: self.disk_io.get(),
            network_bandwidth: self.network_bandwidth.get(),
        }
    }

    /// Render all instruments in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.cpu_usage.render(
            "cpu_usage",
            "Random CPU usage percentage between 0 and 100",
            &mut out,
        );
        self.memory_usage.render(
            "memory_usage",
            "Random memory usage percentage between 0 and 100",
            &mut out,
        );
        self.disk_io
            .render("disk_io", "Random disk I/O operations per second", &mut out);
        self.network_bandwidth.render(
            "network_bandwidth",
            "Random network bandwidth usage in Mbps",
            &mut out,
        );
        self.request_time.render(
            "request_processing_seconds",
            "Time spent processing request",
            &mut out,
        );
        self.errors
            .render("error_total", "Total number of errors", &mut out);
        self.updates
            .render("update_total", "Total number of metric updates", &mut out);
        self.memory_summary
            .render("memory_summary", "Summary of memory usage values", &mut out);
        self.spikes.render(
            "spike_total",
            "Total number of simulated high-load conditions",
            &mut out,
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_render_like_scrapers_expect() {
        assert_eq!(fmt_float(1.0), "1.0");
        assert_eq!(fmt_float(0.1), "0.1");
        assert_eq!(fmt_float(f64::INFINITY), "+Inf");
        assert_eq!(fmt_float(f64::NAN), "NaN");
    }

    #[test]
    fn label_values_are_escaped() {
        assert_eq!(escape_label("a\"b\\c\n"), "a\\\"b\\\\c\\n");
    }

    #[test]
    fn atomic_f64_accumulates() {
        let a = AtomicF64::default();
        a.add(1.5);
        a.add(-0.25);
        assert_eq!(a.load(), 1.25);
    }
}
