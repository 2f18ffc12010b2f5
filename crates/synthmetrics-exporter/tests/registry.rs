#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use synthmetrics_core::{ResourceKind, ResourceSample};
use synthmetrics_exporter::obs::metrics::{Histogram, ResourceMetrics, REQUEST_BUCKETS_SECS};

#[test]
fn gauges_overwrite_and_accept_anything() {
    let m = ResourceMetrics::new();
    m.cpu_usage.set(10.0);
    m.cpu_usage.set(-3.5);
    assert_eq!(m.cpu_usage.get(), -3.5);
    m.disk_io.set(9_999.0);
    assert_eq!(m.gauge(ResourceKind::DiskIo).get(), 9_999.0);
}

#[test]
fn counters_only_go_up() {
    let m = ResourceMetrics::new();
    for i in 1..=5 {
        m.updates.inc();
        assert_eq!(m.updates.get(), i);
    }
    m.errors.add(3);
    assert_eq!(m.errors.get(), 3);
}

#[test]
fn histogram_buckets_are_cumulative() {
    let h = Histogram::new(&REQUEST_BUCKETS_SECS);
    for v in [0.05, 0.3, 2.5, 20.0] {
        h.observe(v);
    }
    assert_eq!(h.count(), 4);
    assert!((h.sum() - 22.85).abs() < 1e-9);
    let counts: Vec<u64> = h.buckets().into_iter().map(|(_, c)| c).collect();
    assert_eq!(counts, vec![1, 1, 2, 2, 2, 3, 3]);
}

#[test]
fn record_sample_feeds_gauges_and_summary() {
    let m = ResourceMetrics::new();
    let s = ResourceSample {
        cpu: 1.0,
        memory: 40.0,
        disk_io: 3.0,
        network_bandwidth: 4.0,
    };
    m.record_sample(&s);
    m.record_sample(&ResourceSample { memory: 60.0, ..s });

    assert_eq!(m.snapshot(), ResourceSample { memory: 60.0, ..s });
    assert_eq!(m.memory_summary.count(), 2);
    assert_eq!(m.memory_summary.sum(), 100.0);
}

#[test]
fn render_exposes_every_instrument() {
    let m = ResourceMetrics::new();
    m.cpu_usage.set(42.5);
    m.request_time.observe(0.3);
    m.updates.inc();
    m.memory_summary.observe(55.0);
    m.spikes.inc(&[("condition", "cpu_spike")]);

    let out = m.render();
    let expected = [
        "# HELP cpu_usage Random CPU usage percentage between 0 and 100",
        "# TYPE cpu_usage gauge",
        "cpu_usage 42.5",
        "# TYPE memory_usage gauge",
        "memory_usage 0.0",
        "# TYPE disk_io gauge",
        "# TYPE network_bandwidth gauge",
        "# TYPE request_processing_seconds histogram",
        "request_processing_seconds_bucket{le=\"0.2\"} 0",
        "request_processing_seconds_bucket{le=\"0.5\"} 1",
        "request_processing_seconds_bucket{le=\"10.0\"} 1",
        "request_processing_seconds_bucket{le=\"+Inf\"} 1",
        "request_processing_seconds_count 1",
        "request_processing_seconds_sum 0.3",
        "# TYPE error_total counter",
        "error_total 0",
        "update_total 1",
        "# TYPE memory_summary summary",
        "memory_summary_count 1",
        "memory_summary_sum 55.0",
        "# TYPE spike_total counter",
        "spike_total{condition=\"cpu_spike\"} 1",
    ];
    for line in expected {
        assert!(out.lines().any(|l| l == line), "missing line {line:?} in\n{out}");
    }
}

#[test]
fn labelled_counter_defaults_to_zero() {
    let m = ResourceMetrics::new();
    assert_eq!(m.spikes.get(&[("condition", "memory_leak")]), 0);
    m.spikes.add(&[("condition", "memory_leak")], 2);
    assert_eq!(m.spikes.get(&[("condition", "memory_leak")]), 2);
}

/// Split a sample line into `(metric name, labels, value)`.
fn parse_sample(line: &str) -> (String, Vec<(String, String)>, f64) {
    let (series, value) = line.rsplit_once(' ').expect("sample has a value");
    let value: f64 = value.parse().unwrap_or_else(|_| panic!("bad value in {line:?}"));
    let (name, labels) = match series.split_once('{') {
        Some((name, rest)) => {
            let body = rest.strip_suffix('}').expect("label set is closed");
            let labels = body
                .split(',')
                .filter(|kv| !kv.is_empty())
                .map(|kv| {
                    let (k, v) = kv.split_once('=').expect("label has '='");
                    let v = v.strip_prefix('"').and_then(|v| v.strip_suffix('"')).expect("quoted value");
                    (k.to_string(), v.to_string())
                })
                .collect();
            (name.to_string(), labels)
        }
        None => (series.to_string(), Vec::new()),
    };
    assert!(
        name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
        "bad metric name {name:?}"
    );
    (name, labels, value)
}

#[test]
fn exposition_is_well_formed() {
    let m = ResourceMetrics::new();
    m.record_sample(&ResourceSample {
        cpu: 12.5,
        memory: 80.25,
        disk_io: 300.0,
        network_bandwidth: 640.0,
    });
    for v in [0.05, 0.15, 0.7, 1.5, 2.9, 2.9] {
        m.request_time.observe(v);
    }
    m.errors.inc();
    m.updates.add(6);
    m.spikes.inc(&[("condition", "memory_leak")]);
    m.spikes.inc(&[("condition", "cpu_spike")]);

    let out = m.render();
    assert!(out.ends_with('\n'));

    let mut family: Option<(String, String)> = None;
    let mut help_seen = Vec::new();
    let mut buckets: Vec<(String, f64)> = Vec::new();
    let mut hist_count = None;

    for line in out.lines() {
        if let Some(rest) = line.strip_prefix("# HELP ") {
            let (name, help) = rest.split_once(' ').expect("help text");
            assert!(!help.is_empty());
            assert!(!help_seen.contains(&name.to_string()), "{name} declared twice");
            help_seen.push(name.to_string());
            continue;
        }
        if let Some(rest) = line.strip_prefix("# TYPE ") {
            let (name, kind) = rest.split_once(' ').expect("type");
            assert_eq!(help_seen.last().map(String::as_str), Some(name), "TYPE without HELP");
            assert!(["gauge", "counter", "histogram", "summary"].contains(&kind));
            family = Some((name.to_string(), kind.to_string()));
            continue;
        }

        let (fam, kind) = family.clone().expect("sample before any TYPE line");
        let (name, labels, value) = parse_sample(line);
        let suffixes: &[&str] = match kind.as_str() {
            "histogram" => &["_bucket", "_count", "_sum"][..],
            "summary" => &["_count", "_sum"][..],
            _ => &[""][..],
        };
        assert!(
            suffixes.iter().any(|s| name == format!("{fam}{s}")),
            "{name} does not belong to {fam}"
        );
        if kind == "counter" {
            assert!(value >= 0.0 && value.fract() == 0.0, "{line}");
        }
        if name.ends_with("_bucket") {
            let le = labels.iter().find(|(k, _)| k == "le").expect("bucket has le");
            buckets.push((le.1.clone(), value));
        }
        if kind == "histogram" && name.ends_with("_count") {
            hist_count = Some(value);
        }
    }

    assert_eq!(help_seen.len(), 9);
    let counts: Vec<f64> = buckets.iter().map(|(_, c)| *c).collect();
    assert!(counts.windows(2).all(|w| w[0] <= w[1]), "buckets not cumulative: {buckets:?}");
    assert_eq!(buckets.last().map(|(le, _)| le.as_str()), Some("+Inf"));
    assert_eq!(buckets.len(), REQUEST_BUCKETS_SECS.len() + 1);
    assert_eq!(counts.last().copied(), hist_count);
    assert_eq!(hist_count, Some(6.0));
}
