//! Resource indicators and simulated load conditions.
//!
//! Every indicator has a fixed normal range that regular cycles draw from.
//! A load condition pins one indicator to a narrow band near the top of its
//! range.

use std::fmt;
use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One of the four fabricated system-resource indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Cpu,
    Memory,
    DiskIo,
    NetworkBandwidth,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Cpu,
        ResourceKind::Memory,
        ResourceKind::DiskIo,
        ResourceKind::NetworkBandwidth,
    ];

    /// Range a normal cycle draws from.
    pub fn normal_range(self) -> RangeInclusive<f64> {
        match self {
            ResourceKind::Cpu | ResourceKind::Memory => 0.0..=100.0,
            ResourceKind::DiskIo => 0.0..=500.0,
            ResourceKind::NetworkBandwidth => 0.0..=1000.0,
        }
    }

    /// Human-readable name used in log lines.
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Cpu => "CPU",
            ResourceKind::Memory => "Memory",
            ResourceKind::DiskIo => "Disk I/O",
            ResourceKind::NetworkBandwidth => "Network Bandwidth",
        }
    }

    /// Display unit used in log lines.
    pub fn unit(self) -> &'static str {
        match self {
            ResourceKind::Cpu | ResourceKind::Memory => "%",
            ResourceKind::DiskIo => "ops/s",
            ResourceKind::NetworkBandwidth => "Mbps",
        }
    }

    pub fn draw<R: Rng + ?Sized>(self, rng: &mut R) -> f64 {
        rng.gen_range(self.normal_range())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceKind::Cpu => "cpu",
            ResourceKind::Memory => "memory",
            ResourceKind::DiskIo => "disk_io",
            ResourceKind::NetworkBandwidth => "network_bandwidth",
        };
        f.write_str(s)
    }
}

/// Simulated high-load condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadCondition {
    CpuSpike,
    MemoryLeak,
    DiskThrashing,
}

impl LoadCondition {
    pub const ALL: [LoadCondition; 3] = [
        LoadCondition::CpuSpike,
        LoadCondition::MemoryLeak,
        LoadCondition::DiskThrashing,
    ];

    /// Indicator the condition overrides.
    pub fn target(self) -> ResourceKind {
        match self {
            LoadCondition::CpuSpike => ResourceKind::Cpu,
            LoadCondition::MemoryLeak => ResourceKind::Memory,
            LoadCondition::DiskThrashing => ResourceKind::DiskIo,
        }
    }

    /// High band the overriding value is drawn from.
    pub fn band(self) -> RangeInclusive<f64> {
        match self {
            LoadCondition::CpuSpike | LoadCondition::MemoryLeak => 90.0..=100.0,
            LoadCondition::DiskThrashing => 400.0..=500.0,
        }
    }

    pub fn draw<R: Rng + ?Sized>(self, rng: &mut R) -> f64 {
        rng.gen_range(self.band())
    }

    /// Label value used in `spike_total{condition=...}`.
    pub fn as_str(self) -> &'static str {
        match self {
            LoadCondition::CpuSpike => "cpu_spike",
            LoadCondition::MemoryLeak => "memory_leak",
            LoadCondition::DiskThrashing => "disk_thrashing",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            LoadCondition::CpuSpike => "Simulated high CPU usage",
            LoadCondition::MemoryLeak => "Simulated memory leak",
            LoadCondition::DiskThrashing => "Simulated disk thrashing",
        }
    }
}

impl fmt::Display for LoadCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One draw of the four indicators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceSample {
    pub cpu: f64,
    pub memory: f64,
    pub disk_io: f64,
    pub network_bandwidth: f64,
}

impl ResourceSample {
    /// Draw every indicator independently from its normal range.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            cpu: ResourceKind::Cpu.draw(rng),
            memory: ResourceKind::Memory.draw(rng),
            disk_io: ResourceKind::DiskIo.draw(rng),
            network_bandwidth: ResourceKind::NetworkBandwidth.draw(rng),
        }
    }

    pub fn get(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Cpu => self.cpu,
            ResourceKind::Memory => self.memory,
            ResourceKind::DiskIo => self.disk_io,
            ResourceKind::NetworkBandwidth => self.network_bandwidth,
        }
    }
}
