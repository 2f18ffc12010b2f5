//! synthmetrics exporter library entry.
//!
//! Wires the metrics registry, the random generator loop and the axum
//! exposition endpoint together. Consumed by the binary (`main.rs`) and by
//! integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod app_state;
pub mod config;
pub mod generator;
pub mod obs;
pub mod ops;
pub mod router;
pub mod server;
