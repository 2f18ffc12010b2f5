//! synthmetrics core: the resource model and error surface shared by the
//! exporter and its facade.
//!
//! This crate knows which indicators exist, what ranges they live in and
//! which high-load conditions can be simulated. It carries no runtime or
//! HTTP dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod resource;

/// Shared result type.
pub use error::{Result, SynthError};
pub use resource::{LoadCondition, ResourceKind, ResourceSample};
