//! Top-level facade crate for synthmetrics.
//!
//! Re-exports the resource model and the exporter so users can depend on a single crate.

pub mod core {
    pub use synthmetrics_core::*;
}

pub mod exporter {
    pub use synthmetrics_exporter::*;
}
