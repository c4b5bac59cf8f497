//! Recalculation of the derived per-device aggregates.
//!
//! [`stats`] turns a snapshot of submissions into display rows without I/O.
//! [`engine`] runs snapshot, compute, and replace as one serialized pass
//! against any [`AggregateStore`].

pub mod engine;
pub mod stats;

pub use engine::{AggregateStore, RecalcEngine, RecalcOutcome, RecalcSummary};
pub use stats::compute_display_models;
