//! Queue snapshots as reported by squeue

/// A single queued job as an ordered tuple of string fields
pub mod row;

/// The full queue listing at a point in time, plus display helpers
pub mod snapshot;
