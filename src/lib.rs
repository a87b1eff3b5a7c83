//! Client-side coordinator for a Slurm job queue served over HTTP
//!
//! The backend collaborator proxies the Slurm CLI verbs (squeue, sbatch,
//! scancel, scontrol) behind a small REST surface. This crate keeps the
//! client half honest: fetching queue snapshots, batching per-job actions,
//! and deciding when a reload is due. Any host (the bundled CLI, a web app)
//! can drive it through [coordinator::manager::Coordinator].

/// Talk to the backend REST surface
pub mod backend;

/// User settings loaded from a JSON file
pub mod config;

/// Batch job actions and decide when to reload the queue
pub mod coordinator;

/// Queue snapshots and row bookkeeping
pub mod queue;

/// Interval-based row selection
pub mod selection;
