//! The job-action coordinator
//!
//! Polls the queue snapshot, fires one request per selected job per action,
//! counts responses so a batch triggers exactly one reload, and surfaces a
//! dismissible alert per response.

/// Dismissible user notifications
pub mod alert;

/// Per-batch and per-request bookkeeping
pub mod batch;

/// Drive fetches, dispatches, and submissions against the backend
pub mod manager;

/// Resolve submission paths against the server working directory
pub mod workdir;
