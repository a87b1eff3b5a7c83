//! HTTP client for the Slurm proxy backend

/// Job actions and their route/method bindings
pub mod action;

/// Issue authenticated requests against the backend routes
pub mod client;

/// Response envelopes shared by every job route
pub mod response;
