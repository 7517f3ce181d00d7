//! Continuous monitoring
//!
//! Keeps ring buffer settings at their maxima over time by re-running the
//! discovery and optimization pipeline on a fixed interval.

mod service;

pub use service::*;
