//! Report rendering
//!
//! Turns optimization outcomes into operator-facing output: a fixed-width
//! table for terminals and a JSON document for tooling.

mod json;
mod table;

pub use json::*;
pub use table::*;
