//! Optimization engine
//!
//! Takes the catalog's records, decides which interfaces warrant a ring
//! buffer mutation, and applies those mutations concurrently with an
//! explicit worker bound.

mod optimizer;

pub use optimizer::*;
