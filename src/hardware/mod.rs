//! Hardware query module
//!
//! Provides the vendor-neutral capability for querying and mutating
//! NIC ring buffer state, with a production adapter backed by ethtool.

mod ethtool;
mod port;

pub use ethtool::*;
pub use port::*;
