//! Interface catalog module
//!
//! Provides discovery and classification of host network interfaces,
//! producing the per-NIC records the optimization engine works on.

mod discover;
mod nic;

pub use discover::*;
pub use nic::*;
