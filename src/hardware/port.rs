//! Vendor-neutral hardware query capability
//!
//! The catalog and the optimization engine never talk to ethtool directly;
//! they consume this trait, which keeps the core testable against scripted
//! doubles and leaves raw tool output handling to the production adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Ring buffer state for one interface as reported by the hardware.
///
/// Maxima of 0 mean the hardware did not report a ceiling; such an
/// interface cannot be optimized and is surfaced as a configuration
/// defect if it otherwise looks eligible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingSettings {
    /// Current RX ring depth
    pub rx_current: u32,
    /// Current TX ring depth
    pub tx_current: u32,
    /// Hardware RX ceiling (0 = unknown/unsupported)
    pub rx_max: u32,
    /// Hardware TX ceiling (0 = unknown/unsupported)
    pub tx_max: u32,
}

impl RingSettings {
    /// Both maxima are known and positive
    pub fn maxima_known(&self) -> bool {
        self.rx_max > 0 && self.tx_max > 0
    }

    /// Current depth equals the hardware ceiling on both axes
    pub fn is_maxed(&self) -> bool {
        self.maxima_known() && self.rx_current == self.rx_max && self.tx_current == self.tx_max
    }
}

/// Per-interface query and mutation capability.
///
/// All calls are independent; a failure on one interface or one field never
/// implies anything about the others. `set_ring` is the only mutating call.
#[async_trait]
pub trait HardwareQuery: Send + Sync {
    /// Resolve the kernel driver name for an interface
    async fn driver_of(&self, name: &str) -> Result<String>;

    /// Resolve the negotiated link speed in Mbps
    async fn speed_of(&self, name: &str) -> Result<u64>;

    /// Read current and maximum ring buffer depths
    async fn ring_settings_of(&self, name: &str) -> Result<RingSettings>;

    /// Set RX/TX ring depths. Callers must re-query to confirm the
    /// hardware accepted the requested values.
    async fn set_ring(&self, name: &str, rx: u32, tx: u32) -> Result<()>;
}
