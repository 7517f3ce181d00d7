//! NIC record model
//!
//! The per-interface data carried from discovery through optimization
//! and into reports. Records are rebuilt from scratch on every pass;
//! nothing here survives across passes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hardware::RingSettings;

/// ARP hardware type for Ethernet in the sysfs `type` attribute
const ARPHRD_ETHER: u32 = 1;
/// ARP hardware type for Infiniband in the sysfs `type` attribute
const ARPHRD_INFINIBAND: u32 = 32;

/// Link type classification, derived from hardware metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkType {
    /// Ethernet link; the only type eligible for ring mutation
    Ethernet,
    /// Infiniband link; ring configuration is not applicable
    Infiniband,
    /// Anything else the kernel reports
    Unknown,
}

impl LinkType {
    /// Map a sysfs ARP hardware type value to a link type
    pub fn from_arp_type(value: u32) -> Self {
        match value {
            ARPHRD_ETHER => LinkType::Ethernet,
            ARPHRD_INFINIBAND => LinkType::Infiniband,
            _ => LinkType::Unknown,
        }
    }

    /// Human-readable name as shown in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Ethernet => "Ethernet",
            LinkType::Infiniband => "Infiniband",
            LinkType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discovered high-speed physical interface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NicRecord {
    /// Interface name, unique within a discovery pass
    pub name: String,
    /// Link type from the sysfs ARP hardware type
    pub link_type: LinkType,
    /// Negotiated link speed in Mbps
    pub speed_mbps: u64,
    /// Kernel driver name, empty if undeterminable
    pub driver: String,
    /// MAC address, empty if undeterminable
    pub mac_address: String,
    /// Ring buffer state; all zeros when the ring query failed
    pub ring: RingSettings,
    /// Always true for catalog records; virtual interfaces never get this far
    pub is_physical: bool,
    /// Ring depth equals the hardware ceiling on both axes
    pub is_optimal: bool,
}

impl NicRecord {
    /// Create a record with everything except the name at its zero value
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link_type: LinkType::Unknown,
            speed_mbps: 0,
            driver: String::new(),
            mac_address: String::new(),
            ring: RingSettings::default(),
            is_physical: true,
            is_optimal: false,
        }
    }

    /// Re-derive `is_optimal` from the current ring state. Must be called
    /// after every ring update so the flag is never stale.
    pub fn recompute_optimal(&mut self) {
        self.is_optimal = self.ring.is_maxed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_arp_type() {
        assert_eq!(LinkType::from_arp_type(1), LinkType::Ethernet);
        assert_eq!(LinkType::from_arp_type(32), LinkType::Infiniband);
        assert_eq!(LinkType::from_arp_type(772), LinkType::Unknown);
        assert_eq!(LinkType::from_arp_type(0), LinkType::Unknown);
    }

    #[test]
    fn test_link_type_display() {
        assert_eq!(LinkType::Ethernet.to_string(), "Ethernet");
        assert_eq!(LinkType::Infiniband.to_string(), "Infiniband");
        assert_eq!(LinkType::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_recompute_optimal() {
        let mut record = NicRecord::new("eth0");
        record.ring = RingSettings {
            rx_current: 4096,
            tx_current: 4096,
            rx_max: 4096,
            tx_max: 4096,
        };
        record.recompute_optimal();
        assert!(record.is_optimal);

        record.ring.rx_current = 512;
        record.recompute_optimal();
        assert!(!record.is_optimal);

        // Unknown maxima never count as optimal
        record.ring = RingSettings::default();
        record.recompute_optimal();
        assert!(!record.is_optimal);
    }
}
