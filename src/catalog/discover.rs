//! Interface discovery and classification
//!
//! Walks the sysfs network class tree, keeps physical interfaces at or
//! above the speed threshold, and enriches the survivors through the
//! hardware query port. The sysfs root is injectable so tests can point
//! discovery at a scratch directory.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use super::nic::{LinkType, NicRecord};
use crate::error::{Result, SysfsResultExt, TuneError};
use crate::hardware::HardwareQuery;

/// Loopback device name, always excluded from discovery
const LOOPBACK: &str = "lo";

/// Discovers and classifies host network interfaces
pub struct InterfaceCatalog {
    port: Arc<dyn HardwareQuery>,
    sysfs_root: PathBuf,
}

impl InterfaceCatalog {
    /// Create a catalog reading the host's real sysfs tree
    pub fn new(port: Arc<dyn HardwareQuery>) -> Self {
        Self {
            port,
            sysfs_root: PathBuf::from("/sys"),
        }
    }

    /// Point the catalog at an alternate sysfs root
    pub fn with_sysfs_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.sysfs_root = root.into();
        self
    }

    /// Discover all physical interfaces at or above `min_speed_mbps`.
    ///
    /// Fails only when the interface listing itself cannot be read;
    /// per-interface query failures drop or degrade single records.
    /// Records come back sorted by name.
    pub async fn discover(&self, min_speed_mbps: u64) -> Result<Vec<NicRecord>> {
        let names = self.list_interfaces()?;
        let mut records = Vec::new();

        for name in names {
            if !self.is_physical(&name).await {
                debug!(interface = %name, "skipping non-physical interface");
                continue;
            }

            let speed = match self.speed_of(&name).await {
                Some(speed) => speed,
                None => {
                    debug!(interface = %name, "skipping interface with undeterminable speed");
                    continue;
                }
            };

            if speed < min_speed_mbps {
                debug!(
                    interface = %name,
                    speed_mbps = speed,
                    min_speed_mbps,
                    "skipping interface below speed threshold"
                );
                continue;
            }

            records.push(self.enrich(name, speed).await);
        }

        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    /// List interface names under `class/net`, excluding loopback
    fn list_interfaces(&self) -> Result<Vec<String>> {
        let dir = self.sysfs_root.join("class/net");
        let entries = std::fs::read_dir(&dir).map_err(|e| TuneError::enumeration(&dir, e))?;

        let mut names = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            if name != LOOPBACK {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Physical-vs-virtual classification, three tiers: an explicit virtual
    /// marker wins, then an explicit device link, then whether the hardware
    /// port can resolve a driver at all.
    async fn is_physical(&self, name: &str) -> bool {
        if self.sysfs_root.join("devices/virtual/net").join(name).exists() {
            return false;
        }
        if self.attr_path(name, "device").exists() {
            return true;
        }
        self.port.driver_of(name).await.is_ok()
    }

    /// Link speed with sysfs fallback. The hardware port is asked first;
    /// on failure or a zero answer the sysfs `speed` attribute is read,
    /// where link-down interfaces report -1.
    async fn speed_of(&self, name: &str) -> Option<u64> {
        match self.port.speed_of(name).await {
            Ok(speed) if speed > 0 => return Some(speed),
            Ok(_) => {}
            Err(e) => {
                debug!(interface = %name, error = %e, "hardware speed query failed, trying sysfs");
            }
        }

        match self.read_attr(name, "speed") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|speed| *speed > 0)
                .map(|speed| speed as u64),
            Err(_) => None,
        }
    }

    /// Link type from the sysfs ARP hardware type attribute
    fn link_type_of(&self, name: &str) -> LinkType {
        match self.read_attr(name, "type") {
            Ok(raw) => raw
                .parse::<u32>()
                .map(LinkType::from_arp_type)
                .unwrap_or(LinkType::Unknown),
            Err(_) => LinkType::Unknown,
        }
    }

    /// Build the full record for a qualifying interface. Individual
    /// enrichment failures leave the affected field at its zero value.
    async fn enrich(&self, name: String, speed_mbps: u64) -> NicRecord {
        let mut record = NicRecord::new(name);
        record.speed_mbps = speed_mbps;
        record.link_type = self.link_type_of(&record.name);

        match self.read_attr(&record.name, "address") {
            Ok(mac) => record.mac_address = mac,
            Err(e) => warn!(interface = %record.name, error = %e, "cannot read MAC address"),
        }

        match self.port.driver_of(&record.name).await {
            Ok(driver) => record.driver = driver,
            Err(e) => warn!(interface = %record.name, error = %e, "cannot resolve driver"),
        }

        match self.port.ring_settings_of(&record.name).await {
            Ok(ring) => {
                record.ring = ring;
                record.recompute_optimal();
            }
            Err(e) => warn!(interface = %record.name, error = %e, "cannot read ring settings"),
        }

        record
    }

    fn attr_path(&self, name: &str, attr: &str) -> PathBuf {
        self.sysfs_root.join("class/net").join(name).join(attr)
    }

    fn read_attr(&self, name: &str, attr: &str) -> Result<String> {
        let path = self.attr_path(name, attr);
        let content = std::fs::read_to_string(&path).with_path(&path)?;
        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::RingSettings;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Scripted hardware port; answers come from fixed tables
    #[derive(Default)]
    struct ScriptedPort {
        drivers: HashMap<String, String>,
        speeds: HashMap<String, u64>,
        rings: HashMap<String, RingSettings>,
    }

    #[async_trait]
    impl HardwareQuery for ScriptedPort {
        async fn driver_of(&self, name: &str) -> Result<String> {
            self.drivers
                .get(name)
                .cloned()
                .ok_or_else(|| TuneError::tool(name, "no driver info"))
        }

        async fn speed_of(&self, name: &str) -> Result<u64> {
            self.speeds
                .get(name)
                .copied()
                .ok_or_else(|| TuneError::tool(name, "no speed info"))
        }

        async fn ring_settings_of(&self, name: &str) -> Result<RingSettings> {
            self.rings
                .get(name)
                .copied()
                .ok_or_else(|| TuneError::tool(name, "no ring info"))
        }

        async fn set_ring(&self, name: &str, _rx: u32, _tx: u32) -> Result<()> {
            panic!("discovery must never mutate hardware (interface {})", name);
        }
    }

    fn add_iface(root: &Path, name: &str, arp_type: u32, mac: &str) {
        let dir = root.join("class/net").join(name);
        fs::create_dir_all(dir.join("device")).unwrap();
        fs::write(dir.join("type"), format!("{}\n", arp_type)).unwrap();
        fs::write(dir.join("address"), format!("{}\n", mac)).unwrap();
    }

    fn add_virtual_iface(root: &Path, name: &str) {
        fs::create_dir_all(root.join("class/net").join(name)).unwrap();
        fs::create_dir_all(root.join("devices/virtual/net").join(name)).unwrap();
    }

    fn catalog(root: &Path, port: ScriptedPort) -> InterfaceCatalog {
        InterfaceCatalog::new(Arc::new(port)).with_sysfs_root(root)
    }

    #[tokio::test]
    async fn test_discover_filters_and_classifies() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        add_iface(root, "eth0", 1, "aa:bb:cc:dd:ee:00");
        add_iface(root, "eth1", 1, "aa:bb:cc:dd:ee:01");
        add_iface(root, "ib0", 32, "80:00:02:08:fe:80");
        add_iface(root, "lo", 772, "00:00:00:00:00:00");
        add_virtual_iface(root, "veth0");

        let mut port = ScriptedPort::default();
        port.speeds.insert("eth0".into(), 200_000);
        port.speeds.insert("eth1".into(), 100_000);
        port.speeds.insert("ib0".into(), 400_000);
        port.drivers.insert("eth0".into(), "mlx5_core".into());
        port.drivers.insert("eth1".into(), "e1000e".into());
        port.drivers.insert("ib0".into(), "mlx5_core".into());
        port.rings.insert(
            "eth0".into(),
            RingSettings {
                rx_current: 512,
                tx_current: 512,
                rx_max: 4096,
                tx_max: 4096,
            },
        );

        let records = catalog(root, port).discover(200_000).await.unwrap();

        // eth1 is below the threshold, lo and veth0 are not physical
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["eth0", "ib0"]);

        let eth0 = &records[0];
        assert_eq!(eth0.link_type, LinkType::Ethernet);
        assert_eq!(eth0.speed_mbps, 200_000);
        assert_eq!(eth0.driver, "mlx5_core");
        assert_eq!(eth0.mac_address, "aa:bb:cc:dd:ee:00");
        assert_eq!(eth0.ring.rx_current, 512);
        assert_eq!(eth0.ring.rx_max, 4096);
        assert!(eth0.is_physical);
        assert!(!eth0.is_optimal);

        let ib0 = &records[1];
        assert_eq!(ib0.link_type, LinkType::Infiniband);
        // Ring query failed for ib0; the record is kept with zero values
        assert_eq!(ib0.ring, RingSettings::default());
        assert!(!ib0.is_optimal);
    }

    #[tokio::test]
    async fn test_discover_marks_maxed_rings_optimal() {
        let tmp = TempDir::new().unwrap();
        add_iface(tmp.path(), "eth0", 1, "aa:bb:cc:dd:ee:00");

        let mut port = ScriptedPort::default();
        port.speeds.insert("eth0".into(), 400_000);
        port.drivers.insert("eth0".into(), "mlx5_core".into());
        port.rings.insert(
            "eth0".into(),
            RingSettings {
                rx_current: 8192,
                tx_current: 8192,
                rx_max: 8192,
                tx_max: 8192,
            },
        );

        let records = catalog(tmp.path(), port).discover(200_000).await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_optimal);
    }

    #[tokio::test]
    async fn test_discover_sysfs_speed_fallback() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        // eth2 has no hardware speed answer but a sysfs speed attribute
        add_iface(root, "eth2", 1, "aa:bb:cc:dd:ee:02");
        fs::write(root.join("class/net/eth2/speed"), "200000\n").unwrap();

        // eth3 is link-down: sysfs reports -1 and the port has no answer
        add_iface(root, "eth3", 1, "aa:bb:cc:dd:ee:03");
        fs::write(root.join("class/net/eth3/speed"), "-1\n").unwrap();

        // eth4 has no speed source at all
        add_iface(root, "eth4", 1, "aa:bb:cc:dd:ee:04");

        let mut port = ScriptedPort::default();
        port.drivers.insert("eth2".into(), "mlx5_core".into());
        port.drivers.insert("eth3".into(), "mlx5_core".into());
        port.drivers.insert("eth4".into(), "mlx5_core".into());

        let records = catalog(root, port).discover(200_000).await.unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["eth2"]);
        assert_eq!(records[0].speed_mbps, 200_000);
    }

    #[tokio::test]
    async fn test_discover_driver_probe_classifies_physical() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        // Neither interface has a device link or a virtual marker; only
        // the driver probe can classify them
        for name in ["ens8", "ens9"] {
            let dir = root.join("class/net").join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("type"), "1\n").unwrap();
            fs::write(dir.join("address"), "aa:bb:cc:dd:ee:08\n").unwrap();
        }

        let mut port = ScriptedPort::default();
        port.drivers.insert("ens8".into(), "mlx5_core".into());
        port.speeds.insert("ens8".into(), 200_000);
        port.speeds.insert("ens9".into(), 200_000);

        let records = catalog(root, port).discover(200_000).await.unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ens8"]);
    }

    #[tokio::test]
    async fn test_discover_keeps_records_with_enrichment_gaps() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        // Physical with a known speed, but no MAC attribute, no driver
        // answer, and no ring answer
        let dir = root.join("class/net/eth5");
        fs::create_dir_all(dir.join("device")).unwrap();
        fs::write(dir.join("type"), "1\n").unwrap();

        let mut port = ScriptedPort::default();
        port.speeds.insert("eth5".into(), 200_000);

        let records = catalog(root, port).discover(200_000).await.unwrap();
        assert_eq!(records.len(), 1);

        let eth5 = &records[0];
        assert_eq!(eth5.driver, "");
        assert_eq!(eth5.mac_address, "");
        assert_eq!(eth5.ring, RingSettings::default());
        assert!(!eth5.is_optimal);
    }

    #[tokio::test]
    async fn test_discover_enumeration_failure() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");

        let err = catalog(&missing, ScriptedPort::default())
            .discover(200_000)
            .await
            .unwrap_err();
        assert!(matches!(err, TuneError::Enumeration { .. }));
    }
}
