//! ethtool integration
//!
//! Production `HardwareQuery` adapter that shells out to ethtool:
//! `-i` for the driver, the bare invocation for link speed, `-g` for ring
//! buffer state, and `-G` for ring mutation. Output scraping lives in
//! standalone parse functions so it can be tested against captured output
//! without a live NIC.

use std::process::{Command, Stdio};

use async_trait::async_trait;

use super::port::{HardwareQuery, RingSettings};
use crate::error::{Result, TuneError};

/// ethtool availability status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EthtoolStatus {
    /// ethtool is available and working
    Available,
    /// ethtool is not installed
    NotInstalled,
    /// ethtool is installed but `--version` failed
    Failed,
}

/// Detect ethtool availability
pub fn detect_ethtool() -> EthtoolStatus {
    match Command::new("ethtool")
        .arg("--version")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
    {
        Ok(output) => {
            if output.status.success() {
                EthtoolStatus::Available
            } else {
                EthtoolStatus::Failed
            }
        }
        Err(_) => EthtoolStatus::NotInstalled,
    }
}

/// `HardwareQuery` implementation backed by the ethtool binary
#[derive(Debug, Clone, Default)]
pub struct EthtoolPort;

impl EthtoolPort {
    /// Create a new ethtool-backed port
    pub fn new() -> Self {
        Self
    }

    /// Run ethtool with the given arguments, returning stdout on success
    async fn run(&self, interface: &str, args: &[&str]) -> Result<String> {
        let output = tokio::process::Command::new("ethtool")
            .args(args)
            .output()
            .await
            .map_err(|e| TuneError::tool(interface, format!("failed to run ethtool: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TuneError::tool(
                interface,
                format!("ethtool {} exited {}: {}", args[0], output.status, stderr.trim()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl HardwareQuery for EthtoolPort {
    async fn driver_of(&self, name: &str) -> Result<String> {
        let output = self.run(name, &["-i", name]).await?;
        parse_driver_output(&output).ok_or_else(|| {
            TuneError::parse(name, "driver", "no 'driver:' line in ethtool -i output")
        })
    }

    async fn speed_of(&self, name: &str) -> Result<u64> {
        let output = self.run(name, &[name]).await?;
        parse_speed_output(&output).ok_or_else(|| {
            TuneError::parse(name, "link speed", "no numeric 'Speed:' line in ethtool output")
        })
    }

    async fn ring_settings_of(&self, name: &str) -> Result<RingSettings> {
        let output = self.run(name, &["-g", name]).await?;
        parse_ring_output(&output).ok_or_else(|| {
            TuneError::parse(
                name,
                "ring settings",
                "no 'Pre-set maximums:' or 'Current hardware settings:' section in ethtool -g output",
            )
        })
    }

    async fn set_ring(&self, name: &str, rx: u32, tx: u32) -> Result<()> {
        let rx = rx.to_string();
        let tx = tx.to_string();
        self.run(name, &["-G", name, "rx", &rx, "tx", &tx])
            .await
            .map(|_| ())
    }
}

/// Extract the driver name from `ethtool -i` output
pub fn parse_driver_output(output: &str) -> Option<String> {
    for line in output.lines() {
        if let Some(value) = line.strip_prefix("driver:") {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Extract the link speed in Mbps from bare `ethtool <iface>` output.
///
/// Returns the first run of digits on the `Speed:` line, so both
/// `Speed: 200000Mb/s` and `Speed: 200000 Mb/s` parse; `Speed: Unknown!`
/// does not.
pub fn parse_speed_output(output: &str) -> Option<u64> {
    for line in output.lines() {
        if !line.contains("Speed:") {
            continue;
        }
        let digits: String = line
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if let Ok(speed) = digits.parse() {
            return Some(speed);
        }
    }
    None
}

/// Extract ring settings from `ethtool -g` output.
///
/// Scans the `Pre-set maximums:` and `Current hardware settings:` sections
/// for their `RX:`/`TX:` rows, ignoring `RX Mini:`/`RX Jumbo:`. Rows whose
/// value is not a number (`n/a`) yield 0. Returns `None` when neither
/// section header is present.
pub fn parse_ring_output(output: &str) -> Option<RingSettings> {
    let mut ring = RingSettings::default();
    let mut in_max = false;
    let mut in_current = false;
    let mut seen_section = false;

    for line in output.lines() {
        if line.contains("Pre-set maximums:") {
            in_max = true;
            in_current = false;
            seen_section = true;
            continue;
        }
        if line.contains("Current hardware settings:") {
            in_max = false;
            in_current = true;
            seen_section = true;
            continue;
        }

        if line.starts_with("RX:") {
            if in_max {
                ring.rx_max = ring_row_value(line);
            } else if in_current {
                ring.rx_current = ring_row_value(line);
            }
        } else if line.starts_with("TX:") {
            if in_max {
                ring.tx_max = ring_row_value(line);
            } else if in_current {
                ring.tx_current = ring_row_value(line);
            }
        }
    }

    if seen_section {
        Some(ring)
    } else {
        None
    }
}

fn ring_row_value(line: &str) -> u32 {
    line.split_whitespace()
        .nth(1)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
