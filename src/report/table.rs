//! Fixed-width table rendering
//!
//! Renders optimization outcomes as the operator-facing table: one row per
//! interface, a summary line, and a note when Infiniband links were skipped.

use std::fmt::Write;

use crate::catalog::{LinkType, NicRecord};
use crate::engine::OptimizationOutcome;

use super::ReportSummary;

const TABLE_WIDTH: usize = 110;

/// Which banner the rendered table carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Read-only listing of every high-speed interface
    Query,
    /// Listing after an optimization pass
    Set,
    /// Periodic listing from the monitor loop
    Monitor,
}

impl ReportMode {
    fn banner(&self, min_speed_mbps: u64) -> String {
        match self {
            ReportMode::Query => format!(
                "=== Configuration Results for All High-Speed NICs (≥{}Mbps) ===",
                min_speed_mbps
            ),
            ReportMode::Set => format!(
                "=== Configuration Results for High-Speed NICs (≥{}Mbps) ===",
                min_speed_mbps
            ),
            ReportMode::Monitor => format!(
                "=== Current Configuration of High-Speed NICs (≥{}Mbps) ===",
                min_speed_mbps
            ),
        }
    }
}

fn status_of(record: &NicRecord) -> &'static str {
    match record.link_type {
        LinkType::Infiniband | LinkType::Unknown => "SKIPPED",
        LinkType::Ethernet => {
            if record.is_optimal {
                "OPTIMIZED"
            } else {
                "SUB-OPTIMAL"
            }
        }
    }
}

fn ring_cell(record: &NicRecord) -> String {
    match record.link_type {
        LinkType::Infiniband => "N/A".to_string(),
        _ => format!("{}/{}", record.ring.rx_current, record.ring.tx_current),
    }
}

/// Render outcomes as a fixed-width table, ready to print
pub fn render_table(
    outcomes: &[OptimizationOutcome],
    mode: ReportMode,
    min_speed_mbps: u64,
) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&mode.banner(min_speed_mbps));
    out.push('\n');

    let _ = writeln!(
        out,
        "{:<15} {:<12} {:<10} {:<15} {:<20} {:<25} {:<15}",
        "Interface",
        "Speed(Mbps)",
        "Type",
        "Driver",
        "MAC Address",
        "Ring Buffer(RX/TX)",
        "Status"
    );
    out.push_str(&"-".repeat(TABLE_WIDTH));
    out.push('\n');

    for outcome in outcomes {
        let record = &outcome.record;
        let _ = writeln!(
            out,
            "{:<15} {:<12} {:<10} {:<15} {:<20} {:<25} {:<15}",
            record.name,
            record.speed_mbps,
            record.link_type.as_str(),
            record.driver,
            record.mac_address,
            ring_cell(record),
            status_of(record)
        );
    }

    if outcomes.is_empty() {
        out.push_str("No high-speed NICs found.\n");
    } else {
        out.push_str(&"-".repeat(TABLE_WIDTH));
        out.push('\n');
        let summary = ReportSummary::from_outcomes(outcomes);
        let _ = writeln!(
            out,
            "SUMMARY: Total: {} NICs | Ethernet: {} | Infiniband: {} | Optimized: {}",
            summary.total, summary.ethernet, summary.infiniband, summary.optimized
        );
        if summary.infiniband > 0 {
            out.push_str(
                "NOTE: Infiniband interfaces are skipped as ring buffer optimization is not applicable\n",
            );
        }
    }

    out
}
