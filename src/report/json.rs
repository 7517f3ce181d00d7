//! Machine-readable report rendering

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{LinkType, NicRecord};
use crate::engine::OptimizationOutcome;
use crate::error::Result;

/// Aggregate counters over one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Every interface that cleared the speed threshold
    pub total: usize,
    /// Ethernet links
    pub ethernet: usize,
    /// Infiniband links
    pub infiniband: usize,
    /// Ethernet links whose ring buffers sit at hardware maxima
    pub optimized: usize,
    /// Interfaces mutated and verified during this pass
    pub changed: usize,
    /// Interfaces whose optimization attempt failed
    pub failed: usize,
}

impl ReportSummary {
    /// Tally outcomes into summary counters
    pub fn from_outcomes(outcomes: &[OptimizationOutcome]) -> Self {
        let mut summary = Self {
            total: outcomes.len(),
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome.record.link_type {
                LinkType::Ethernet => {
                    summary.ethernet += 1;
                    if outcome.record.is_optimal {
                        summary.optimized += 1;
                    }
                }
                LinkType::Infiniband => summary.infiniband += 1,
                LinkType::Unknown => {}
            }
            if outcome.changed {
                summary.changed += 1;
            }
            if outcome.is_failure() {
                summary.failed += 1;
            }
        }
        summary
    }
}

/// One interface in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NicReportEntry {
    /// Interface state as observed after the pass
    #[serde(flatten)]
    pub nic: NicRecord,
    /// Whether this pass mutated and verified the interface
    pub changed: bool,
    /// Failure text when the optimization attempt failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

/// Full report document for one pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuneReport {
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
    /// Host the pass ran on
    pub host: String,
    /// Speed threshold the catalog filtered by
    pub min_speed_mbps: u64,
    /// Per-interface results, sorted by name
    pub nics: Vec<NicReportEntry>,
    /// Aggregate counters
    pub summary: ReportSummary,
}

impl TuneReport {
    /// Build a report document from one pass's outcomes
    pub fn new(outcomes: &[OptimizationOutcome], min_speed_mbps: u64) -> Self {
        let host = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_default();
        let nics = outcomes
            .iter()
            .map(|outcome| NicReportEntry {
                nic: outcome.record.clone(),
                changed: outcome.changed,
                failure: outcome.failure.as_ref().map(|f| f.to_string()),
            })
            .collect();
        Self {
            generated_at: Utc::now(),
            host,
            min_speed_mbps,
            nics,
            summary: ReportSummary::from_outcomes(outcomes),
        }
    }
}

/// Render outcomes as a pretty-printed JSON document
pub fn render_json(outcomes: &[OptimizationOutcome], min_speed_mbps: u64) -> Result<String> {
    let report = TuneReport::new(outcomes, min_speed_mbps);
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TuneError;
    use crate::hardware::RingSettings;
    use serde_json::Value;

    fn outcomes() -> Vec<OptimizationOutcome> {
        let mut eth0 = NicRecord::new("eth0");
        eth0.link_type = LinkType::Ethernet;
        eth0.speed_mbps = 200_000;
        eth0.driver = "mlx5_core".to_string();
        eth0.mac_address = "aa:bb:cc:dd:ee:ff".to_string();
        eth0.ring = RingSettings {
            rx_current: 4096,
            tx_current: 4096,
            rx_max: 4096,
            tx_max: 4096,
        };
        eth0.recompute_optimal();

        let mut eth1 = NicRecord::new("eth1");
        eth1.link_type = LinkType::Ethernet;
        eth1.speed_mbps = 200_000;
        eth1.ring = RingSettings {
            rx_current: 512,
            tx_current: 512,
            rx_max: 4096,
            tx_max: 4096,
        };

        let mut ib0 = NicRecord::new("ib0");
        ib0.link_type = LinkType::Infiniband;
        ib0.speed_mbps = 400_000;

        vec![
            OptimizationOutcome {
                record: eth0,
                changed: true,
                failure: None,
            },
            OptimizationOutcome {
                record: eth1,
                changed: false,
                failure: Some(TuneError::mutation("eth1", "set failed")),
            },
            OptimizationOutcome::unchanged(ib0),
        ]
    }

    #[test]
    fn test_summary_counts() {
        let summary = ReportSummary::from_outcomes(&outcomes());
        assert_eq!(summary.total, 3);
        assert_eq!(summary.ethernet, 2);
        assert_eq!(summary.infiniband, 1);
        assert_eq!(summary.optimized, 1);
        assert_eq!(summary.changed, 1);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_json_document_shape() {
        let rendered = render_json(&outcomes(), 200_000).unwrap();
        let doc: Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(doc["min_speed_mbps"], 200_000);
        assert!(doc["generated_at"].is_string());
        assert!(doc["host"].is_string());

        let nics = doc["nics"].as_array().unwrap();
        assert_eq!(nics.len(), 3);
        assert_eq!(nics[0]["name"], "eth0");
        assert_eq!(nics[0]["link_type"], "Ethernet");
        assert_eq!(nics[0]["ring"]["rx_current"], 4096);
        assert_eq!(nics[0]["changed"], true);
        // Clean outcomes carry no failure key at all
        assert!(nics[0].get("failure").is_none());

        assert_eq!(nics[1]["changed"], false);
        assert!(nics[1]["failure"]
            .as_str()
            .unwrap()
            .contains("set failed"));

        assert_eq!(doc["summary"]["total"], 3);
        assert_eq!(doc["summary"]["optimized"], 1);
    }

    #[test]
    fn test_report_round_trips() {
        let report = TuneReport::new(&outcomes(), 200_000);
        let text = serde_json::to_string(&report).unwrap();
        let back: TuneReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back.nics.len(), 3);
        assert_eq!(back.summary, report.summary);
        assert_eq!(back.nics[0].nic.name, "eth0");
    }
}
