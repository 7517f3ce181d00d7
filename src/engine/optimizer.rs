//! Ring buffer optimization engine
//!
//! Decides per-record whether a mutation is warranted, applies mutations
//! through the hardware port with bounded parallelism, and verifies every
//! write by re-reading hardware state. This is the only module allowed to
//! mutate the host.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use crate::catalog::{LinkType, NicRecord};
use crate::error::TuneError;
use crate::hardware::HardwareQuery;

/// Outcome of one optimization attempt
#[derive(Debug)]
pub struct OptimizationOutcome {
    /// The record acted upon, reflecting post-mutation hardware state
    /// when a mutation was attempted
    pub record: NicRecord,
    /// True iff a mutation was issued and verified on both axes
    pub changed: bool,
    /// Failure classification; `None` for benign skips
    pub failure: Option<TuneError>,
}

impl OptimizationOutcome {
    /// Outcome for a record that was not acted upon
    pub fn unchanged(record: NicRecord) -> Self {
        Self {
            record,
            changed: false,
            failure: None,
        }
    }

    fn failed(record: NicRecord, failure: TuneError) -> Self {
        Self {
            record,
            changed: false,
            failure: Some(failure),
        }
    }

    /// This attempt ended in a failure classification
    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

/// Why a record is not dispatched to the mutation path
enum Eligibility {
    /// Dispatch a mutation
    Optimize,
    /// Benign skip, no mutation and no failure
    Skip(&'static str),
    /// Looks eligible but the reported maxima are unusable
    Defect,
}

fn classify(record: &NicRecord) -> Eligibility {
    match record.link_type {
        LinkType::Infiniband => Eligibility::Skip("infiniband link"),
        LinkType::Unknown => Eligibility::Skip("unknown link type"),
        LinkType::Ethernet => {
            if record.is_optimal {
                Eligibility::Skip("already optimal")
            } else if !record.ring.maxima_known() {
                Eligibility::Defect
            } else {
                Eligibility::Optimize
            }
        }
    }
}

/// Applies ring buffer mutations with bounded parallelism
pub struct OptimizationEngine {
    port: Arc<dyn HardwareQuery>,
}

impl OptimizationEngine {
    /// Create an engine driving the given hardware port
    pub fn new(port: Arc<dyn HardwareQuery>) -> Self {
        Self { port }
    }

    /// Optimize every eligible record with at most `max_workers` mutation
    /// round trips in flight at once (`0` is treated as `1`).
    ///
    /// Returns one outcome per input record, sorted by interface name, so
    /// the result is a function of the input set and hardware behavior
    /// rather than of task scheduling.
    pub async fn optimize_all(
        &self,
        records: Vec<NicRecord>,
        max_workers: usize,
    ) -> Vec<OptimizationOutcome> {
        let semaphore = Arc::new(Semaphore::new(max_workers.max(1)));
        let mut outcomes = Vec::with_capacity(records.len());
        let mut handles = Vec::new();
        let mut eligible = 0usize;

        for record in records {
            match classify(&record) {
                Eligibility::Skip(reason) => {
                    debug!(interface = %record.name, reason, "skipping interface");
                    outcomes.push(OptimizationOutcome::unchanged(record));
                }
                Eligibility::Defect => {
                    let failure = TuneError::ConfigDefect {
                        interface: record.name.clone(),
                        rx_max: record.ring.rx_max,
                        tx_max: record.ring.tx_max,
                    };
                    error!(interface = %record.name, error = %failure, "unusable ring maxima");
                    outcomes.push(OptimizationOutcome::failed(record, failure));
                }
                Eligibility::Optimize => {
                    eligible += 1;
                    let port = Arc::clone(&self.port);
                    let semaphore = Arc::clone(&semaphore);
                    // Keep a copy so a lost worker still yields an outcome
                    let fallback = record.clone();
                    let handle = tokio::spawn(async move {
                        match semaphore.acquire().await {
                            Ok(_permit) => apply(port, record).await,
                            Err(_) => {
                                let failure = TuneError::mutation(
                                    &record.name,
                                    "worker slot unavailable",
                                );
                                OptimizationOutcome::failed(record, failure)
                            }
                        }
                    });
                    handles.push((fallback, handle));
                }
            }
        }

        // Join barrier: every dispatched mutation completes before any
        // outcome is returned
        for (fallback, handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    let failure =
                        TuneError::mutation(&fallback.name, format!("worker task failed: {}", e));
                    error!(interface = %fallback.name, error = %failure, "mutation worker lost");
                    outcomes.push(OptimizationOutcome::failed(fallback, failure));
                }
            }
        }

        outcomes.sort_by(|a, b| a.record.name.cmp(&b.record.name));

        let changed = outcomes.iter().filter(|o| o.changed).count();
        info!(changed, eligible, "optimization pass complete");
        outcomes
    }
}

/// One set/verify round trip. The record comes back carrying the observed
/// post-mutation ring state.
async fn apply(port: Arc<dyn HardwareQuery>, mut record: NicRecord) -> OptimizationOutcome {
    let rx = record.ring.rx_max;
    let tx = record.ring.tx_max;
    info!(
        interface = %record.name,
        speed_mbps = record.speed_mbps,
        driver = %record.driver,
        rx,
        tx,
        "raising ring buffers to hardware maxima"
    );

    if let Err(e) = port.set_ring(&record.name, rx, tx).await {
        let failure = TuneError::mutation(&record.name, format!("set failed: {}", e));
        error!(interface = %record.name, error = %failure, "ring update failed");
        return OptimizationOutcome::failed(record, failure);
    }

    // Re-read hardware state; a write the hardware clamped or silently
    // dropped must not be reported as success
    match port.ring_settings_of(&record.name).await {
        Ok(observed) => {
            record.ring = observed;
            record.recompute_optimal();

            if observed.rx_current == rx && observed.tx_current == tx {
                info!(interface = %record.name, rx, tx, "ring buffers raised and verified");
                OptimizationOutcome {
                    record,
                    changed: true,
                    failure: None,
                }
            } else {
                let failure = TuneError::mutation(
                    &record.name,
                    format!(
                        "requested rx={} tx={} but hardware reports rx={} tx={}",
                        rx, tx, observed.rx_current, observed.tx_current
                    ),
                );
                error!(interface = %record.name, error = %failure, "ring update did not converge");
                OptimizationOutcome::failed(record, failure)
            }
        }
        Err(e) => {
            let failure =
                TuneError::mutation(&record.name, format!("verification query failed: {}", e));
            error!(interface = %record.name, error = %failure, "cannot verify ring update");
            OptimizationOutcome::failed(record, failure)
        }
    }
}
