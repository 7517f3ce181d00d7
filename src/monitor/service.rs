//! Periodic re-check service
//!
//! Re-runs discovery and optimization on a fixed interval until shutdown
//! is requested. A failed pass is logged and retried on the next interval;
//! it never terminates the loop.

use std::time::Duration;

use humantime::format_duration;
use tokio::sync::watch;
use tracing::{error, info};

use crate::catalog::InterfaceCatalog;
use crate::config::{OutputFormat, TuneConfig};
use crate::engine::OptimizationEngine;
use crate::report::{render_json, render_table, ReportMode};

/// Periodically re-checks and re-applies ring buffer settings
pub struct MonitorService {
    catalog: InterfaceCatalog,
    engine: OptimizationEngine,
    min_speed_mbps: u64,
    max_workers: usize,
    interval: Duration,
    format: OutputFormat,
}

impl MonitorService {
    /// Create a monitor service over the given catalog and engine
    pub fn new(catalog: InterfaceCatalog, engine: OptimizationEngine, config: &TuneConfig) -> Self {
        Self {
            catalog,
            engine,
            min_speed_mbps: config.min_speed_mbps,
            max_workers: config.max_workers,
            interval: config.interval(),
            format: config.output_format,
        }
    }

    /// Override the re-check interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run until `shutdown` turns true or its sender goes away.
    ///
    /// The first pass runs immediately; each later pass starts one full
    /// interval after the previous one finished. Missed passes are not
    /// made up.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval = %format_duration(self.interval),
            min_speed_mbps = self.min_speed_mbps,
            "starting monitor loop"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            self.tick().await;

            if self.sleep_or_shutdown(&mut shutdown).await {
                break;
            }
        }

        info!("monitor loop stopped");
    }

    /// Wait out one interval; returns true when shutdown was requested
    async fn sleep_or_shutdown(&self, shutdown: &mut watch::Receiver<bool>) -> bool {
        let sleep = tokio::time::sleep(self.interval);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => return false,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        return true;
                    }
                }
            }
        }
    }

    async fn tick(&self) {
        info!("checking ring buffer settings");

        let records = match self.catalog.discover(self.min_speed_mbps).await {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "discovery failed, retrying next interval");
                return;
            }
        };

        let outcomes = self.engine.optimize_all(records, self.max_workers).await;

        match self.format {
            OutputFormat::Text => {
                print!(
                    "{}",
                    render_table(&outcomes, ReportMode::Monitor, self.min_speed_mbps)
                );
            }
            OutputFormat::Json => match render_json(&outcomes, self.min_speed_mbps) {
                Ok(doc) => println!("{}", doc),
                Err(e) => error!(error = %e, "failed to render report"),
            },
        }
    }
}
