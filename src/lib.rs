//! # NicTune - High-Speed NIC Ring Buffer Tuning for HPC
//!
//! NicTune discovers the high-speed physical network interfaces of an HPC
//! node, classifies their link type, and raises Ethernet ring buffers to
//! the hardware maxima reported by the driver. Every write is verified by
//! re-reading hardware state, and a monitor mode re-applies settings
//! periodically so driver reloads or firmware resets cannot silently undo
//! the tuning.
//!
//! ## Features
//!
//! - **Automatic Discovery**: Physical NICs found via sysfs, filtered by speed
//! - **Link Classification**: Ethernet is tuned, Infiniband is left to its own stack
//! - **Verified Writes**: Settings re-read after every mutation
//! - **Bounded Parallelism**: Optimization fans out over a fixed worker pool
//! - **Monitor Mode**: Periodic re-checks until interrupted
//! - **Reports**: Fixed-width tables for operators, JSON for tooling
//!
//! ## Quick Start
//!
//! ```no_run
//! use nictune::catalog::InterfaceCatalog;
//! use nictune::engine::OptimizationEngine;
//! use nictune::hardware::{EthtoolPort, HardwareQuery};
//! use std::sync::Arc;
//!
//! # async fn run() -> nictune::Result<()> {
//! let port: Arc<dyn HardwareQuery> = Arc::new(EthtoolPort::new());
//! let catalog = InterfaceCatalog::new(Arc::clone(&port));
//! let engine = OptimizationEngine::new(port);
//!
//! // Find every 200G+ interface and raise its ring buffers
//! let records = catalog.discover(200_000).await?;
//! let outcomes = engine.optimize_all(records, 5).await;
//!
//! for outcome in &outcomes {
//!     println!("{}: changed={}", outcome.record.name, outcome.changed);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Rendering Reports
//!
//! ```no_run
//! use nictune::report::{render_table, ReportMode};
//!
//! # fn show(outcomes: &[nictune::engine::OptimizationOutcome]) {
//! print!("{}", render_table(outcomes, ReportMode::Query, 200_000));
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod hardware;
pub mod monitor;
pub mod report;

// Re-export commonly used types
pub use catalog::{InterfaceCatalog, LinkType, NicRecord};
pub use engine::{OptimizationEngine, OptimizationOutcome};
pub use error::{Result, TuneError};
pub use hardware::{EthtoolPort, HardwareQuery, RingSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use nictune::prelude::*;
    //! ```

    pub use crate::catalog::{InterfaceCatalog, LinkType, NicRecord};
    pub use crate::config::{CliArgs, OutputFormat, RunMode, TuneConfig};
    pub use crate::engine::{OptimizationEngine, OptimizationOutcome};
    pub use crate::error::{Result, TuneError};
    pub use crate::hardware::{EthtoolPort, EthtoolStatus, HardwareQuery, RingSettings};
    pub use crate::monitor::MonitorService;
    pub use crate::report::{render_json, render_table, ReportMode, TuneReport};
}
