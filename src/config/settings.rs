//! Configuration settings for NicTune
//!
//! Defines all configuration options, CLI arguments, and defaults
//! for discovery, optimization, and monitoring.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// NicTune - High-speed NIC ring buffer tuning utility for HPC environments
#[derive(Parser, Debug, Clone)]
#[command(name = "nictune")]
#[command(author = "NicTune Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query and optimize ring buffers of high-speed NICs")]
#[command(long_about = r#"
NicTune inspects and tunes the ring buffers of high-speed network
interfaces on HPC nodes.

Features:
  - Automatic discovery of physical high-speed interfaces
  - Ethernet/Infiniband link classification
  - Ring buffers raised to hardware maxima via ethtool
  - Verified writes (settings re-read after every change)
  - Parallel optimization with a bounded worker pool
  - Continuous monitor mode for drift detection

Examples:
  nictune                            # Show current settings (query)
  nictune --workers 8 set            # Optimize with 8 parallel workers
  nictune --min-speed 100000 set     # Include 100G interfaces
  nictune monitor --interval 60      # Re-check every minute
  nictune --output-format json set   # Machine-readable report
"#)]
pub struct CliArgs {
    /// Minimum NIC speed in Mbps to consider
    #[arg(long, default_value = "200000", value_name = "MBPS")]
    pub min_speed: u64,

    /// Maximum number of parallel workers (0 = auto-detect)
    #[arg(short = 'w', long, default_value = "5", value_name = "NUM")]
    pub workers: usize,

    /// Output format for reports
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Log file path (stderr when not set)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Query current ring buffer settings (default)
    #[command(name = "query")]
    Query,

    /// Raise ring buffers of eligible NICs to their hardware maxima
    #[command(name = "set")]
    Set,

    /// Re-check and re-apply ring buffer settings continuously
    #[command(name = "monitor")]
    Monitor {
        /// Monitor interval in seconds
        #[arg(short = 'i', long, default_value = "300", value_name = "SECS")]
        interval: u64,
    },
}

/// Output format for reports
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Text,
    /// JSON format
    Json,
}

/// What the process does after startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Read-only pass over all high-speed NICs
    #[default]
    Query,
    /// One optimization pass
    Set,
    /// Periodic optimization passes until interrupted
    Monitor,
}

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuneConfig {
    /// Selected mode
    pub mode: RunMode,
    /// Speed threshold in Mbps
    pub min_speed_mbps: u64,
    /// Worker bound for the optimization engine
    pub max_workers: usize,
    /// Monitor interval in seconds
    pub interval_secs: u64,
    /// Report rendering format
    pub output_format: OutputFormat,
    /// Log file path
    pub log_file: Option<PathBuf>,
}

impl Default for TuneConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::Query,
            min_speed_mbps: 200_000, // 200G
            max_workers: 5,
            interval_secs: 300,
            output_format: OutputFormat::Text,
            log_file: None,
        }
    }
}

impl TuneConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        if args.min_speed == 0 {
            return Err("Minimum speed must be greater than zero".to_string());
        }

        let mode = match &args.command {
            None | Some(Commands::Query) => RunMode::Query,
            Some(Commands::Set) => RunMode::Set,
            Some(Commands::Monitor { .. }) => RunMode::Monitor,
        };

        let interval_secs = match &args.command {
            Some(Commands::Monitor { interval }) => {
                if *interval == 0 {
                    return Err("Monitor interval must be greater than zero".to_string());
                }
                *interval
            }
            _ => 300,
        };

        let max_workers = if args.workers == 0 {
            num_cpus::get()
        } else {
            args.workers
        };

        Ok(Self {
            mode,
            min_speed_mbps: args.min_speed,
            max_workers,
            interval_secs,
            output_format: args.output_format,
            log_file: args.log_file.clone(),
        })
    }

    /// Monitor interval as a duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
