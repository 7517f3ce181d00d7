//! NicTune CLI - High-Speed NIC Ring Buffer Tuning
//!
//! Discovers high-speed NICs and raises their ring buffers to hardware
//! maxima, as a one-shot pass or a continuous monitor.

use clap::Parser;
use nictune::catalog::InterfaceCatalog;
use nictune::config::{CliArgs, OutputFormat, RunMode, TuneConfig};
use nictune::engine::{OptimizationEngine, OptimizationOutcome};
use nictune::error::{Result, TuneError};
use nictune::hardware::{detect_ethtool, EthtoolPort, EthtoolStatus, HardwareQuery};
use nictune::monitor::MonitorService;
use nictune::report::{render_json, render_table, ReportMode};
use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging
    init_logging(&args);

    // Handle result
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(args: &CliArgs) {
    let default_directive = if args.quiet {
        "nictune=error"
    } else {
        match args.verbose {
            0 => "nictune=info",
            1 => "nictune=debug",
            _ => "trace",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let log_file = args.log_file.as_ref().and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("Warning: cannot open log file {}: {}", path.display(), e);
                None
            }
        }
    });

    match log_file {
        Some(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::io::stderr.and(Mutex::new(file)))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

fn run(args: CliArgs) -> Result<()> {
    // Build configuration
    let config = TuneConfig::from_cli(&args).map_err(TuneError::config)?;

    info!(
        mode = ?config.mode,
        min_speed_mbps = config.min_speed_mbps,
        workers = config.max_workers,
        "nictune starting"
    );

    // A missing tool degrades a query but makes mutation modes pointless
    if detect_ethtool() != EthtoolStatus::Available {
        if config.mode == RunMode::Query {
            warn!("ethtool unavailable, driver and ring buffer details will be incomplete");
        } else {
            return Err(TuneError::config(
                "ethtool is required for set/monitor modes but is not available",
            ));
        }
    }

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| TuneError::config(format!("failed to create runtime: {}", e)))?;

    let port: Arc<dyn HardwareQuery> = Arc::new(EthtoolPort::new());
    let catalog = InterfaceCatalog::new(Arc::clone(&port));
    let engine = OptimizationEngine::new(Arc::clone(&port));

    match config.mode {
        RunMode::Query => rt.block_on(cmd_query(&catalog, &config)),
        RunMode::Set => rt.block_on(cmd_set(&catalog, &engine, &config)),
        RunMode::Monitor => rt.block_on(cmd_monitor(catalog, engine, &config)),
    }
}

async fn cmd_query(catalog: &InterfaceCatalog, config: &TuneConfig) -> Result<()> {
    let records = catalog.discover(config.min_speed_mbps).await?;
    let outcomes: Vec<OptimizationOutcome> = records
        .into_iter()
        .map(OptimizationOutcome::unchanged)
        .collect();

    emit(&outcomes, ReportMode::Query, config)
}

async fn cmd_set(
    catalog: &InterfaceCatalog,
    engine: &OptimizationEngine,
    config: &TuneConfig,
) -> Result<()> {
    let records = catalog.discover(config.min_speed_mbps).await?;
    let outcomes = engine.optimize_all(records, config.max_workers).await;

    let failed = outcomes.iter().filter(|o| o.is_failure()).count();
    if failed > 0 {
        warn!(failed, "some interfaces could not be optimized");
    }

    emit(&outcomes, ReportMode::Set, config)
}

async fn cmd_monitor(
    catalog: InterfaceCatalog,
    engine: OptimizationEngine,
    config: &TuneConfig,
) -> Result<()> {
    let (tx, rx) = tokio::sync::watch::channel(false);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received shutdown signal, stopping service");
            let _ = tx.send(true);
        }
    });

    let service = MonitorService::new(catalog, engine, config);
    service.run(rx).await;
    Ok(())
}

fn emit(outcomes: &[OptimizationOutcome], mode: ReportMode, config: &TuneConfig) -> Result<()> {
    match config.output_format {
        OutputFormat::Text => {
            print!("{}", render_table(outcomes, mode, config.min_speed_mbps));
        }
        OutputFormat::Json => {
            println!("{}", render_json(outcomes, config.min_speed_mbps)?);
        }
    }
    Ok(())
}
