//! # E-Stop Supervisor
//!
//! Offline driver for the E-Stop interlock. The per-tick logic normally runs
//! inside the host's real-time scheduler; this binary checks configuration
//! files and replays scripted input scenarios through the same supervisor.
//!
//! - `check-config` validates a config file and prints the effective timing.
//! - `replay` runs a scenario and prints every output change.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use estop_common::config::{ConfigError, LogLevel};
use estop_common::supervisor::config::SupervisorConfig;
use estop_common::supervisor::fault::FaultSource;
use estop_common::supervisor::signals::SupervisorOutputs;
use estop_supervisor::config::{effective_timing, load_config_or_default};
use estop_supervisor::scenario::{Scenario, ScenarioError};
use estop_supervisor::supervisor::EstopSupervisor;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

/// E-Stop Supervisor: safety interlock replay and config tool
#[derive(Parser, Debug)]
#[command(name = "estop_supervisor")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "E-Stop fault latching and recovery supervisor")]
struct Args {
    /// Path to the supervisor config TOML. Built-in defaults when omitted.
    #[arg(long, short, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs and replay records in JSON format.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the config file and print the effective timing.
    CheckConfig,
    /// Replay a scenario TOML through the supervisor.
    Replay {
        /// Scenario file.
        scenario: PathBuf,
    },
}

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error("failed to encode replay record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One replay line, emitted when outputs change or a source latches.
#[derive(Debug, Serialize)]
struct ReplayRecord {
    tick: u64,
    stop: bool,
    phase: &'static str,
    latched: Vec<&'static str>,
    outputs: SupervisorOutputs,
}

fn main() {
    let args = Args::parse();
    let config = load_config_or_default(args.config.as_deref());
    let log_level = config
        .as_ref()
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, log_level);

    let result = config
        .map_err(RunError::from)
        .and_then(|config| run(&args, &config));
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(args: &Args, config: &SupervisorConfig) -> Result<(), RunError> {
    match &args.command {
        Command::CheckConfig => {
            info!("Config OK: service={}", config.shared.service_name);
            println!("{:#?}", config.timing);
            Ok(())
        }
        Command::Replay { scenario } => replay(args, config, scenario),
    }
}

fn replay(
    args: &Args,
    config: &SupervisorConfig,
    path: &Path,
) -> Result<(), RunError> {
    let scenario = Scenario::load(path)?;
    let timing = effective_timing(config, &scenario)?;
    let mut supervisor = EstopSupervisor::new(timing)?;
    info!(
        "Replaying {} ({} ticks, {} steps)",
        path.display(),
        scenario.ticks,
        scenario.steps.len()
    );

    let mut last: Option<(bool, SupervisorOutputs)> = None;
    let mut encode_error = None;
    scenario.run(&mut supervisor, |tick, _, report| {
        let current = (report.stop, report.outputs);
        if last == Some(current) && report.newly_latched.is_empty() {
            return;
        }
        last = Some(current);

        let record = ReplayRecord {
            tick,
            stop: report.stop,
            phase: report.phase.name(),
            latched: describe_all(report.newly_latched),
            outputs: report.outputs,
        };
        if args.json {
            match serde_json::to_string(&record) {
                Ok(line) => println!("{line}"),
                Err(e) => {
                    encode_error.get_or_insert(e);
                }
            }
        } else {
            println!(
                "{:>7} stop={:<5} enable={:<5} machine_on={:<5} motors={:<5} unhome={:<5} phase={}{}",
                record.tick,
                record.stop,
                record.outputs.enable,
                record.outputs.machine_on,
                record.outputs.motor_enable[0],
                record.outputs.unhome,
                record.phase,
                if record.latched.is_empty() {
                    String::new()
                } else {
                    format!(" latched={}", record.latched.join(","))
                }
            );
        }
    });

    if let Some(e) = encode_error {
        return Err(e.into());
    }

    let snapshot = supervisor.snapshot();
    info!(
        "Replay finished at tick {}: stopped={} latched={:?} journal_dropped={}",
        snapshot.tick,
        snapshot.stopped,
        snapshot.latched,
        supervisor.journal().dropped()
    );
    Ok(())
}

fn describe_all(sources: FaultSource) -> Vec<&'static str> {
    sources.iter().map(|s| s.describe()).collect()
}

/// Setup tracing subscriber from CLI arguments and the configured level.
fn setup_tracing(args: &Args, log_level: LogLevel) {
    let directive: Directive = if args.verbose {
        Level::DEBUG.into()
    } else {
        log_level
            .as_directive()
            .parse()
            .unwrap_or_else(|_| Level::INFO.into())
    };

    let filter = EnvFilter::from_default_env().add_directive(directive);

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}
