#![forbid(unsafe_code)]

//! Command-line entry points: `ringbench run` and `ringbench list`.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::config::{LogFormat, RingbenchConfig, SinkKind};
use crate::driver::{SuiteSink, run_suite};
use crate::error::Result;
use crate::logging;
use crate::suite::build_registry;

#[derive(Debug, Parser)]
#[command(
    name = "ringbench",
    about = "Cooperative test controller driving the circular queue suite",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the suite to completion.
    Run(RunArgs),

    /// Print the registry in execution order.
    List(ListArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write a report here (JSON if the extension is `.json`, text otherwise).
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Emit diagnostics as JSON lines.
    #[arg(long)]
    pub json: bool,

    /// Override `driver.max_ticks`.
    #[arg(long = "max-ticks")]
    pub max_ticks: Option<u64>,

    /// Send progress and verdicts through tracing instead of stdout.
    #[arg(long = "tracing-sink")]
    pub tracing_sink: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run_command(args),
        Commands::List(args) => list_command(&args),
    }
}

fn load_config(path: Option<&Path>) -> Result<RingbenchConfig> {
    let config = match path {
        Some(path) => RingbenchConfig::from_toml_file(path)?,
        None => RingbenchConfig::default(),
    };
    Ok(config)
}

/// Configuration after applying command-line overrides.
pub fn resolve_config(args: &RunArgs) -> Result<RingbenchConfig> {
    let mut config = load_config(args.config.as_deref())?;
    if args.json {
        config.log.format = LogFormat::Json;
    }
    if args.tracing_sink {
        config.log.sink = SinkKind::Tracing;
    }
    if let Some(max_ticks) = args.max_ticks {
        config.driver.max_ticks = max_ticks;
    }
    config.validated()
}

fn run_command(args: RunArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    logging::init(&config.log)?;

    let (report, mut sink) = run_suite(&config, SuiteSink::from_kind(config.log.sink))?;
    sink.finish()?;

    if let Some(path) = &args.report {
        write_report(path, &report)?;
        tracing::info!(path = %path.display(), "report written");
    }
    for failure in report.failures() {
        tracing::warn!(position = failure.position, case = %failure.name, "case failed");
    }
    Ok(())
}

/// Write `report` as JSON or text depending on the file extension.
pub fn write_report(path: &Path, report: &ringbench_harness::RunReport) -> Result<()> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let body = if is_json {
        report.to_json()?
    } else {
        report.render_text()
    };
    std::fs::write(path, body)?;
    Ok(())
}

fn list_command(args: &ListArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?.validated()?;
    let registry = build_registry(&config.suite);
    for (index, name) in registry.names().enumerate() {
        println!("{:>3}  {name}", index + 1);
    }
    Ok(())
}
