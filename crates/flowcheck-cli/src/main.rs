//! flowcheck - Flow status checks from the command line
//!
//! ## Commands
//!
//! - `check`: Run `flow status` once and print the build report
//! - `watch`: Re-run the check whenever the project tree changes
//! - `preset`: Print the Flow preset configuration, with overrides merged in
//! - `status-codes`: List the Flow exit statuses and their categories

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use flowcheck::{
    preset, BuildCycle, BuildReport, FlowOptions, FlowStatus, ProcessRunner, StatusChecker,
    TreeWatcher, Trigger,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(name = "flowcheck")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Flow status checks for JavaScript builds", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Flow status check once
    Check {
        #[command(flatten)]
        check: CheckArgs,
    },

    /// Run the check, then again on every change under the project root
    Watch {
        #[command(flatten)]
        check: CheckArgs,

        /// Polling interval in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },

    /// Print the Flow preset configuration as JSON
    Preset {
        /// JSON file deep-merged over the preset
        #[arg(short, long)]
        overrides: Option<PathBuf>,
    },

    /// List Flow exit statuses and their categories
    StatusCodes,
}

#[derive(Args, Debug, Clone)]
struct CheckArgs {
    /// Options file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report Flow failures as warnings instead of errors
    #[arg(long)]
    warn: bool,

    /// Flow executable
    #[arg(long, env = "FLOW_BIN")]
    bin: Option<PathBuf>,

    /// Flag passed to Flow (repeatable; replaces the configured flags)
    #[arg(long = "flag", allow_hyphen_values = true)]
    flags: Vec<String>,

    /// Project root: Flow runs here and watch mode scans it
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    report_json: bool,
}

impl CheckArgs {
    /// Options file (or defaults) with command-line overrides applied.
    fn options(&self) -> Result<FlowOptions> {
        let mut options = match &self.config {
            Some(path) => FlowOptions::from_file(path)
                .with_context(|| format!("Failed to load options from {}", path.display()))?,
            None => FlowOptions::default(),
        };
        if self.warn {
            options = options.with_warn(true);
        }
        if let Some(bin) = &self.bin {
            options = options.with_bin(bin.clone());
        }
        if !self.flags.is_empty() {
            options = options.with_flags(self.flags.clone());
        }
        Ok(options)
    }

    fn build_cycle(&self) -> Result<BuildCycle<ProcessRunner>> {
        let options = self.options()?;
        let runner = ProcessRunner::new(options.bin.clone()).in_dir(&self.dir);
        let checker =
            StatusChecker::new(options, runner).context("Failed to configure status checker")?;
        Ok(BuildCycle::new(checker))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    flowcheck::init_tracing(cli.json, level);

    match cli.command {
        Commands::Check { check } => cmd_check(&check).await,
        Commands::Watch { check, interval_ms } => cmd_watch(&check, interval_ms).await,
        Commands::Preset { overrides } => cmd_preset(overrides.as_deref()),
        Commands::StatusCodes => cmd_status_codes(),
    }
}

/// Run one cycle on the blocking pool; the Flow invocation blocks until exit.
async fn run_cycle(
    cycle: Arc<BuildCycle<ProcessRunner>>,
    trigger: Trigger,
) -> Result<BuildReport> {
    let report = tokio::task::spawn_blocking(move || cycle.run_check_only(trigger))
        .await
        .context("Status check task failed")?
        .context("Flow status check could not run")?;
    Ok(report)
}

fn print_report(report: &BuildReport, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for warning in &report.warnings {
        println!("WARNING in flow\n{}", warning);
    }
    for error in &report.errors {
        println!("ERROR in flow\n{}", error);
    }

    let status = if report.has_errors() {
        "✗ FAILED"
    } else if report.is_clean() {
        "✓ PASSED"
    } else {
        "! PASSED WITH WARNINGS"
    };
    println!(
        "Flow ({}): {} [{} warning(s), {} error(s)]",
        report.trigger.as_str(),
        status,
        report.warnings.len(),
        report.errors.len()
    );
    Ok(())
}

async fn cmd_check(args: &CheckArgs) -> Result<()> {
    let cycle = Arc::new(args.build_cycle()?);
    let report = run_cycle(cycle, Trigger::Run).await?;
    print_report(&report, args.report_json)?;

    if report.has_errors() {
        anyhow::bail!("Flow reported {} error(s)", report.errors.len())
    }
    Ok(())
}

async fn cmd_watch(args: &CheckArgs, interval_ms: u64) -> Result<()> {
    let cycle = Arc::new(args.build_cycle()?);
    let mut watcher = TreeWatcher::new(args.dir.clone());
    watcher
        .prime()
        .with_context(|| format!("Failed to scan {}", args.dir.display()))?;

    info!(root = %args.dir.display(), interval_ms, "Watching for changes");
    let report = run_cycle(cycle.clone(), Trigger::Run).await?;
    print_report(&report, args.report_json)?;

    let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut ctrl_c => {
                info!("Stopping watch");
                return Ok(());
            }
        }

        match watcher.poll() {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                warn!(error = %e, "Scan failed; retrying on next tick");
                continue;
            }
        }

        tokio::select! {
            report = run_cycle(cycle.clone(), Trigger::WatchRun) => {
                print_report(&report?, args.report_json)?;
            }
            _ = &mut ctrl_c => {
                info!("Stopping watch");
                return Ok(());
            }
        }
    }
}

fn cmd_preset(overrides: Option<&Path>) -> Result<()> {
    let merged = match overrides {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let value: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?;
            preset::flow_preset_with(value)
        }
        None => preset::flow_preset(),
    };
    println!("{}", serde_json::to_string_pretty(&merged)?);
    Ok(())
}

fn cmd_status_codes() -> Result<()> {
    println!("  0  Clean");
    for status in FlowStatus::ALL {
        println!("{:>3}  {}", status.code(), status.label());
    }
    Ok(())
}
