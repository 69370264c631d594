//! revstatsd — hosts one stats reporter for a revision replica.
//!
//! Reads the workload identity from `--config` or the `SERVING_*`
//! environment, consumes `RequestStatsReport` JSON lines on stdin (one per
//! reporting tick), and writes the final gauge set in Prometheus text
//! format to stdout on exit. Logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! collector | revstatsd --config /etc/revstats/revstats.toml
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{info, warn};

use revstats_core::ReporterConfig;
use revstats_metrics::{PrometheusRegistry, StatsReporter, run_report_loop};

mod shutdown;
mod source;

#[derive(Parser)]
#[command(name = "revstatsd", about = "Per-revision request stats reporter")]
struct Cli {
    /// TOML config file. When omitted the identity is read from the
    /// SERVING_* environment variables.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the reporting period ("1s", "500ms", "2m").
    #[arg(long)]
    reporting_period: Option<String>,

    /// Emit logs as JSON.
    #[arg(long)]
    log_json: bool,

    /// Capacity of the stats channel between stdin and the reporter.
    #[arg(long, default_value = "64")]
    queue_depth: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json)?;

    let mut config = match &cli.config {
        Some(path) => ReporterConfig::from_file(path)?,
        None => ReporterConfig::from_env()?,
    };
    if let Some(period) = cli.reporting_period {
        config.reporting_period = period;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(config, cli.queue_depth));
    // A pending stdin read must not hold up exit after Ctrl-C.
    runtime.shutdown_background();
    result
}

fn init_tracing(json: bool) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info,revstats=debug"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

async fn run(config: ReporterConfig, queue_depth: usize) -> anyhow::Result<()> {
    info!("revstatsd starting");

    let period = config.reporting_period()?;
    let identity = config.identity().context("invalid workload identity")?;

    let registry = Arc::new(PrometheusRegistry::new()?);
    let reporter = StatsReporter::with_identity(identity, period, registry.clone())?;

    // ── Shutdown signal ────────────────────────────────────────

    let shutdown_rx = shutdown::spawn_shutdown_signal(tokio::signal::ctrl_c());

    // ── Input and report loop ──────────────────────────────────

    let (tx, rx) = mpsc::channel(queue_depth.max(1));
    let input = tokio::spawn(source::forward_lines(BufReader::new(tokio::io::stdin()), tx));

    let summary = run_report_loop(&reporter, rx, shutdown_rx).await;

    input.abort();
    match input.await {
        Ok(Err(e)) => warn!(error = %e, "stdin read failed"),
        Ok(Ok(lines)) => info!(lines, "stdin drained"),
        Err(_) => {}
    }

    print!("{}", registry.render()?);

    info!(
        reported = summary.reported,
        failed = summary.failed,
        uptime_secs = reporter.uptime().as_secs_f64(),
        "revstatsd stopped"
    );
    Ok(())
}
