use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};

use sentinel_config::SentinelConfig;
use sentinel_engine::{ChannelSink, TrafficEngine};
use sentinel_telemetry::logging::EventLogger;
use sentinel_telemetry::metrics::MetricsRecorder;

use crate::render;

#[derive(Parser)]
#[command(name = "sentinel", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a capture session and stream the feed to stdout
    Run(RunArgs),
    /// Print the effective configuration as YAML
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Configuration file; defaults to config/sentinel.yaml when present
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Stop automatically after this many seconds instead of waiting for Ctrl-C
    #[arg(short, long)]
    pub duration_secs: Option<u64>,
    /// Export the event log when the session ends
    #[arg(short, long)]
    pub export: bool,
    /// Fixed generator seed, overrides the configuration
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

fn load_config(path: Option<&Path>) -> Result<SentinelConfig> {
    let config = match path {
        Some(path) => SentinelConfig::load_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SentinelConfig::load().context("loading configuration")?,
    };
    Ok(config)
}

pub fn show_config(args: ConfigArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    config.check()?;
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}

pub async fn run(args: RunArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.generator.seed = Some(seed);
    }
    EventLogger::init(&config.telemetry.log_level);

    let metrics = if config.telemetry.metrics {
        Some(Arc::new(MetricsRecorder::new()?))
    } else {
        None
    };

    let (sink, feed) = ChannelSink::unbounded();
    let mut engine = TrafficEngine::new(config, Arc::new(sink));
    if let Some(metrics) = &metrics {
        engine = engine.with_metrics(metrics.clone());
    }

    let printer = thread::Builder::new()
        .name("feed".into())
        .spawn(move || render::drain(feed, io::stdout()))
        .context("spawning feed printer")?;

    begin(&mut engine, &mut io::stdout())?;

    let interrupted = match args.duration_secs {
        Some(secs) => {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => false,
                signal = tokio::signal::ctrl_c() => {
                    signal?;
                    true
                }
            }
        }
        None => {
            tokio::signal::ctrl_c().await?;
            true
        }
    };

    let report = engine.stop().await?;
    EventLogger::log_lifecycle(
        "stop",
        &format!(
            "{} packets, {} snapshots",
            report.producer.ingested, report.publisher.published
        ),
    );

    let exported = if args.export {
        let (path, rows) = engine.export_default()?;
        EventLogger::log_lifecycle("export", &format!("{} ({rows} rows)", path.display()));
        Some(path)
    } else {
        None
    };

    // last sink handle goes with the engine; the printer then sees a closed channel
    drop(engine);
    match printer.join() {
        Ok(Err(e)) => warn!("Feed printer stopped early: {e}"),
        Err(_) => warn!("Feed printer panicked"),
        Ok(Ok(())) => {}
    }
    finish(&mut io::stdout(), interrupted, exported.as_deref())?;

    if let Some(metrics) = metrics {
        debug!("Metrics:\n{}", metrics.gather_metrics()?);
    }
    Ok(())
}

/// Starts the session, announcing it only once it is running.
fn begin(engine: &mut TrafficEngine, out: &mut impl Write) -> Result<()> {
    engine.start()?;
    EventLogger::log_lifecycle("start", "capture session running");
    writeln!(out, ">> SCANNING...")?;
    Ok(())
}

/// Closing banners, written once the feed printer has exited.
fn finish(out: &mut impl Write, interrupted: bool, exported: Option<&Path>) -> io::Result<()> {
    if interrupted {
        writeln!(out, ">> CAPTURE TERMINATED BY USER.")?;
    }
    if let Some(path) = exported {
        writeln!(out, ">> [DATA EXPORTED]: {}", path.display())?;
    }
    out.flush()
}
