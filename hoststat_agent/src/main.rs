//! hoststat_agent: prints one JSON report per collection cycle on stdout.

use hoststat_agent::{sampler, AgentConfig, HostCollector};
use std::io::Write;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    // Logs go to stderr; stdout carries only reports.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn emit(report: &hoststat_agent::Report) {
    match serde_json::to_string(report) {
        Ok(js) => {
            let mut out = std::io::stdout().lock();
            let _ = writeln!(out, "{js}");
            let _ = out.flush();
        }
        Err(e) => error!("failed to encode report: {e}"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = match AgentConfig::from_env().and_then(|c| c.apply_args(std::env::args())) {
        Ok(cfg) => cfg,
        Err(msg) if msg.starts_with("Usage:") => {
            println!("{msg}");
            return Ok(());
        }
        Err(msg) => anyhow::bail!(msg),
    };
    init_logging();

    let mut collector = HostCollector::from_config(&cfg)?;
    if cfg.once {
        let report = sampler::sample_once(&mut collector)?;
        emit(&report);
        return Ok(());
    }
    sampler::run(collector, cfg.interval, emit).await;
    Ok(())
}
