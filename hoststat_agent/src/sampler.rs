//! Periodic sampler: runs one collection cycle per tick and hands each report
//! to a sink (stdout in the binary).

use crate::collector::HostCollector;
use crate::error::Result;
use crate::platform::PlatformStats;
use crate::types::Report;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

fn now_unix_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Run one cycle and wrap it with the hostname and a timestamp.
pub fn sample_once<P: PlatformStats>(collector: &mut HostCollector<P>) -> Result<Report> {
    let metrics = collector.collect()?;
    let hostname = collector.hostname()?;
    Ok(Report {
        ts_unix_ms: now_unix_ms(),
        hostname,
        metrics,
    })
}

/// Sample every `period` until ctrl-c. A failed cycle is logged and the next
/// tick tries again; the CPU baseline carries over either way.
pub async fn run<P, F>(mut collector: HostCollector<P>, period: Duration, mut sink: F)
where
    P: PlatformStats,
    F: FnMut(&Report),
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(
        "sampling every {:?} (interface {})",
        period,
        collector.interface()
    );
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match sample_once(&mut collector) {
                    Ok(report) => sink(&report),
                    Err(e) => error!("metrics cycle failed: {e}"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }
}
