//! Host metrics collector: runs the producers in a fixed order and keeps the
//! previous CPU sample between cycles.

use crate::config::AgentConfig;
use crate::cpu::{cpu_fractions, CpuSample};
use crate::error::{Error, Result};
use crate::platform::{PlatformStats, Usage};
use crate::procfs::ProcFs;
use crate::types::{MetricSet, Snapshot};
use std::path::Path;
use tracing::{debug, warn};

pub const DEFAULT_INTERFACE: &str = "eth0";

const ROOT_MOUNT: &str = "/";

/// One metric producer. Each yields a single [`MetricSet`] with a fixed key set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Producer {
    Load,
    Memory,
    Swap,
    Filesystem,
    Uptime,
    Cpu,
    Network,
}

impl Producer {
    /// Collection order for one cycle.
    pub const ALL: [Producer; 7] = [
        Producer::Load,
        Producer::Memory,
        Producer::Swap,
        Producer::Filesystem,
        Producer::Uptime,
        Producer::Cpu,
        Producer::Network,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Producer::Load => "load",
            Producer::Memory => "memory",
            Producer::Swap => "swap",
            Producer::Filesystem => "filesystem",
            Producer::Uptime => "uptime",
            Producer::Cpu => "cpu",
            Producer::Network => "network",
        }
    }

    pub fn keys(self) -> &'static [&'static str] {
        match self {
            Producer::Load => &["load1", "load5", "load15"],
            Producer::Memory => &["mem_total", "mem_used", "mem_free"],
            Producer::Swap => &["swap_total", "swap_used", "swap_free"],
            Producer::Filesystem => &["disk_total", "disk_used", "disk_free"],
            Producer::Uptime => &["uptime"],
            Producer::Cpu => &[
                "cpu_user",
                "cpu_sys",
                "cpu_idle",
                "cpu_stolen",
                "cpu_wait",
                "cpu_busy",
            ],
            Producer::Network => &["netrx", "nettx"],
        }
    }
}

fn usage_metrics(keys: &[&'static str], u: Usage) -> MetricSet {
    MetricSet::new()
        .with(keys[0], u.total as f64)
        .with(keys[1], u.used as f64)
        .with(keys[2], u.free as f64)
}

/// Collects host metrics from a [`PlatformStats`] provider.
///
/// Not internally synchronized: callers sharing one collector across threads
/// must serialize calls to [`HostCollector::collect`].
#[derive(Debug)]
pub struct HostCollector<P = ProcFs> {
    platform: P,
    interface: String,
    last_cpu: Option<CpuSample>,
}

impl HostCollector<ProcFs> {
    /// Build a collector reading the /proc tree named by `cfg.proc_root`.
    pub fn from_config(cfg: &AgentConfig) -> Result<Self> {
        let root = cfg.proc_root.as_deref().ok_or_else(|| {
            Error::Configuration("HOST_PROC must be set to be able to send host metrics".into())
        })?;
        if !root.is_dir() {
            return Err(Error::Configuration(format!(
                "process info root {} is not a directory",
                root.display()
            )));
        }
        Ok(Self::with_platform(ProcFs::new(root), Some(&cfg.interface)))
    }
}

impl<P: PlatformStats> HostCollector<P> {
    pub fn with_platform(platform: P, interface: Option<&str>) -> Self {
        Self {
            platform,
            interface: interface.unwrap_or(DEFAULT_INTERFACE).to_string(),
            last_cpu: None,
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn last_cpu_sample(&self) -> Option<&CpuSample> {
        self.last_cpu.as_ref()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Run every producer once, in [`Producer::ALL`] order.
    ///
    /// A missing network interface drops only the network set; any other
    /// failure aborts the cycle and nothing gathered so far is returned.
    pub fn collect(&mut self) -> Result<Snapshot> {
        let mut out = Vec::with_capacity(Producer::ALL.len());
        for producer in Producer::ALL {
            match self.produce(producer) {
                Ok(set) => out.push(set),
                Err(e) if e.is_interface_not_found() => {
                    warn!("Skipping network metrics: {e}");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }

    pub fn produce(&mut self, producer: Producer) -> Result<MetricSet> {
        debug!(producer = producer.name(), "collecting");
        let keys = producer.keys();
        let set = match producer {
            Producer::Load => {
                let l = self.platform.load_avg()?;
                MetricSet::new()
                    .with(keys[0], l.one)
                    .with(keys[1], l.five)
                    .with(keys[2], l.fifteen)
            }
            Producer::Memory => usage_metrics(keys, self.platform.virtual_memory()?),
            Producer::Swap => usage_metrics(keys, self.platform.swap_memory()?),
            Producer::Filesystem => {
                usage_metrics(keys, self.platform.disk_usage(Path::new(ROOT_MOUNT))?)
            }
            Producer::Uptime => MetricSet::new().with(keys[0], self.platform.uptime()? as f64),
            Producer::Cpu => {
                let cur = self.platform.cpu_times()?;
                let usage = cpu_fractions(self.last_cpu.as_ref(), &cur);
                self.last_cpu = Some(cur);
                usage.to_metrics()
            }
            Producer::Network => {
                let nets = self.platform.net_io_counters()?;
                let iface = nets
                    .into_iter()
                    .find(|n| n.name == self.interface)
                    .ok_or_else(|| Error::InterfaceNotFound {
                        name: self.interface.clone(),
                    })?;
                MetricSet::new()
                    .with(keys[0], iface.bytes_recv as f64)
                    .with(keys[1], iface.bytes_sent as f64)
            }
        };
        Ok(set)
    }

    pub fn hostname(&self) -> Result<String> {
        Ok(self.platform.hostname()?)
    }
}
