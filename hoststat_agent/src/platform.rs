//! Boundary to the host statistics providers.
//!
//! Every read is a single point-in-time snapshot; implementations keep no
//! state between calls.

use crate::cpu::CpuSample;
use crate::error::PlatformError;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadAvg {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Total/used/free byte counts, shared by memory, swap and filesystem reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

/// Cumulative byte counters for one network interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetCounters {
    pub name: String,
    pub bytes_recv: u64,
    pub bytes_sent: u64,
}

pub trait PlatformStats {
    fn load_avg(&self) -> Result<LoadAvg, PlatformError>;

    fn virtual_memory(&self) -> Result<Usage, PlatformError>;

    fn swap_memory(&self) -> Result<Usage, PlatformError>;

    /// Usage of the filesystem mounted at `mount_point`.
    fn disk_usage(&self, mount_point: &Path) -> Result<Usage, PlatformError>;

    /// Seconds since boot.
    fn uptime(&self) -> Result<u64, PlatformError>;

    /// Aggregate CPU times across all cores.
    fn cpu_times(&self) -> Result<CpuSample, PlatformError>;

    /// Counters for every interface the host reports.
    fn net_io_counters(&self) -> Result<Vec<NetCounters>, PlatformError>;

    fn hostname(&self) -> Result<String, PlatformError>;
}
