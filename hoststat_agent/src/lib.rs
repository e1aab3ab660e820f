//! Host metrics for containerized agents.
//!
//! Reads load, memory, swap, filesystem, uptime, CPU and network statistics
//! from a host /proc tree mounted at a configurable root, and reports them as
//! ordered sets of named float values. CPU utilization is the only derived
//! value: it is computed from the delta between consecutive cycles.

pub mod collector;
pub mod config;
pub mod cpu;
pub mod error;
pub mod platform;
pub mod procfs;
pub mod sampler;
pub mod types;

pub use collector::{HostCollector, Producer};
pub use config::AgentConfig;
pub use error::{Error, PlatformError};
pub use types::{MetricSet, Report, Snapshot};
