//! Agent configuration: environment first, then command-line overrides.
//!
//! Environment:
//!   HOST_PROC                  root of the /proc tree to read (required)
//!   METRICS_NETWORK_INTERFACE  interface whose counters are reported (default eth0)
//!   HOSTSTAT_INTERVAL_SECS     seconds between cycles (default 60)

use crate::collector::DEFAULT_INTERFACE;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub proc_root: Option<PathBuf>,
    pub interface: String,
    pub interval: Duration,
    pub once: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            proc_root: None,
            interface: DEFAULT_INTERFACE.to_string(),
            interval: DEFAULT_INTERVAL,
            once: false,
        }
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

fn parse_interval(v: &str) -> Option<Duration> {
    v.trim()
        .parse::<u64>()
        .ok()
        .filter(|s| *s > 0)
        .map(Duration::from_secs)
}

impl AgentConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(get: F) -> Result<Self, String> {
        let mut cfg = Self::default();
        if let Some(root) = non_empty(get("HOST_PROC")) {
            cfg.proc_root = Some(PathBuf::from(root));
        }
        if let Some(iface) = non_empty(get("METRICS_NETWORK_INTERFACE")) {
            cfg.interface = iface;
        }
        if let Some(v) = non_empty(get("HOSTSTAT_INTERVAL_SECS")) {
            cfg.interval = parse_interval(&v)
                .ok_or_else(|| format!("invalid HOSTSTAT_INTERVAL_SECS: {v}"))?;
        }
        Ok(cfg)
    }

    /// Apply command-line flags on top of `self`. `Err` carries the text to print
    /// (usage for `--help`, or the reason the arguments were rejected).
    pub fn apply_args<I: IntoIterator<Item = String>>(mut self, args: I) -> Result<Self, String> {
        let mut it = args.into_iter();
        let prog = it.next().unwrap_or_else(|| "hoststat_agent".into());
        let usage = format!(
            "Usage: {prog} [--proc-root DIR|-r DIR] [--interface NAME|-i NAME] [--interval SECS|-n SECS] [--once]"
        );
        while let Some(arg) = it.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((f, v)) if f.starts_with("--") => (f.to_string(), Some(v.to_string())),
                _ => (arg.clone(), None),
            };
            let mut value = |name: &str| -> Result<String, String> {
                inline
                    .clone()
                    .or_else(|| it.next())
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| format!("{name} requires a value\n{usage}"))
            };
            match flag.as_str() {
                "-h" | "--help" => return Err(usage.clone()),
                "--proc-root" | "-r" => self.proc_root = Some(PathBuf::from(value(&flag)?)),
                "--interface" | "-i" => self.interface = value(&flag)?,
                "--interval" | "-n" => {
                    let v = value(&flag)?;
                    self.interval = parse_interval(&v)
                        .ok_or_else(|| format!("invalid interval: {v}\n{usage}"))?;
                }
                "--once" => self.once = true,
                _ => return Err(format!("Unexpected argument: {arg}\n{usage}")),
            }
        }
        Ok(self)
    }
}
