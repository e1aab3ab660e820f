//! Statistics read from a /proc tree mounted at an arbitrary root
//! (e.g. the host's /proc bind-mounted into a container at /host/proc).

use crate::cpu::CpuSample;
use crate::error::PlatformError;
use crate::platform::{LoadAvg, NetCounters, PlatformStats, Usage};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use nix::errno::Errno;
use nix::sys::statvfs::statvfs;
use tracing::debug;

// /proc/stat reports CPU time in USER_HZ ticks, fixed at 100 on Linux.
const USER_HZ: f64 = 100.0;

#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl ProcFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    fn read(&self, rel: &str) -> Result<(PathBuf, String), PlatformError> {
        let path = self.path(rel);
        match fs::read_to_string(&path) {
            Ok(s) => Ok((path, s)),
            Err(source) => Err(PlatformError::Read { path, source }),
        }
    }

    /// Key -> bytes for every `Name:   123 kB` line of meminfo.
    fn meminfo(&self) -> Result<(PathBuf, Vec<(String, u64)>), PlatformError> {
        let (path, s) = self.read("meminfo")?;
        let entries = s
            .lines()
            .filter_map(|line| {
                let (key, rest) = line.split_once(':')?;
                let mut it = rest.split_whitespace();
                let v = it.next()?.parse::<u64>().ok()?;
                let bytes = match it.next() {
                    Some("kB") => v.saturating_mul(1024),
                    _ => v,
                };
                Some((key.trim().to_string(), bytes))
            })
            .collect();
        Ok((path, entries))
    }
}

fn lookup(entries: &[(String, u64)], key: &str) -> Option<u64> {
    entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
}

fn require(entries: &[(String, u64)], path: &Path, key: &str) -> Result<u64, PlatformError> {
    lookup(entries, key).ok_or_else(|| PlatformError::parse(path, format!("missing {key}")))
}

/// Blocks reserved for root count as neither used nor free, so
/// `used + free` can be less than `total`.
fn fs_usage(blocks: u64, blocks_free: u64, blocks_available: u64, frsize: u64) -> Usage {
    Usage {
        total: blocks.saturating_mul(frsize),
        used: blocks.saturating_sub(blocks_free).saturating_mul(frsize),
        free: blocks_available.saturating_mul(frsize),
    }
}

fn parse_f64(path: &Path, tok: Option<&str>, what: &str) -> Result<f64, PlatformError> {
    tok.and_then(|t| t.parse::<f64>().ok())
        .ok_or_else(|| PlatformError::parse(path, format!("bad {what}")))
}

impl PlatformStats for ProcFs {
    fn load_avg(&self) -> Result<LoadAvg, PlatformError> {
        // "0.52 0.58 0.59 1/467 12345"
        let (path, s) = self.read("loadavg")?;
        let mut it = s.split_whitespace();
        Ok(LoadAvg {
            one: parse_f64(&path, it.next(), "load1")?,
            five: parse_f64(&path, it.next(), "load5")?,
            fifteen: parse_f64(&path, it.next(), "load15")?,
        })
    }

    fn virtual_memory(&self) -> Result<Usage, PlatformError> {
        let (path, m) = self.meminfo()?;
        let total = require(&m, &path, "MemTotal")?;
        let free = require(&m, &path, "MemFree")?;
        let buffers = lookup(&m, "Buffers").unwrap_or(0);
        let cached = lookup(&m, "Cached").unwrap_or(0);
        Ok(Usage {
            total,
            used: total
                .saturating_sub(free)
                .saturating_sub(buffers)
                .saturating_sub(cached),
            free,
        })
    }

    fn swap_memory(&self) -> Result<Usage, PlatformError> {
        let (path, m) = self.meminfo()?;
        let total = require(&m, &path, "SwapTotal")?;
        let free = require(&m, &path, "SwapFree")?;
        Ok(Usage {
            total,
            used: total.saturating_sub(free),
            free,
        })
    }

    fn disk_usage(&self, mount_point: &Path) -> Result<Usage, PlatformError> {
        let st = match statvfs(mount_point) {
            Ok(st) => st,
            Err(Errno::ENOENT) => return Err(PlatformError::MountNotFound(mount_point.to_path_buf())),
            Err(e) => {
                return Err(PlatformError::Read {
                    path: mount_point.to_path_buf(),
                    source: e.into(),
                })
            }
        };
        Ok(fs_usage(
            st.blocks() as u64,
            st.blocks_free() as u64,
            st.blocks_available() as u64,
            st.fragment_size() as u64,
        ))
    }

    fn uptime(&self) -> Result<u64, PlatformError> {
        // "350735.47 234388.90": seconds up, seconds idle
        let (path, s) = self.read("uptime")?;
        let secs = parse_f64(&path, s.split_whitespace().next(), "uptime")?;
        Ok(secs as u64)
    }

    fn cpu_times(&self) -> Result<CpuSample, PlatformError> {
        // "cpu  user nice system idle iowait irq softirq steal guest guest_nice"
        let (path, s) = self.read("stat")?;
        let line = s
            .lines()
            .find(|l| l.starts_with("cpu "))
            .ok_or_else(|| PlatformError::parse(&path, "no aggregate cpu line"))?;
        let fields: Vec<f64> = line
            .split_whitespace()
            .skip(1)
            .take(10)
            .map(|tok| tok.parse::<f64>().map(|v| v / USER_HZ))
            .collect::<Result<_, _>>()
            .map_err(|e| PlatformError::parse(&path, e.to_string()))?;
        if fields.len() < 4 {
            return Err(PlatformError::parse(
                &path,
                format!("cpu line has {} fields, expected at least 4", fields.len()),
            ));
        }
        let field = |i: usize| fields.get(i).copied().unwrap_or(0.0);
        Ok(CpuSample {
            user: field(0),
            system: field(2),
            idle: field(3),
            iowait: field(4),
            steal: field(7),
            total: fields.iter().sum(),
        })
    }

    fn net_io_counters(&self) -> Result<Vec<NetCounters>, PlatformError> {
        // Two header lines, then "  eth0: rx_bytes rx_packets ... tx_bytes ..."
        let (path, s) = self.read("net/dev")?;
        let mut out = Vec::new();
        for line in s.lines().skip(2) {
            let Some((name, rest)) = line.split_once(':') else {
                continue;
            };
            let cols: Vec<&str> = rest.split_whitespace().collect();
            let col = |i: usize| -> Result<u64, PlatformError> {
                cols.get(i)
                    .and_then(|t| t.parse::<u64>().ok())
                    .ok_or_else(|| PlatformError::parse(&path, format!("bad counters for {}", name.trim())))
            };
            out.push(NetCounters {
                name: name.trim().to_string(),
                bytes_recv: col(0)?,
                bytes_sent: col(8)?,
            });
        }
        Ok(out)
    }

    fn hostname(&self) -> Result<String, PlatformError> {
        // Reflects the UTS namespace of the reading process, same as gethostname(2).
        let path = self.path("sys/kernel/hostname");
        match fs::read_to_string(&path) {
            Ok(s) => Ok(s.trim().to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{} missing, using local hostname", path.display());
                hostname::get()
                    .map(|h| h.to_string_lossy().into_owned())
                    .map_err(PlatformError::Hostname)
            }
            Err(source) => Err(PlatformError::Read { path, source }),
        }
    }
}
