//! CPU utilization from two cumulative /proc/stat samples.

use crate::types::MetricSet;

/// Cumulative CPU time counters (seconds since boot), aggregated over all cores.
///
/// `total` also includes the categories that are not reported individually
/// (nice, irq, softirq, guest), so the five reported fractions need not sum to 1.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuSample {
    pub user: f64,
    pub system: f64,
    pub idle: f64,
    pub steal: f64,
    pub iowait: f64,
    pub total: f64,
}

/// Share of CPU time spent in each category between two samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuUsage {
    pub user: f64,
    pub system: f64,
    pub idle: f64,
    pub stolen: f64,
    pub wait: f64,
}

impl CpuUsage {
    pub fn busy(&self) -> f64 {
        self.user + self.system
    }

    pub fn to_metrics(self) -> MetricSet {
        MetricSet::new()
            .with("cpu_user", self.user)
            .with("cpu_sys", self.system)
            .with("cpu_idle", self.idle)
            .with("cpu_stolen", self.stolen)
            .with("cpu_wait", self.wait)
            .with("cpu_busy", self.busy())
    }
}

/// Fractions of CPU time per category since `prev`.
///
/// No previous sample, or a total that did not advance (same tick, counter
/// reset after reboot), reports zero activity.
pub fn cpu_fractions(prev: Option<&CpuSample>, cur: &CpuSample) -> CpuUsage {
    let Some(prev) = prev else {
        return CpuUsage::default();
    };
    let dt = cur.total - prev.total;
    if dt <= 0.0 || !dt.is_finite() {
        return CpuUsage::default();
    }
    CpuUsage {
        user: (cur.user - prev.user) / dt,
        system: (cur.system - prev.system) / dt,
        idle: (cur.idle - prev.idle) / dt,
        stolen: (cur.steal - prev.steal) / dt,
        wait: (cur.iowait - prev.iowait) / dt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(user: f64, system: f64, idle: f64, steal: f64, iowait: f64, total: f64) -> CpuSample {
        CpuSample {
            user,
            system,
            idle,
            steal,
            iowait,
            total,
        }
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn first_sample_reports_zero() {
        let cur = sample(150.0, 70.0, 1020.0, 0.0, 60.0, 1300.0);
        let m = cpu_fractions(None, &cur).to_metrics();
        assert_eq!(m.len(), 6);
        for (k, v) in m.iter() {
            assert_eq!(v, 0.0, "{k}");
        }
    }

    #[test]
    fn fractions_over_total_delta() {
        let prev = sample(100.0, 50.0, 800.0, 0.0, 50.0, 1000.0);
        let cur = sample(150.0, 70.0, 1020.0, 0.0, 60.0, 1300.0);
        let m = cpu_fractions(Some(&prev), &cur).to_metrics();
        assert_close(m.get("cpu_user").unwrap(), 50.0 / 300.0);
        assert_close(m.get("cpu_sys").unwrap(), 20.0 / 300.0);
        assert_close(m.get("cpu_idle").unwrap(), 220.0 / 300.0);
        assert_close(m.get("cpu_stolen").unwrap(), 0.0);
        assert_close(m.get("cpu_wait").unwrap(), 10.0 / 300.0);
        assert_close(m.get("cpu_busy").unwrap(), 70.0 / 300.0);
    }

    #[test]
    fn unchanged_total_is_zero_not_nan() {
        let prev = sample(100.0, 50.0, 800.0, 0.0, 50.0, 1000.0);
        let u = cpu_fractions(Some(&prev), &prev);
        assert_eq!(u, CpuUsage::default());
        assert!(u.to_metrics().iter().all(|(_, v)| v.is_finite()));
    }

    #[test]
    fn counter_reset_after_reboot_is_zero() {
        let prev = sample(100.0, 50.0, 800.0, 0.0, 50.0, 1000.0);
        let cur = sample(1.0, 1.0, 8.0, 0.0, 0.0, 10.0);
        assert_eq!(cpu_fractions(Some(&prev), &cur), CpuUsage::default());
    }

    #[test]
    fn steal_is_reported() {
        let prev = sample(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        let cur = sample(10.0, 10.0, 60.0, 20.0, 0.0, 100.0);
        let u = cpu_fractions(Some(&prev), &cur);
        assert_close(u.stolen, 0.2);
        assert_close(u.busy(), 0.2);
    }
}
