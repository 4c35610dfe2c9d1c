//! CPU utilization and clock/performance probe.
//!
//! Tick counters come from the aggregate `cpu` line of /proc/stat; the
//! previous reading is kept across samples to form the busy percentage.
//! Clock and throttle state come from cpufreq.

use std::fs;
use std::path::Path;

use crate::format::segment;
use crate::probes::ProbeError;

const STAT_PATH: &str = "/proc/stat";
const CPUFREQ_DIR: &str = "/sys/devices/system/cpu/cpu0/cpufreq";

/// Cumulative scheduler ticks per CPU state.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CpuTicks {
    user: u64,
    nice: u64,
    system: u64,
    idle: u64,
}

/// CPU probe holding the previous tick reading.
#[derive(Debug, Default)]
pub struct CpuProbe {
    prev: Option<CpuTicks>,
}

impl CpuProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders `CPU <pct>% <clock>GHz [<perf>%]`.
    ///
    /// The busy percentage is 0 on the first sample of a process: there is
    /// no previous reading to delta against.
    pub fn sample(&mut self) -> Result<String, ProbeError> {
        let content = fs::read_to_string(STAT_PATH).map_err(|e| ProbeError::read("stat", e))?;
        let busy = self.note(parse_ticks(&content)?);

        let freq = Path::new(CPUFREQ_DIR);
        let ghz = read_khz(&freq.join("scaling_cur_freq"))? as f64 / 1_000_000.0;
        let perf = throttle_percent(
            read_khz(&freq.join("scaling_max_freq"))?,
            read_khz(&freq.join("cpuinfo_max_freq"))?,
        )?;
        segment(format_args!("CPU {busy}% {ghz:.1}GHz [{perf}%]"))
    }

    /// Folds a new reading into the probe and returns the busy percentage
    /// for the elapsed interval.
    fn note(&mut self, current: CpuTicks) -> u8 {
        let busy = self.prev.map_or(0, |prev| busy_percent(&prev, &current));
        self.prev = Some(current);
        busy
    }
}

/// Parses the aggregate `cpu` line: user nice system idle ...
fn parse_ticks(content: &str) -> Result<CpuTicks, ProbeError> {
    let line = content
        .lines()
        .find(|line| line.starts_with("cpu "))
        .ok_or(ProbeError::parse("stat"))?;
    let mut fields = line.split_whitespace().skip(1);
    let mut next = || {
        fields
            .next()
            .and_then(|v| v.parse::<u64>().ok())
            .ok_or(ProbeError::parse("stat"))
    };
    Ok(CpuTicks {
        user: next()?,
        nice: next()?,
        system: next()?,
        idle: next()?,
    })
}

/// Busy share of the tick delta, counting user+system+nice against idle.
fn busy_percent(prev: &CpuTicks, current: &CpuTicks) -> u8 {
    let user = current.user.saturating_sub(prev.user);
    let nice = current.nice.saturating_sub(prev.nice);
    let system = current.system.saturating_sub(prev.system);
    let idle = current.idle.saturating_sub(prev.idle);

    let active = user + nice + system;
    let total = active + idle;
    if total == 0 {
        return 0;
    }
    (active * 100 / total) as u8
}

fn read_khz(path: &Path) -> Result<u64, ProbeError> {
    fs::read_to_string(path)
        .map_err(|e| ProbeError::read("cpufreq", e))?
        .trim()
        .parse()
        .map_err(|_| ProbeError::parse("cpufreq"))
}

fn throttle_percent(cap_khz: u64, rated_khz: u64) -> Result<u64, ProbeError> {
    if rated_khz == 0 {
        return Err(ProbeError::parse("cpufreq"));
    }
    Ok(cap_khz * 100 / rated_khz)
}
