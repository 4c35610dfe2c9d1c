//! Battery probe over /sys/class/power_supply.
//!
//! The power device is discovered once at process start and held for the
//! run; a host without a battery is a startup failure, not a per-sample
//! one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::format::segment;
use crate::probes::ProbeError;

const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";
const WARN_MINUTES: u64 = 10;

/// Battery probe bound to the device discovered at startup.
pub struct BatteryProbe {
    battery: PathBuf,
    adapter: Option<PathBuf>,
    warned: bool,
}

/// One power-management reading.
#[derive(Debug, Clone, Copy)]
struct PowerSnapshot {
    capacity: u8,
    on_ac: bool,
    minutes_left: Option<u64>,
}

impl BatteryProbe {
    /// Discovers the first battery (and mains adapter, if any) under the
    /// default sysfs root.
    pub fn open() -> io::Result<Self> {
        Self::open_at(Path::new(POWER_SUPPLY_ROOT))
    }

    fn open_at(root: &Path) -> io::Result<Self> {
        let mut battery = None;
        let mut adapter = None;
        for entry in fs::read_dir(root)? {
            let dir = entry?.path();
            let Ok(kind) = fs::read_to_string(dir.join("type")) else {
                continue;
            };
            match kind.trim() {
                "Battery" if battery.is_none() => battery = Some(dir),
                "Mains" if adapter.is_none() => adapter = Some(dir),
                _ => {}
            }
        }
        let battery = battery
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no battery device"))?;
        Ok(Self {
            battery,
            adapter,
            warned: false,
        })
    }

    /// Renders `⚡ <level>% [A/C]` on external power, else
    /// `⚡ <level>% [H:MM]` remaining.
    pub fn sample(&mut self) -> Result<String, ProbeError> {
        let snap = self.snapshot()?;
        self.track_low_battery(&snap);
        if snap.on_ac {
            segment(format_args!("⚡ {}% [A/C]", snap.capacity))
        } else if let Some(minutes) = snap.minutes_left {
            segment(format_args!(
                "⚡ {}% [{}:{:02}]",
                snap.capacity,
                minutes / 60,
                minutes % 60
            ))
        } else {
            // no drain rate exposed by the kernel; minutes unknown
            segment(format_args!("⚡ {}%", snap.capacity))
        }
    }

    fn snapshot(&self) -> Result<PowerSnapshot, ProbeError> {
        let capacity = read_u64(&self.battery, "capacity")?.min(100) as u8;
        let status = read_attr(&self.battery, "status")?;
        let on_ac = match self
            .adapter
            .as_deref()
            .and_then(|dir| read_opt_u64(dir, "online"))
        {
            Some(online) => online == 1,
            None => matches!(status.as_str(), "Charging" | "Full" | "Not charging"),
        };
        let minutes_left = if on_ac {
            None
        } else {
            drain_minutes(&self.battery)
        };
        Ok(PowerSnapshot {
            capacity,
            on_ac,
            minutes_left,
        })
    }

    /// One-shot low-battery latch: set the first time the device is on
    /// battery with [`WARN_MINUTES`] or less remaining, cleared whenever
    /// external power is present. Hook point for an external notifier; the
    /// rendered line is unaffected.
    fn track_low_battery(&mut self, snap: &PowerSnapshot) {
        if snap.on_ac {
            self.warned = false;
        } else if !self.warned && snap.minutes_left.is_some_and(|m| m <= WARN_MINUTES) {
            self.warned = true;
            debug!(
                minutes = snap.minutes_left.unwrap_or(0),
                "battery runtime below warning threshold"
            );
        }
    }
}

/// Minutes of runtime at the current drain, `None` when the kernel exposes
/// no usable rate.
fn drain_minutes(battery: &Path) -> Option<u64> {
    let (stored, rate) = match (
        read_opt_u64(battery, "energy_now"),
        read_opt_u64(battery, "power_now"),
    ) {
        (Some(stored), Some(rate)) => (stored, rate),
        _ => (
            read_opt_u64(battery, "charge_now")?,
            read_opt_u64(battery, "current_now")?,
        ),
    };
    if rate == 0 {
        return None;
    }
    Some(stored * 60 / rate)
}

fn read_attr(dir: &Path, name: &str) -> Result<String, ProbeError> {
    fs::read_to_string(dir.join(name))
        .map(|s| s.trim().to_string())
        .map_err(|e| ProbeError::read("battery", e))
}

fn read_u64(dir: &Path, name: &str) -> Result<u64, ProbeError> {
    read_attr(dir, name)?
        .parse()
        .map_err(|_| ProbeError::parse("battery"))
}

fn read_opt_u64(dir: &Path, name: &str) -> Option<u64> {
    fs::read_to_string(dir.join(name))
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn fake_supply(root: &Path, name: &str, kind: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir(&dir).unwrap();
        write(&dir, "type", kind);
        dir
    }

    #[test]
    fn discovers_battery_and_adapter() {
        let root = tempfile::tempdir().unwrap();
        fake_supply(root.path(), "AC", "Mains");
        fake_supply(root.path(), "BAT0", "Battery");

        let probe = BatteryProbe::open_at(root.path()).unwrap();
        assert!(probe.battery.ends_with("BAT0"));
        assert!(probe.adapter.as_ref().unwrap().ends_with("AC"));
    }

    #[test]
    fn no_battery_is_a_startup_error() {
        let root = tempfile::tempdir().unwrap();
        fake_supply(root.path(), "AC", "Mains");
        assert!(BatteryProbe::open_at(root.path()).is_err());
    }

    #[test]
    fn renders_ac_state() {
        let root = tempfile::tempdir().unwrap();
        let ac = fake_supply(root.path(), "AC", "Mains");
        let bat = fake_supply(root.path(), "BAT0", "Battery");
        write(&ac, "online", "1\n");
        write(&bat, "capacity", "88\n");
        write(&bat, "status", "Charging\n");

        let mut probe = BatteryProbe::open_at(root.path()).unwrap();
        assert_eq!(probe.sample().unwrap(), "⚡ 88% [A/C]");
    }

    #[test]
    fn renders_remaining_runtime_zero_padded() {
        let root = tempfile::tempdir().unwrap();
        let bat = fake_supply(root.path(), "BAT0", "Battery");
        write(&bat, "capacity", "57\n");
        write(&bat, "status", "Discharging\n");
        write(&bat, "energy_now", "10000000\n");
        write(&bat, "power_now", "4800000\n");

        let mut probe = BatteryProbe::open_at(root.path()).unwrap();
        assert_eq!(probe.sample().unwrap(), "⚡ 57% [2:05]");
    }

    #[test]
    fn falls_back_to_charge_counters() {
        let root = tempfile::tempdir().unwrap();
        let bat = fake_supply(root.path(), "BAT0", "Battery");
        write(&bat, "capacity", "40\n");
        write(&bat, "status", "Discharging\n");
        write(&bat, "charge_now", "3000000\n");
        write(&bat, "current_now", "600000\n");

        let mut probe = BatteryProbe::open_at(root.path()).unwrap();
        assert_eq!(probe.sample().unwrap(), "⚡ 40% [5:00]");
    }

    #[test]
    fn unknown_drain_rate_omits_the_time_bracket() {
        let root = tempfile::tempdir().unwrap();
        let bat = fake_supply(root.path(), "BAT0", "Battery");
        write(&bat, "capacity", "42\n");
        write(&bat, "status", "Discharging\n");

        let mut probe = BatteryProbe::open_at(root.path()).unwrap();
        assert_eq!(probe.sample().unwrap(), "⚡ 42%");
    }

    #[test]
    fn latch_sets_on_low_battery_and_clears_on_ac() {
        let mut probe = BatteryProbe {
            battery: PathBuf::new(),
            adapter: None,
            warned: false,
        };
        let low = PowerSnapshot {
            capacity: 4,
            on_ac: false,
            minutes_left: Some(8),
        };
        probe.track_low_battery(&low);
        assert!(probe.warned);

        // stays set while still on battery
        probe.track_low_battery(&low);
        assert!(probe.warned);

        let ac = PowerSnapshot {
            capacity: 5,
            on_ac: true,
            minutes_left: None,
        };
        probe.track_low_battery(&ac);
        assert!(!probe.warned);
    }

    #[test]
    fn latch_ignores_healthy_runtime() {
        let mut probe = BatteryProbe {
            battery: PathBuf::new(),
            adapter: None,
            warned: false,
        };
        let healthy = PowerSnapshot {
            capacity: 80,
            on_ac: false,
            minutes_left: Some(240),
        };
        probe.track_low_battery(&healthy);
        assert!(!probe.warned);
    }
}
