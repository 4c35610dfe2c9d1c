//! Temperature probe over the hwmon sensor framework.
//!
//! Walks `<root>/hwmon<i>/temp<j>_input` with three outcomes per query: a
//! missing index ends the walk, a temporarily absent sensor is skipped,
//! anything else fails the probe. Readings are carried as micro-Kelvin
//! fixed point; the maximum valid one is rendered in Celsius.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use crate::format::segment;
use crate::probes::ProbeError;

const HWMON_ROOT: &str = "/sys/class/hwmon";
const ZERO_CELSIUS_MICROKELVIN: i64 = 273_150_000;

/// Temperature probe rooted at the sensor-framework directory.
pub struct ThermalProbe {
    root: PathBuf,
}

impl ThermalProbe {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from(HWMON_ROOT),
        }
    }

    /// Renders `T <value>°C` from the hottest valid sensor.
    pub fn sample(&self) -> Result<String, ProbeError> {
        match self.max_reading()? {
            Some(raw) => segment(format_args!("T {:.1}°C", microkelvin_to_celsius(raw))),
            None => Err(ProbeError::NoSensor),
        }
    }

    /// Highest valid reading across all devices, in micro-Kelvin.
    fn max_reading(&self) -> Result<Option<i64>, ProbeError> {
        let mut max = None;
        for device in 0u32.. {
            let dir = self.root.join(format!("hwmon{device}"));
            match fs::metadata(&dir) {
                Err(e) if e.kind() == ErrorKind::NotFound => break,
                Err(e) => return Err(ProbeError::read("sensor", e)),
                Ok(_) => {}
            }
            scan_device(&dir, &mut max)?;
        }
        Ok(max)
    }
}

impl Default for ThermalProbe {
    fn default() -> Self {
        Self::new()
    }
}

/// Folds every temperature channel of one device into `max`.
fn scan_device(dir: &Path, max: &mut Option<i64>) -> Result<(), ProbeError> {
    for channel in 1u32.. {
        let value = match fs::read_to_string(dir.join(format!("temp{channel}_input"))) {
            Err(e) if e.kind() == ErrorKind::NotFound => break,
            Err(e) if sensor_absent(&e) => continue,
            Err(e) => return Err(ProbeError::read("sensor", e)),
            Ok(content) => content,
        };
        if faulted(dir, channel) {
            continue; // driver flags the reading invalid
        }
        let millidegrees: i64 = value
            .trim()
            .parse()
            .map_err(|_| ProbeError::parse("sensor"))?;
        let raw = millidegrees * 1_000 + ZERO_CELSIUS_MICROKELVIN;
        *max = Some(max.map_or(raw, |m: i64| m.max(raw)));
    }
    Ok(())
}

/// Sensor present in the tree but not currently readable.
fn sensor_absent(err: &io::Error) -> bool {
    matches!(
        err.raw_os_error(),
        Some(libc::ENODEV) | Some(libc::ENXIO) | Some(libc::ENODATA) | Some(libc::EAGAIN)
    )
}

fn faulted(dir: &Path, channel: u32) -> bool {
    fs::read_to_string(dir.join(format!("temp{channel}_fault")))
        .map_or(false, |flag| flag.trim() != "0")
}

fn microkelvin_to_celsius(raw: i64) -> f64 {
    (raw - ZERO_CELSIUS_MICROKELVIN) as f64 / 1_000_000.0
}
