//! Line assembly: fixed probe order, independent degradation per slot.

use tracing::warn;

use crate::probes::battery::BatteryProbe;
use crate::probes::cpu::CpuProbe;
use crate::probes::net::NetProbe;
use crate::probes::thermal::ThermalProbe;
use crate::probes::{clock, ProbeError};

/// Names of the five slots, in render order.
const SLOTS: [&str; 5] = ["network", "cpu", "battery", "temperature", "time"];

/// The status line generator.
///
/// Owns every probe's cross-poll state (byte-rate counters, previous CPU
/// ticks, the low-battery latch), so a long-lived caller gets real deltas
/// from the second [`render`](Self::render) on. A host that re-executes
/// the binary per poll instead always sees zero-delta rates; that is the
/// expected behavior, not a defect.
pub struct StatusLine {
    net: NetProbe,
    cpu: CpuProbe,
    battery: BatteryProbe,
    thermal: ThermalProbe,
}

impl StatusLine {
    pub fn new(interface: String, battery: BatteryProbe) -> Self {
        Self {
            net: NetProbe::new(interface),
            cpu: CpuProbe::new(),
            battery,
            thermal: ThermalProbe::new(),
        }
    }

    /// Samples all probes in fixed order and assembles the line.
    pub fn render(&mut self) -> String {
        join_segments([
            self.net.sample(),
            self.cpu.sample(),
            self.battery.sample(),
            self.thermal.sample(),
            clock::sample(),
        ])
    }
}

/// Joins the five probe outcomes with `" | "` and a trailing space.
///
/// A failed probe degrades to its error's display text in its own slot;
/// the line always carries exactly five segments.
pub fn join_segments(segments: [Result<String, ProbeError>; 5]) -> String {
    let mut line = String::with_capacity(128);
    for (slot, outcome) in SLOTS.into_iter().zip(segments) {
        if !line.is_empty() {
            line.push_str(" | ");
        }
        match outcome {
            Ok(text) => line.push_str(&text),
            Err(err) => {
                warn!(slot, error = %err, "probe failed");
                line.push_str(&err.to_string());
            }
        }
    }
    line.push(' ');
    line
}
