//! Network interface throughput probe.
//!
//! Reads byte counters from /proc/net/dev, reports per-interval deltas and
//! appends the wireless link quality for wifi interfaces.

use std::fs;

use crate::format::{quality_glyph, scale_bytes, segment};
use crate::probes::{wireless, ProbeError};

/// Previous absolute byte totals used to compute per-interval deltas.
///
/// Both counters start unset, so the first sample reports a delta of 0
/// regardless of the absolute totals. A counter reset (interface
/// re-created, driver reload) clamps the delta to 0 instead of
/// underflowing.
#[derive(Debug, Default)]
pub struct RateCounter {
    rx: Option<u64>,
    tx: Option<u64>,
}

impl RateCounter {
    /// Consumes the current totals and returns `(rx_delta, tx_delta)`.
    pub fn advance(&mut self, rx_total: u64, tx_total: u64) -> (u64, u64) {
        let rx_delta = self.rx.map_or(0, |prev| rx_total.saturating_sub(prev));
        let tx_delta = self.tx.map_or(0, |prev| tx_total.saturating_sub(prev));
        self.rx = Some(rx_total);
        self.tx = Some(tx_total);
        (rx_delta, tx_delta)
    }
}

/// Network + wireless probe bound to a single interface name.
#[derive(Debug)]
pub struct NetProbe {
    interface: String,
    counter: RateCounter,
}

impl NetProbe {
    pub fn new(interface: String) -> Self {
        Self {
            interface,
            counter: RateCounter::default(),
        }
    }

    /// Samples /proc/net/dev and renders `↑ <tx>/s ↓ <rx>/s [<glyph>]`.
    ///
    /// The bracketed wifi part is omitted entirely when the interface has
    /// no wireless extensions.
    pub fn sample(&mut self) -> Result<String, ProbeError> {
        let content =
            fs::read_to_string("/proc/net/dev").map_err(|e| ProbeError::read("netdev", e))?;
        let (rx_total, tx_total) =
            interface_totals(&content, &self.interface).ok_or(ProbeError::InterfaceMissing)?;
        let (rx, tx) = self.counter.advance(rx_total, tx_total);
        render(rx, tx, wireless::link_quality(&self.interface)?)
    }
}

/// Sums rx/tx byte counters across every entry matching `name`.
fn interface_totals(content: &str, name: &str) -> Option<(u64, u64)> {
    let mut rx = 0u64;
    let mut tx = 0u64;
    let mut found = false;

    // Skip the two header lines
    for line in content.lines().skip(2) {
        let Some((ifname, counters)) = line.split_once(':') else {
            continue;
        };
        if ifname.trim() != name {
            continue;
        }
        let values: Vec<&str> = counters.split_whitespace().collect();
        if values.len() < 16 {
            continue; // Skip malformed lines
        }
        rx += values[0].parse::<u64>().unwrap_or(0);
        tx += values[8].parse::<u64>().unwrap_or(0);
        found = true;
    }
    found.then_some((rx, tx))
}

fn render(rx: u64, tx: u64, quality: Option<u8>) -> Result<String, ProbeError> {
    let up = scale_bytes(tx);
    let down = scale_bytes(rx);
    match quality {
        Some(q) => segment(format_args!("↑ {up}/s ↓ {down}/s [{}]", quality_glyph(q))),
        None => segment(format_args!("↑ {up}/s ↓ {down}/s")),
    }
}
