//! statline - single-shot status line generator.
//!
//! Samples network throughput, wireless link quality, CPU utilization and
//! clock state, battery charge, temperature and the wall clock, and renders
//! them as one fixed-order, `" | "`-separated line for a status-bar host.
//!
//! Probes degrade independently: a failing metric source is logged and
//! replaced by a short diagnostic in its own slot while the rest of the
//! line renders normally. Only startup concerns (device handles, CLI
//! usage) abort the process.
//!
//! ```no_run
//! use statline::probes::battery::BatteryProbe;
//! use statline::StatusLine;
//!
//! # fn main() -> anyhow::Result<()> {
//! let battery = BatteryProbe::open()?;
//! let mut status = StatusLine::new("wlan0".into(), battery);
//! println!("{}", status.render());
//! # Ok(())
//! # }
//! ```
//!
//! The deployment model is one line per invocation: the bar host re-invokes
//! the binary on a timer, so rate-based segments report zero deltas on the
//! first (and only) sample of each process. An embedder that keeps the
//! [`StatusLine`] alive across polls gets real deltas from the second
//! render on.

pub mod cli;
pub mod format;
pub mod probes;
pub mod status;

pub use probes::ProbeError;
pub use status::StatusLine;
