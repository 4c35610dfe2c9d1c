//! Metric probes.
//!
//! Each probe reads one kernel interface and renders one display segment.
//! Probes fail independently: a failed probe returns a [`ProbeError`] whose
//! display text is the short diagnostic that fills its slot in the line,
//! while the remaining probes keep sampling.

pub mod battery;
pub mod clock;
pub mod cpu;
pub mod net;
pub mod thermal;
pub mod wireless;

use std::io;

use thiserror::Error;

/// Failure of a single probe.
///
/// The `Display` text doubles as the slot text rendered into the status
/// line; the underlying cause (where there is one) goes to the log.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// No counters matched the requested interface name.
    #[error("interface failed")]
    InterfaceMissing,

    /// A kernel interface could not be read.
    #[error("{what} failed")]
    Read {
        what: &'static str,
        source: io::Error,
    },

    /// A kernel interface returned data in an unexpected shape.
    #[error("{what} failed")]
    Parse { what: &'static str },

    /// No valid temperature sensor exists on this system.
    #[error("temperature failed")]
    NoSensor,

    /// A rendered segment exceeded its size bound.
    #[error("format failed")]
    Overflow,
}

impl ProbeError {
    pub(crate) fn read(what: &'static str, source: io::Error) -> Self {
        Self::Read { what, source }
    }

    pub(crate) fn parse(what: &'static str) -> Self {
        Self::Parse { what }
    }
}
