//! Wall-clock segment.

use chrono::Local;

use crate::format::segment;
use crate::probes::ProbeError;

/// Local time as `YYYY-MM-DD HH:MM`.
pub fn sample() -> Result<String, ProbeError> {
    segment(format_args!("{}", Local::now().format("%Y-%m-%d %H:%M")))
}
