//! Bounded segment formatting, byte scaling and signal-quality glyphs.

use std::fmt;

use crate::probes::ProbeError;

/// Upper bound for one rendered probe segment, in bytes.
pub const SEGMENT_CAP: usize = 64;

/// Display tiers for signal quality, weakest first.
const QUALITY_GLYPHS: [&str; 5] = ["  ", " .", "..", ".:", "::"];

/// Renders one probe segment, reporting overflow past [`SEGMENT_CAP`].
pub fn segment(args: fmt::Arguments<'_>) -> Result<String, ProbeError> {
    let text = fmt::format(args);
    if text.len() > SEGMENT_CAP {
        return Err(ProbeError::Overflow);
    }
    Ok(text)
}

/// Two-character glyph for a 0-100 signal quality.
pub fn quality_glyph(quality: u8) -> &'static str {
    QUALITY_GLYPHS[quality_bucket(quality)]
}

fn quality_bucket(quality: u8) -> usize {
    (4 * usize::from(quality.min(100)) / 100).min(4)
}

/// Human-scaled byte count: 1024-based units, one decimal below 100 of a
/// unit ("1.5K", "12.3M", "512K").
pub fn scale_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "K", "M", "G", "T", "P"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes}B")
    } else if value < 100.0 {
        format!("{value:.1}{}", UNITS[unit])
    } else {
        format!("{value:.0}{}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_covers_all_tiers() {
        assert_eq!(quality_bucket(0), 0);
        assert_eq!(quality_bucket(24), 0);
        assert_eq!(quality_bucket(25), 1);
        assert_eq!(quality_bucket(50), 2);
        assert_eq!(quality_bucket(99), 3);
        assert_eq!(quality_bucket(100), 4);
    }

    #[test]
    fn bucket_is_monotone_and_in_range() {
        let mut last = 0;
        for quality in 0..=100u8 {
            let bucket = quality_bucket(quality);
            assert!(bucket <= 4);
            assert!(bucket >= last);
            last = bucket;
        }
    }

    #[test]
    fn glyphs_are_two_characters() {
        for quality in [0u8, 10, 40, 70, 100] {
            assert_eq!(quality_glyph(quality).chars().count(), 2);
        }
    }

    #[test]
    fn scales_bytes_to_1024_units() {
        assert_eq!(scale_bytes(0), "0B");
        assert_eq!(scale_bytes(512), "512B");
        assert_eq!(scale_bytes(1536), "1.5K");
        assert_eq!(scale_bytes(512 * 1024), "512K");
        assert_eq!(scale_bytes(12_897_485), "12.3M");
        assert_eq!(scale_bytes(3 * 1024 * 1024 * 1024), "3.0G");
    }

    #[test]
    fn segment_reports_overflow() {
        assert!(segment(format_args!("{}", "x".repeat(SEGMENT_CAP))).is_ok());

        let err = segment(format_args!("{}", "x".repeat(SEGMENT_CAP + 1))).unwrap_err();
        assert_eq!(err.to_string(), "format failed");
    }
}
