//! Time units used for configuring and displaying timer durations
//!
//! Timers store every duration as nanoseconds. The unit only decides how a
//! duration is expressed as a count in configuration files and rendered in
//! the timer's textual description.

use crate::error::{Result, TimerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const NANOS_PER_MICRO: u64 = 1_000;
const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SEC: u64 = 1_000_000_000;
const NANOS_PER_MIN: u64 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: u64 = 60 * NANOS_PER_MIN;

/// Display/configuration unit of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimeUnit {
    #[serde(rename = "ns", alias = "nanoseconds")]
    Nanoseconds,
    #[serde(rename = "us", alias = "microseconds")]
    Microseconds,
    #[default]
    #[serde(rename = "ms", alias = "milliseconds")]
    Milliseconds,
    #[serde(rename = "s", alias = "seconds")]
    Seconds,
    #[serde(rename = "min", alias = "minutes")]
    Minutes,
    #[serde(rename = "h", alias = "hours")]
    Hours,
    /// Any other tick length, in nanoseconds. Rendered with the `?` suffix.
    #[serde(rename = "custom")]
    Custom { nanos: u64 },
}

impl TimeUnit {
    /// Length of one unit in nanoseconds (never zero)
    pub fn nanos(&self) -> u64 {
        match self {
            TimeUnit::Nanoseconds => 1,
            TimeUnit::Microseconds => NANOS_PER_MICRO,
            TimeUnit::Milliseconds => NANOS_PER_MILLI,
            TimeUnit::Seconds => NANOS_PER_SEC,
            TimeUnit::Minutes => NANOS_PER_MIN,
            TimeUnit::Hours => NANOS_PER_HOUR,
            TimeUnit::Custom { nanos } => (*nanos).max(1),
        }
    }

    /// Suffix used when rendering a count in this unit
    pub fn suffix(&self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "us",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "min",
            TimeUnit::Hours => "h",
            TimeUnit::Custom { .. } => "?",
        }
    }

    /// Map a tick length in nanoseconds back to a named unit, falling back to
    /// `Custom` for anything else.
    pub fn from_nanos(nanos: u64) -> Self {
        match nanos {
            1 => TimeUnit::Nanoseconds,
            NANOS_PER_MICRO => TimeUnit::Microseconds,
            NANOS_PER_MILLI => TimeUnit::Milliseconds,
            NANOS_PER_SEC => TimeUnit::Seconds,
            NANOS_PER_MIN => TimeUnit::Minutes,
            NANOS_PER_HOUR => TimeUnit::Hours,
            other => TimeUnit::Custom { nanos: other },
        }
    }

    /// `count` units as a `Duration`
    ///
    /// Fails when the result does not fit in `u64` nanoseconds, which is the
    /// range a timer can store.
    pub fn duration(&self, count: u64) -> Result<Duration> {
        count
            .checked_mul(self.nanos())
            .map(Duration::from_nanos)
            .ok_or_else(|| {
                TimerError::InvalidDuration(format!(
                    "{}{} exceeds {} nanoseconds",
                    count,
                    self.suffix(),
                    u64::MAX
                ))
            })
    }

    /// Whole units contained in `nanos` (truncating)
    pub fn count(&self, nanos: u64) -> u64 {
        nanos / self.nanos()
    }

    /// Render `nanos` as `<count><suffix>`; a remainder is shown as a decimal
    /// fraction instead of being dropped.
    pub fn format_nanos(&self, nanos: u64) -> String {
        let unit = self.nanos();
        if nanos % unit == 0 {
            format!("{}{}", nanos / unit, self.suffix())
        } else {
            format!("{:.3}{}", nanos as f64 / unit as f64, self.suffix())
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for TimeUnit {
    type Err = TimerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ns" | "nanoseconds" => Ok(TimeUnit::Nanoseconds),
            "us" | "microseconds" => Ok(TimeUnit::Microseconds),
            "ms" | "milliseconds" => Ok(TimeUnit::Milliseconds),
            "s" | "seconds" => Ok(TimeUnit::Seconds),
            "min" | "minutes" => Ok(TimeUnit::Minutes),
            "h" | "hours" => Ok(TimeUnit::Hours),
            other => Err(TimerError::InvalidUnit(other.to_string())),
        }
    }
}

/// Clamp a `Duration` into the `u64` nanosecond range timers store.
pub(crate) fn saturating_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_table() {
        assert_eq!(TimeUnit::Nanoseconds.suffix(), "ns");
        assert_eq!(TimeUnit::Microseconds.suffix(), "us");
        assert_eq!(TimeUnit::Milliseconds.suffix(), "ms");
        assert_eq!(TimeUnit::Seconds.suffix(), "s");
        assert_eq!(TimeUnit::Minutes.suffix(), "min");
        assert_eq!(TimeUnit::Hours.suffix(), "h");
        assert_eq!(TimeUnit::Custom { nanos: 7 }.suffix(), "?");
    }

    #[test]
    fn test_from_nanos_recognizes_named_units() {
        assert_eq!(TimeUnit::from_nanos(1_000_000), TimeUnit::Milliseconds);
        assert_eq!(TimeUnit::from_nanos(3_600_000_000_000), TimeUnit::Hours);
        assert_eq!(
            TimeUnit::from_nanos(250),
            TimeUnit::Custom { nanos: 250 }
        );
    }

    #[test]
    fn test_duration_conversion() {
        assert_eq!(
            TimeUnit::Milliseconds.duration(1500).unwrap(),
            Duration::from_millis(1500)
        );
        assert_eq!(
            TimeUnit::Minutes.duration(2).unwrap(),
            Duration::from_secs(120)
        );
        assert!(matches!(
            TimeUnit::Hours.duration(u64::MAX),
            Err(TimerError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_format_nanos() {
        assert_eq!(TimeUnit::Milliseconds.format_nanos(500_000_000), "500ms");
        assert_eq!(TimeUnit::Seconds.format_nanos(0), "0s");
        assert_eq!(TimeUnit::Seconds.format_nanos(1_500_000_000), "1.500s");
        assert_eq!(TimeUnit::Custom { nanos: 10 }.format_nanos(30), "3?");
    }

    #[test]
    fn test_custom_zero_is_clamped() {
        assert_eq!(TimeUnit::Custom { nanos: 0 }.nanos(), 1);
    }

    #[test]
    fn test_parse_unit() {
        assert_eq!("min".parse::<TimeUnit>().unwrap(), TimeUnit::Minutes);
        assert_eq!(" US ".parse::<TimeUnit>().unwrap(), TimeUnit::Microseconds);
        assert!(matches!(
            "fortnight".parse::<TimeUnit>(),
            Err(TimerError::InvalidUnit(_))
        ));
    }

    #[test]
    fn test_saturating_nanos() {
        assert_eq!(saturating_nanos(Duration::from_millis(2)), 2_000_000);
        assert_eq!(saturating_nanos(Duration::MAX), u64::MAX);
    }
}
