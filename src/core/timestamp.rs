//! Timestamp rendering for the `time` field
//!
//! All formats render UTC. The default, [`TimestampFormat::Micros`], produces
//! `YYYY-MM-DDThh:mm:ss.ffffff` without a zone suffix.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::sync::Arc;

/// Source of the current time; replaceable for deterministic output
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The system clock
pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// A clock frozen at `instant`, useful in tests and reproducible logs
pub fn fixed_clock(instant: DateTime<Utc>) -> Clock {
    Arc::new(move || instant)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampFormat {
    /// `2025-01-08T10:30:45.123456`
    #[default]
    Micros,
    /// `2025-01-08T10:30:45.123`
    Millis,
    /// `2025-01-08T10:30:45`
    Seconds,
    /// `2025-01-08T10:30:45.123456Z`
    Rfc3339,
}

impl TimestampFormat {
    /// Write `datetime` into `w` without an intermediate `String`
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W, datetime: &DateTime<Utc>) -> io::Result<()> {
        match self {
            TimestampFormat::Micros => write!(w, "{}", datetime.format("%Y-%m-%dT%H:%M:%S%.6f")),
            TimestampFormat::Millis => write!(w, "{}", datetime.format("%Y-%m-%dT%H:%M:%S%.3f")),
            TimestampFormat::Seconds => write!(w, "{}", datetime.format("%Y-%m-%dT%H:%M:%S")),
            TimestampFormat::Rfc3339 => w.write_all(
                datetime
                    .to_rfc3339_opts(SecondsFormat::Micros, true)
                    .as_bytes(),
            ),
        }
    }

    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        let mut out = Vec::with_capacity(32);
        // chrono's formatter cannot fail for these fixed patterns
        let _ = self.write_to(&mut out, datetime);
        String::from_utf8_lossy(&out).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_micros_format() {
        assert_eq!(
            TimestampFormat::Micros.format(&fixed_datetime()),
            "2025-01-08T10:30:45.123456"
        );
    }

    #[test]
    fn test_other_formats() {
        let dt = fixed_datetime();
        assert_eq!(TimestampFormat::Millis.format(&dt), "2025-01-08T10:30:45.123");
        assert_eq!(TimestampFormat::Seconds.format(&dt), "2025-01-08T10:30:45");
        assert_eq!(
            TimestampFormat::Rfc3339.format(&dt),
            "2025-01-08T10:30:45.123456Z"
        );
    }

    #[test]
    fn test_micros_pads_zero_fraction() {
        let dt = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).single().unwrap();
        assert_eq!(TimestampFormat::Micros.format(&dt), "2024-12-31T23:59:59.000000");
    }

    #[test]
    fn test_fixed_clock() {
        let clock = fixed_clock(fixed_datetime());
        assert_eq!(clock(), fixed_datetime());
        assert_eq!(clock(), clock());
    }

    #[test]
    fn test_default_is_micros() {
        assert_eq!(TimestampFormat::default(), TimestampFormat::Micros);
        let json = serde_json::to_string(&TimestampFormat::Rfc3339).unwrap();
        assert_eq!(json, "\"rfc3339\"");
    }
}
