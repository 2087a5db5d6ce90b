//! Timestamp units.
//!
//! The remote service stores instants as nanoseconds since the Unix epoch;
//! all local date arithmetic runs on milliseconds. The two units are kept as
//! distinct types so a nanosecond value can never flow into millisecond math
//! without an explicit conversion.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Exact conversion factor between the two units.
pub const NANOS_PER_MILLI: i128 = 1_000_000;

/// Milliseconds in a whole day.
pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// An instant in the storage unit: nanoseconds since the Unix epoch.
///
/// Wide integer so nanosecond-resolution values from the service never
/// round through floating point.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Nanos(pub i128);

impl Nanos {
    /// Narrow to the computation unit. Truncates any sub-millisecond
    /// remainder toward zero; this direction is lossy.
    pub fn to_millis(self) -> Millis {
        Millis((self.0 / NANOS_PER_MILLI) as i64)
    }
}

/// An instant in the computation unit: milliseconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Millis(pub i64);

impl Millis {
    /// Widen to the storage unit. Exact multiplication, never lossy.
    pub fn to_nanos(self) -> Nanos {
        Nanos(self.0 as i128 * NANOS_PER_MILLI)
    }

    /// The current wall-clock instant.
    pub fn now() -> Self {
        Millis(Utc::now().timestamp_millis())
    }

    /// Interpret as a UTC datetime. `None` for values outside chrono's
    /// representable range.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.0).single()
    }
}

impl From<DateTime<Utc>> for Millis {
    fn from(dt: DateTime<Utc>) -> Self {
        Millis(dt.timestamp_millis())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_to_nanos_round_trip() {
        for ms in [0i64, 1, 999, 1_000_000, 1_704_067_200_000] {
            let ms = Millis(ms);
            assert_eq!(ms.to_nanos().to_millis(), ms);
        }
    }

    #[test]
    fn test_nanos_to_millis_truncates() {
        // Sub-millisecond remainders are dropped, so this direction does
        // not round-trip.
        assert_eq!(Nanos(1_234_567).to_millis(), Millis(1));
        assert_eq!(Nanos(999_999).to_millis(), Millis(0));
        assert_eq!(Nanos(1_234_567).to_millis().to_nanos(), Nanos(1_000_000));
    }

    #[test]
    fn test_nanosecond_resolution_is_exact() {
        // A nanosecond-resolution instant survives the widening conversion
        // without any floating-point rounding.
        let ms = Millis(1_704_067_200_123);
        assert_eq!(ms.to_nanos(), Nanos(1_704_067_200_123_000_000));
    }

    #[test]
    fn test_to_datetime() {
        let dt = Millis(1_704_067_200_000).to_datetime().unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }
}
