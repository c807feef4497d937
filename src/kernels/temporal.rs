// In: src/kernels/temporal.rs

//! The temporal codec.
//!
//! All datetimes and durations pass through a signed 64-bit nanosecond
//! representation. From there they are either scaled to an epoch integer at the
//! configured unit or rendered as ISO-8601 text at the unit's precision.
//! `i64::MIN` is the missing-value sentinel and always encodes as null.

use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use std::borrow::Cow;

use crate::config::{TemporalConfig, TimeUnit};
use crate::error::FrameJsonError;
use crate::sink::JsonScalar;

/// The missing temporal value.
pub const NAT: i64 = i64::MIN;

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: i64 = 24 * NANOS_PER_HOUR;

//==================================================================================
// 1. Nanosecond conversions
//==================================================================================

/// Scales a nanosecond count to `unit`, truncating toward zero.
pub fn scale_to_unit(value_ns: i64, unit: TimeUnit) -> i64 {
    value_ns / unit.nanos_per_unit()
}

/// Nanoseconds since the epoch for a naive (UTC) datetime.
pub fn naive_to_ns(dt: &NaiveDateTime) -> Result<i64, FrameJsonError> {
    dt.and_utc().timestamp_nanos_opt().ok_or_else(|| {
        FrameJsonError::Temporal(format!(
            "{} is outside the nanosecond-representable range",
            dt
        ))
    })
}

/// Epoch integer at `unit` for a structured datetime.
pub fn to_epoch(dt: &NaiveDateTime, unit: TimeUnit) -> Result<i64, FrameJsonError> {
    Ok(scale_to_unit(naive_to_ns(dt)?, unit))
}

/// Nanosecond count of a duration. Durations beyond roughly 292 years do not fit.
pub fn duration_to_ns(duration: &TimeDelta) -> Result<i64, FrameJsonError> {
    duration.num_nanoseconds().ok_or_else(|| {
        FrameJsonError::Temporal(format!(
            "duration {} does not fit in 64-bit nanoseconds",
            duration
        ))
    })
}

//==================================================================================
// 2. ISO-8601 rendering
//==================================================================================

/// `YYYY-MM-DDTHH:MM:SS[.fff]Z` at the precision of `unit`.
pub fn naive_to_iso(dt: &NaiveDateTime, unit: TimeUnit) -> String {
    let pattern = match unit {
        TimeUnit::Second => "%Y-%m-%dT%H:%M:%SZ",
        TimeUnit::Millisecond => "%Y-%m-%dT%H:%M:%S%.3fZ",
        TimeUnit::Microsecond => "%Y-%m-%dT%H:%M:%S%.6fZ",
        TimeUnit::Nanosecond => "%Y-%m-%dT%H:%M:%S%.9fZ",
    };
    dt.format(pattern).to_string()
}

/// ISO-8601 text for a nanosecond epoch value.
pub fn to_iso(value_ns: i64, unit: TimeUnit) -> Result<String, FrameJsonError> {
    let secs = value_ns.div_euclid(NANOS_PER_SECOND);
    let nanos = value_ns.rem_euclid(NANOS_PER_SECOND) as u32;
    let dt = DateTime::from_timestamp(secs, nanos).ok_or_else(|| {
        FrameJsonError::Temporal(format!(
            "Could not convert datetime value {} to string",
            value_ns
        ))
    })?;
    Ok(naive_to_iso(&dt.naive_utc(), unit))
}

/// `HH:MM:SS`, with microseconds appended when non-zero.
pub fn time_to_iso(time: &NaiveTime) -> String {
    if time.nanosecond() == 0 {
        time.format("%H:%M:%S").to_string()
    } else {
        time.format("%H:%M:%S%.6f").to_string()
    }
}

/// Splits an absolute nanosecond duration into
/// `(days, hours, minutes, seconds, sub-second nanos)`.
fn duration_components(abs_ns: u64) -> (u64, u64, u64, u64, u64) {
    let ns = abs_ns;
    let days = ns / NANOS_PER_DAY as u64;
    let rem = ns % NANOS_PER_DAY as u64;
    let hours = rem / NANOS_PER_HOUR as u64;
    let rem = rem % NANOS_PER_HOUR as u64;
    let minutes = rem / NANOS_PER_MINUTE as u64;
    let rem = rem % NANOS_PER_MINUTE as u64;
    let seconds = rem / NANOS_PER_SECOND as u64;
    (days, hours, minutes, seconds, rem % NANOS_PER_SECOND as u64)
}

/// `P{d}DT{h}H{m}M{s}[.f...]S`; the nine-digit fraction is written with its
/// trailing zeros trimmed, and dropped entirely when zero.
pub fn duration_to_iso(value_ns: i64) -> String {
    let sign = if value_ns < 0 { "-" } else { "" };
    let (days, hours, minutes, seconds, frac) = duration_components(value_ns.unsigned_abs());
    let fraction = if frac == 0 {
        String::new()
    } else {
        let digits = format!("{:09}", frac);
        format!(".{}", digits.trim_end_matches('0'))
    };
    format!(
        "{}P{}DT{}H{}M{}{}S",
        sign, days, hours, minutes, seconds, fraction
    )
}

/// `{d} days HH:MM:SS[.ffffff|.fffffffff]`. Negative durations borrow a whole
/// day, so `-1ns` renders as `-1 days +23:59:59.999999999`.
pub fn duration_text(value_ns: i64) -> String {
    let days = value_ns.div_euclid(NANOS_PER_DAY);
    let rem = value_ns.rem_euclid(NANOS_PER_DAY) as u64;
    let (_, hours, minutes, seconds, frac) = duration_components(rem);
    let fraction = if frac % 1_000 != 0 {
        format!(".{:09}", frac)
    } else if frac != 0 {
        format!(".{:06}", frac / 1_000)
    } else {
        String::new()
    };
    let sign = if days < 0 { "+" } else { "" };
    format!(
        "{} days {}{:02}:{:02}:{:02}{}",
        days, sign, hours, minutes, seconds, fraction
    )
}

//==================================================================================
// 3. Encoding to scalars
//==================================================================================

/// A nanosecond epoch value as an ISO string or a scaled integer.
pub fn encode_datetime_ns(
    value_ns: i64,
    config: TemporalConfig,
) -> Result<JsonScalar<'static>, FrameJsonError> {
    if value_ns == NAT {
        return Ok(JsonScalar::Null);
    }
    if config.iso {
        Ok(JsonScalar::Str(Cow::Owned(to_iso(value_ns, config.unit)?)))
    } else {
        Ok(JsonScalar::Int(scale_to_unit(value_ns, config.unit)))
    }
}

/// A structured datetime as an ISO string or a scaled integer.
pub fn encode_naive(
    dt: &NaiveDateTime,
    config: TemporalConfig,
) -> Result<JsonScalar<'static>, FrameJsonError> {
    if config.iso {
        Ok(JsonScalar::Str(Cow::Owned(naive_to_iso(dt, config.unit))))
    } else {
        Ok(JsonScalar::Int(to_epoch(dt, config.unit)?))
    }
}

/// A nanosecond duration as an integer at `unit`. Durations are integers even
/// when ISO dates are requested.
pub fn encode_duration_ns(value_ns: i64, unit: TimeUnit) -> JsonScalar<'static> {
    if value_ns == NAT {
        return JsonScalar::Null;
    }
    match scale_to_unit(value_ns, unit) {
        NAT => JsonScalar::Null,
        scaled => JsonScalar::Int(scaled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const JAN_1_2013_NS: i64 = 1_356_998_400_000_000_000;

    #[test]
    fn test_scale_to_unit_truncates() {
        assert_eq!(scale_to_unit(1_999_999_999, TimeUnit::Second), 1);
        assert_eq!(scale_to_unit(-1_500_000, TimeUnit::Millisecond), -1);
        assert_eq!(scale_to_unit(42, TimeUnit::Nanosecond), 42);
    }

    #[test]
    fn test_iso_precision_follows_unit() {
        let value = JAN_1_2013_NS + 123_456_789;
        assert_eq!(to_iso(value, TimeUnit::Second).unwrap(), "2013-01-01T00:00:00Z");
        assert_eq!(
            to_iso(value, TimeUnit::Millisecond).unwrap(),
            "2013-01-01T00:00:00.123Z"
        );
        assert_eq!(
            to_iso(value, TimeUnit::Microsecond).unwrap(),
            "2013-01-01T00:00:00.123456Z"
        );
        assert_eq!(
            to_iso(value, TimeUnit::Nanosecond).unwrap(),
            "2013-01-01T00:00:00.123456789Z"
        );
    }

    #[test]
    fn test_iso_before_epoch() {
        assert_eq!(
            to_iso(-1, TimeUnit::Nanosecond).unwrap(),
            "1969-12-31T23:59:59.999999999Z"
        );
    }

    #[test]
    fn test_sentinel_is_null_in_every_mode() {
        for unit in [
            TimeUnit::Second,
            TimeUnit::Millisecond,
            TimeUnit::Microsecond,
            TimeUnit::Nanosecond,
        ] {
            for iso in [false, true] {
                let config = TemporalConfig { unit, iso };
                assert_eq!(encode_datetime_ns(NAT, config).unwrap(), JsonScalar::Null);
            }
            assert_eq!(encode_duration_ns(NAT, unit), JsonScalar::Null);
        }
    }

    #[test]
    fn test_epoch_of_structured_datetime() {
        let dt = NaiveDate::from_ymd_opt(2013, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(to_epoch(&dt, TimeUnit::Millisecond).unwrap(), 1_356_998_400_000);
        assert_eq!(to_epoch(&dt, TimeUnit::Second).unwrap(), 1_356_998_400);
    }

    #[test]
    fn test_epoch_out_of_range_is_error() {
        let dt = NaiveDate::from_ymd_opt(3000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(matches!(
            to_epoch(&dt, TimeUnit::Second),
            Err(FrameJsonError::Temporal(_))
        ));
        // ISO rendering does not pass through nanoseconds.
        assert_eq!(naive_to_iso(&dt, TimeUnit::Second), "3000-01-01T00:00:00Z");
    }

    #[test]
    fn test_duration_iso() {
        let value = NANOS_PER_DAY + 2 * NANOS_PER_HOUR + 3 * NANOS_PER_MINUTE + 4 * NANOS_PER_SECOND;
        assert_eq!(duration_to_iso(value), "P1DT2H3M4S");
        assert_eq!(duration_to_iso(value + 500_000_000), "P1DT2H3M4.5S");
        assert_eq!(duration_to_iso(4_500_000_000), "P0DT0H0M4.5S");
        assert_eq!(duration_to_iso(1_250_000), "P0DT0H0M0.00125S");
        assert_eq!(duration_to_iso(1_000_000), "P0DT0H0M0.001S");
        assert_eq!(duration_to_iso(1), "P0DT0H0M0.000000001S");
        assert_eq!(duration_to_iso(-NANOS_PER_DAY), "-P1DT0H0M0S");
    }

    #[test]
    fn test_duration_text() {
        assert_eq!(duration_text(NANOS_PER_DAY + NANOS_PER_SECOND), "1 days 00:00:01");
        assert_eq!(duration_text(1_500_000), "0 days 00:00:00.001500");
        assert_eq!(duration_text(-1), "-1 days +23:59:59.999999999");
    }

    #[test]
    fn test_duration_scaled_and_overflow() {
        assert_eq!(
            encode_duration_ns(90 * NANOS_PER_SECOND, TimeUnit::Second),
            JsonScalar::Int(90)
        );
        let huge = TimeDelta::try_days(200_000).unwrap();
        assert!(matches!(
            duration_to_ns(&huge),
            Err(FrameJsonError::Temporal(_))
        ));
    }

    #[test]
    fn test_time_iso() {
        let t = NaiveTime::from_hms_opt(13, 5, 9).unwrap();
        assert_eq!(time_to_iso(&t), "13:05:09");
        let t = NaiveTime::from_hms_micro_opt(13, 5, 9, 250).unwrap();
        assert_eq!(time_to_iso(&t), "13:05:09.000250");
    }
}
