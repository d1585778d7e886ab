//! UTC datetime utilities without timezone dependencies.
//!
//! Provides a lightweight `DateTimeUtc` struct used for `lastmod` values
//! and for computing content age.
//!
//! # Accepted input
//!
//! - `YYYY-MM-DD`
//! - `YYYY-MM-DDTHH:MM:SS` followed by `Z`, `+HH:MM`, `-HH:MM` or nothing
//! - `YYYY-MM-DD HH:MM:SS` (database style, treated as UTC)
//!
//! Fractional seconds are accepted and dropped. Offsets are folded into UTC.
//!
//! # Examples
//!
//! ```ignore
//! let dt = DateTimeUtc::parse("2024-06-15T14:30:45+02:00").unwrap();
//! assert_eq!(dt.to_rfc3339(), "2024-06-15T12:30:45+00:00");
//! ```

use anyhow::{Result, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const SECS_PER_DAY: i64 = 86_400;

/// UTC datetime without timezone complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTimeUtc {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeUtc {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Parse a date or datetime (see module docs for accepted forms).
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.trim().as_bytes();

        // Minimum: "YYYY-MM-DD" (10 chars)
        if bytes.len() < 10 {
            return None;
        }

        let year = parse_u16(&bytes[0..4])?;
        if bytes[4] != b'-' || bytes[7] != b'-' {
            return None;
        }
        let month = parse_u8(&bytes[5..7])?;
        let day = parse_u8(&bytes[8..10])?;

        if bytes.len() == 10 {
            let dt = Self::from_ymd(year, month, day);
            dt.validate().ok()?;
            return Some(dt);
        }

        // Time part: "THH:MM:SS" or " HH:MM:SS"
        if bytes.len() < 19 || !matches!(bytes[10], b'T' | b't' | b' ') {
            return None;
        }
        if bytes[13] != b':' || bytes[16] != b':' {
            return None;
        }
        let hour = parse_u8(&bytes[11..13])?;
        let minute = parse_u8(&bytes[14..16])?;
        let second = parse_u8(&bytes[17..19])?;

        let dt = Self::new(year, month, day, hour, minute, second);
        dt.validate().ok()?;

        let mut rest = &bytes[19..];
        if let Some(frac) = rest.strip_prefix(b".") {
            let digits = frac.iter().take_while(|b| b.is_ascii_digit()).count();
            if digits == 0 {
                return None;
            }
            rest = &frac[digits..];
        }

        let offset_secs = parse_offset(rest)?;
        if offset_secs == 0 {
            return Some(dt);
        }
        Self::from_unix_secs(dt.to_unix_secs() - offset_secs)
    }

    pub fn validate(&self) -> Result<()> {
        let Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        } = *self;

        if !(1..=12).contains(&month) {
            bail!("month is invalid: {month}");
        }

        let max_days = Self::days_in_month(year, month);
        if day == 0 || day > max_days {
            bail!("day is invalid: {day}");
        }
        if hour > 23 {
            bail!("hour is invalid: {hour}");
        }
        if minute > 59 {
            bail!("minute is invalid: {minute}");
        }
        if second > 59 {
            bail!("second is invalid: {second}");
        }

        Ok(())
    }

    #[inline]
    #[allow(clippy::manual_is_multiple_of)] // Manual impl for const fn
    const fn is_leap_year(year: u16) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    #[inline]
    const fn days_in_month(year: u16, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if Self::is_leap_year(year) => 29,
            2 => 28,
            _ => 0,
        }
    }

    /// Seconds since the Unix epoch.
    pub fn to_unix_secs(self) -> i64 {
        let days = days_from_civil(
            i64::from(self.year),
            i64::from(self.month),
            i64::from(self.day),
        );
        days * SECS_PER_DAY
            + i64::from(self.hour) * 3600
            + i64::from(self.minute) * 60
            + i64::from(self.second)
    }

    /// Build from seconds since the Unix epoch.
    ///
    /// Returns `None` outside years 0..=9999.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_unix_secs(secs: i64) -> Option<Self> {
        let days = secs.div_euclid(SECS_PER_DAY);
        let rem = secs.rem_euclid(SECS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        if !(0..=9999).contains(&year) {
            return None;
        }

        Some(Self::new(
            year as u16,
            month as u8,
            day as u8,
            (rem / 3600) as u8,
            ((rem / 60) % 60) as u8,
            (rem % 60) as u8,
        ))
    }

    /// Fractional days elapsed from `self` until `later`.
    ///
    /// Negative when `later` is before `self`.
    #[allow(clippy::cast_precision_loss)]
    pub fn days_until(self, later: Self) -> f64 {
        (later.to_unix_secs() - self.to_unix_secs()) as f64 / SECS_PER_DAY as f64
    }

    /// Format as W3C datetime, the form sitemaps expect for `lastmod`.
    ///
    /// Returns: `YYYY-MM-DDTHH:MM:SS+00:00`
    pub fn to_rfc3339(self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}+00:00",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

impl fmt::Display for DateTimeUtc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl Serialize for DateTimeUtc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for DateTimeUtc {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid datetime `{raw}`")))
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = (if year >= 0 { year } else { year - 399 }) / 400;
    let yoe = year - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Inverse of [`days_from_civil`].
fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Parse a trailing UTC offset into seconds east of UTC.
fn parse_offset(bytes: &[u8]) -> Option<i64> {
    match bytes {
        [] | [b'Z'] | [b'z'] => Some(0),
        [sign @ (b'+' | b'-'), rest @ ..] => {
            let (hh, mm) = match rest {
                [h1, h2, b':', m1, m2] => ([*h1, *h2], [*m1, *m2]),
                [h1, h2, m1, m2] => ([*h1, *h2], [*m1, *m2]),
                _ => return None,
            };
            let hours = i64::from(parse_u8(&hh)?);
            let minutes = i64::from(parse_u8(&mm)?);
            if hours > 23 || minutes > 59 {
                return None;
            }
            let secs = hours * 3600 + minutes * 60;
            Some(if *sign == b'-' { -secs } else { secs })
        }
        _ => None,
    }
}

/// Parse 2-digit ASCII number
#[inline]
fn parse_u8(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = bytes[0].wrapping_sub(b'0');
    let d2 = bytes[1].wrapping_sub(b'0');
    if d1 > 9 || d2 > 9 {
        return None;
    }
    Some(d1 * 10 + d2)
}

/// Parse 4-digit ASCII number
#[inline]
fn parse_u16(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 4 {
        return None;
    }
    let mut result = 0u16;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        result = result * 10 + u16::from(d);
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_only() {
        let dt = DateTimeUtc::parse("2024-06-15").unwrap();
        assert_eq!(dt, DateTimeUtc::from_ymd(2024, 6, 15));
    }

    #[test]
    fn test_parse_utc_variants() {
        let expected = DateTimeUtc::new(2024, 6, 15, 14, 30, 45);
        assert_eq!(DateTimeUtc::parse("2024-06-15T14:30:45Z"), Some(expected));
        assert_eq!(DateTimeUtc::parse("2024-06-15T14:30:45+00:00"), Some(expected));
        assert_eq!(DateTimeUtc::parse("2024-06-15 14:30:45"), Some(expected));
        assert_eq!(DateTimeUtc::parse("2024-06-15T14:30:45.123Z"), Some(expected));
    }

    #[test]
    fn test_parse_offset_folds_into_utc() {
        assert_eq!(
            DateTimeUtc::parse("2024-06-15T14:30:45+02:00"),
            Some(DateTimeUtc::new(2024, 6, 15, 12, 30, 45))
        );
        // Crossing midnight backwards into the previous month
        assert_eq!(
            DateTimeUtc::parse("2024-03-01T01:00:00+0200"),
            Some(DateTimeUtc::new(2024, 2, 29, 23, 0, 0))
        );
        assert_eq!(
            DateTimeUtc::parse("2024-12-31T23:00:00-01:30"),
            Some(DateTimeUtc::new(2025, 1, 1, 0, 30, 0))
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(DateTimeUtc::parse(""), None);
        assert_eq!(DateTimeUtc::parse("2024/06/15"), None);
        assert_eq!(DateTimeUtc::parse("2024-13-01"), None);
        assert_eq!(DateTimeUtc::parse("2023-02-29"), None);
        assert_eq!(DateTimeUtc::parse("2024-06-15T25:00:00Z"), None);
        assert_eq!(DateTimeUtc::parse("2024-06-15T12:00:00+5"), None);
        assert_eq!(DateTimeUtc::parse("2024-06-15T12:00:00."), None);
    }

    #[test]
    fn test_validate_leap_year() {
        assert!(DateTimeUtc::new(2024, 2, 29, 12, 0, 0).validate().is_ok());
        assert!(DateTimeUtc::new(2000, 2, 29, 12, 0, 0).validate().is_ok());
        assert!(DateTimeUtc::new(2023, 2, 29, 12, 0, 0).validate().is_err());
        assert!(DateTimeUtc::new(1900, 2, 29, 12, 0, 0).validate().is_err());
    }

    #[test]
    fn test_unix_epoch() {
        let epoch = DateTimeUtc::new(1970, 1, 1, 0, 0, 0);
        assert_eq!(epoch.to_unix_secs(), 0);
        assert_eq!(DateTimeUtc::from_unix_secs(0), Some(epoch));
    }

    #[test]
    fn test_unix_known_value() {
        let dt = DateTimeUtc::new(2024, 6, 15, 14, 30, 45);
        assert_eq!(dt.to_unix_secs(), 1_718_461_845);
        assert_eq!(DateTimeUtc::from_unix_secs(1_718_461_845), Some(dt));
    }

    #[test]
    fn test_unix_before_epoch() {
        let dt = DateTimeUtc::new(1969, 12, 31, 23, 59, 59);
        assert_eq!(dt.to_unix_secs(), -1);
        assert_eq!(DateTimeUtc::from_unix_secs(-1), Some(dt));
    }

    #[test]
    fn test_days_until() {
        let start = DateTimeUtc::from_ymd(2024, 1, 1);
        let end = DateTimeUtc::from_ymd(2024, 1, 31);
        assert!((start.days_until(end) - 30.0).abs() < f64::EPSILON);
        assert!((end.days_until(start) + 30.0).abs() < f64::EPSILON);

        let half = DateTimeUtc::new(2024, 1, 1, 12, 0, 0);
        assert!((start.days_until(half) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_to_rfc3339() {
        let dt = DateTimeUtc::new(2024, 6, 5, 4, 3, 2);
        assert_eq!(dt.to_rfc3339(), "2024-06-05T04:03:02+00:00");
        assert_eq!(dt.to_string(), dt.to_rfc3339());
    }

    #[test]
    fn test_serde_round_trip() {
        let dt = DateTimeUtc::new(2024, 6, 15, 14, 30, 45);
        let json = serde_json::to_string(&dt).unwrap();
        assert_eq!(json, "\"2024-06-15T14:30:45+00:00\"");
        let back: DateTimeUtc = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dt);

        let err = serde_json::from_str::<DateTimeUtc>("\"yesterday\"");
        assert!(err.is_err());
    }
}
