//! Time source for `lastmod` values and content age.

use crate::utils::date::DateTimeUtc;
use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock {
    fn now(&self) -> DateTimeUtc;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTimeUtc {
        (**self).now()
    }
}

/// Wall clock (UTC).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[allow(clippy::cast_possible_wrap)] // Seconds since epoch fit in i64 for ~292 billion years
    fn now(&self) -> DateTimeUtc {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        DateTimeUtc::from_unix_secs(secs).unwrap_or(DateTimeUtc::from_ymd(1970, 1, 1))
    }
}

/// Clock pinned to one instant.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTimeUtc);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTimeUtc {
        self.0
    }
}
