//! Epoch Timestamps
//!
//! Instants in time as whole milliseconds since the Unix epoch.

use std::{fmt, str, time::SystemTime};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Unit applied when interpreting an integer epoch value.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Unit {
    #[default]
    Seconds,
    Milliseconds,
}

#[derive(thiserror::Error, Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The millisecond count would place the instant before the Unix epoch.
    #[error("value out of range: {0} is before the Unix epoch")]
    OutOfRange(i64),
    /// The input matched neither an integer literal nor a date-time grammar.
    #[error("invalid date-time: {0}")]
    Format(#[from] chrono::ParseError),
}

/// An instant in time, stored as whole milliseconds elapsed since the Unix
/// epoch (1970-01-01T00:00:00Z).
///
/// Values are immutable and never pre-epoch: every constructor rejects a
/// negative count with [`Error::OutOfRange`]. Equality, ordering, and hashing
/// derive from the count alone. [`sub`](EpochTime::sub) results are
/// constructed under the same rule, so the difference of two instants is
/// itself an `EpochTime` and cannot be negative.
#[derive(Copy, Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EpochTime {
    millis: i64,
}

impl EpochTime {
    /// Interpret `value` in the given unit. Fails if `value` is negative.
    pub fn new(value: i64, unit: Unit) -> Result<Self, Error> {
        if value < 0 {
            return Err(Error::OutOfRange(value));
        }
        let millis = match unit {
            Unit::Seconds => value * 1000,
            Unit::Milliseconds => value,
        };
        Ok(Self { millis })
    }

    pub fn from_secs(secs: i64) -> Result<Self, Error> {
        Self::new(secs, Unit::Seconds)
    }

    pub fn from_millis(millis: i64) -> Result<Self, Error> {
        Self::new(millis, Unit::Milliseconds)
    }

    /// Current system time, truncated to milliseconds.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap()
            .as_millis() as i64;
        Self { millis }
    }

    /// Whole milliseconds elapsed from the epoch to `datetime`, normalized to
    /// UTC and truncating sub-millisecond precision. Fails for pre-epoch
    /// instants.
    pub fn from_datetime<Tz: TimeZone>(datetime: DateTime<Tz>) -> Result<Self, Error> {
        Self::from_millis(datetime.with_timezone(&Utc).timestamp_millis())
    }

    /// The instant as a UTC calendar date-time.
    ///
    /// # Panics
    ///
    /// Panics if the count exceeds chrono's representable range (around the
    /// year 262143). Realistic epoch values are nowhere near it.
    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis)
            .expect("millisecond count within chrono's range")
    }

    pub fn as_millis(&self) -> i64 {
        self.millis
    }

    /// Whole seconds, truncating the millisecond remainder.
    pub fn as_secs(&self) -> i64 {
        self.millis / 1000
    }

    /// Parse either a bare integer epoch value, interpreted in `unit`, or a
    /// date-time string. The integer parse wins; date-time grammars are only
    /// tried once `s` fails to parse as an `i64`.
    pub fn parse(s: &str, unit: Unit) -> Result<Self, Error> {
        let s = s.trim();
        if let Ok(value) = s.parse::<i64>() {
            return Self::new(value, unit);
        }
        Self::from_datetime(parse_datetime(s)?)
    }

    /// `self + rhs`, treating both counts as millisecond values.
    pub fn add(self, rhs: Self) -> Result<Self, Error> {
        Self::from_millis(self.millis + rhs.millis)
    }

    /// Millisecond difference `self - rhs`. Fails with [`Error::OutOfRange`]
    /// when `rhs` is the later instant.
    pub fn sub(self, rhs: Self) -> Result<Self, Error> {
        Self::from_millis(self.millis - rhs.millis)
    }
}

/// RFC 3339 first; date-times without an offset are read as UTC, and a bare
/// date as midnight UTC. The RFC 3339 error is reported when nothing matches.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    let err = match DateTime::parse_from_rfc3339(s) {
        Ok(datetime) => return Ok(datetime.with_timezone(&Utc)),
        Err(err) => err,
    };
    for format in NAIVE_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(datetime.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(err)
}

impl TryFrom<DateTime<Utc>> for EpochTime {
    type Error = Error;
    fn try_from(datetime: DateTime<Utc>) -> Result<Self, Self::Error> {
        Self::from_datetime(datetime)
    }
}

impl From<EpochTime> for DateTime<Utc> {
    fn from(time: EpochTime) -> Self {
        time.to_datetime()
    }
}

impl str::FromStr for EpochTime {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, Unit::default())
    }
}

impl fmt::Display for EpochTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.millis)
    }
}

impl fmt::Debug for EpochTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}
