//! Epoch Time
//!
//! A single value type, [`EpochTime`], representing an instant in time as
//! milliseconds since the Unix epoch, with conversions to and from calendar
//! date-times, string parsing, and millisecond-difference arithmetic.

pub use crate::timestamp::*;

pub mod timestamp;

impl serde::Serialize for EpochTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_millis())
    }
}

impl<'de> serde::Deserialize<'de> for EpochTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let millis: i64 = serde::Deserialize::deserialize(deserializer)?;
        EpochTime::from_millis(millis).map_err(serde::de::Error::custom)
    }
}
