use std::fmt::{Display, Formatter};

use serde::ser::Error as SerError;
use serde::{Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};
use time_tz::{timezones, OffsetDateTimeExt, Tz};

use crate::ValidationError;

/// Bar timestamp carried in the exchange's UTC offset.
///
/// Serializes as `YYYY-MM-DDTHH:MM:SS±HH:MM`. The offset is always written
/// numerically, so UTC renders as `+00:00` rather than `Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarketTimestamp(OffsetDateTime);

impl MarketTimestamp {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        OffsetDateTime::parse(input, &Rfc3339)
            .map(Self)
            .map_err(|_| ValidationError::InvalidTimestamp {
                value: input.to_owned(),
            })
    }

    /// Same calendar day at 00:00:00 in the same offset.
    pub fn at_local_midnight(self) -> Self {
        Self(self.0.replace_time(Time::MIDNIGHT))
    }

    pub fn format_iso8601(self) -> Result<String, time::error::Format> {
        self.0.format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
        ))
    }
}

impl Display for MarketTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let formatted = self.format_iso8601().map_err(|_| std::fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl Serialize for MarketTimestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = self.format_iso8601().map_err(S::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

/// Clock an exchange's bars are stamped in.
///
/// A named IANA zone follows daylight saving per bar. The fixed offset is the
/// fallback when the provider omits the zone name or names one the bundled
/// tz database does not know.
#[derive(Clone, Copy)]
pub enum ExchangeZone {
    Named(&'static Tz),
    Fixed(UtcOffset),
}

impl ExchangeZone {
    pub fn resolve(name: Option<&str>, gmt_offset_seconds: i64) -> Result<Self, ValidationError> {
        match name.and_then(timezones::get_by_name) {
            Some(tz) => Ok(Self::Named(tz)),
            None => fixed_offset(gmt_offset_seconds).map(Self::Fixed),
        }
    }

    pub fn stamp(self, seconds: i64) -> Result<MarketTimestamp, ValidationError> {
        let instant = instant(seconds)?;
        Ok(MarketTimestamp(match self {
            Self::Named(tz) => instant.to_timezone(tz),
            Self::Fixed(offset) => instant.to_offset(offset),
        }))
    }

    /// Midnight of the bar's local calendar day, in the offset in force at
    /// that midnight.
    pub fn midnight(self, timestamp: MarketTimestamp) -> MarketTimestamp {
        match self {
            Self::Fixed(_) => timestamp.at_local_midnight(),
            Self::Named(tz) => {
                let local = timestamp.0.to_timezone(tz);
                let offset = local
                    .replace_time(Time::MIDNIGHT)
                    .to_timezone(tz)
                    .offset();
                MarketTimestamp(
                    PrimitiveDateTime::new(local.date(), Time::MIDNIGHT).assume_offset(offset),
                )
            }
        }
    }
}

fn fixed_offset(seconds: i64) -> Result<UtcOffset, ValidationError> {
    i32::try_from(seconds)
        .ok()
        .and_then(|secs| UtcOffset::from_whole_seconds(secs).ok())
        .ok_or(ValidationError::InvalidOffset { seconds })
}

fn instant(seconds: i64) -> Result<OffsetDateTime, ValidationError> {
    OffsetDateTime::from_unix_timestamp(seconds).map_err(|_| ValidationError::InvalidTimestamp {
        value: seconds.to_string(),
    })
}
