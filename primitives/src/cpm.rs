use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Empty CPM value")]
    Empty,
    #[error("CPM values cannot be negative")]
    Negative,
    #[error("Expected a plain decimal number")]
    InvalidDigit,
    #[error("Value does not fit in the micros range")]
    Overflow,
}

/// A CPM in millionths of the account currency unit, e.g. a `0.25` sheet
/// cell becomes `CpmMicros(250_000)` and serializes as the number `250000`.
///
/// Parsing reads the decimal text directly and floors it to micros, so
/// `"0.30"` is exactly `300_000` even though `0.30_f64 * 1e6` lands just
/// below `300000` and would floor to `299_999`.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CpmMicros(u64);

impl CpmMicros {
    /// Number of fraction digits a micros value resolves.
    pub const PRECISION: usize = 6;
    /// Micros per currency unit.
    pub const MULTIPLIER: u64 = 1_000_000;

    pub fn to_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for CpmMicros {
    /// From a raw micros count.
    fn from(micros: u64) -> Self {
        Self(micros)
    }
}

impl FromStr for CpmMicros {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::Empty);
        }
        if value.starts_with('-') {
            return Err(Error::Negative);
        }

        let (units, fraction) = match value.split_once('.') {
            Some((units, fraction)) => (units, fraction),
            None => (value, ""),
        };
        // a lone `.` carries no digits at all
        if units.is_empty() && fraction.is_empty() {
            return Err(Error::InvalidDigit);
        }

        let units: u64 = if units.is_empty() {
            0
        } else {
            units.parse().map_err(|_| Error::InvalidDigit)?
        };

        if !fraction.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(Error::InvalidDigit);
        }
        // fraction digits beyond the precision are cut off, i.e. floored
        let mut padded: String = fraction.chars().take(Self::PRECISION).collect();
        while padded.len() < Self::PRECISION {
            padded.push('0');
        }
        let micros_fraction: u64 = padded.parse().map_err(|_| Error::InvalidDigit)?;

        units
            .checked_mul(Self::MULTIPLIER)
            .and_then(|micros| micros.checked_add(micros_fraction))
            .map(Self)
            .ok_or(Error::Overflow)
    }
}

impl fmt::Display for CpmMicros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut string_value = self.0.to_string();
        let value_length = string_value.len();

        if value_length > Self::PRECISION {
            string_value.insert(value_length - Self::PRECISION, '.');

            f.write_str(&string_value)
        } else {
            write!(f, "0.{:0>6}", string_value)
        }
    }
}

impl fmt::Debug for CpmMicros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CpmMicros({})", self)
    }
}

impl Serialize for CpmMicros {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for CpmMicros {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MicrosVisitor)
    }
}

/// The API writes micros as JSON numbers but, being an int64 field, also
/// accepts and sometimes echoes them as strings.
struct MicrosVisitor;

impl<'de> de::Visitor<'de> for MicrosVisitor {
    type Value = CpmMicros;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("micros as a non-negative integer or a string of one")
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(CpmMicros(value))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        u64::try_from(value)
            .map(CpmMicros)
            .map_err(|_| E::custom(Error::Negative))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        value.parse::<u64>().map(CpmMicros).map_err(E::custom)
    }
}
