use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Prefix of every publisher ID.
pub const PUBLISHER_PREFIX: &str = "pub-";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Publisher IDs start with a `pub-` prefix")]
    ExpectedPrefix,
    #[error("Expected 16 digits after the `pub-` prefix")]
    Length,
    #[error("Expected only digits after the `pub-` prefix")]
    InvalidDigit,
}

/// Publisher ID of an AdMob account, e.g. `pub-9876543210987654`:
/// the `pub-` prefix followed by 16 digits.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublisherId([u8; 16]);

impl PublisherId {
    /// The 16 digits following the `pub-` prefix.
    pub fn digits(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for PublisherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // the inner bytes are always ASCII digits
        write!(
            f,
            "{}{}",
            PUBLISHER_PREFIX,
            String::from_utf8_lossy(&self.0)
        )
    }
}

impl fmt::Debug for PublisherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublisherId({})", self)
    }
}

impl FromStr for PublisherId {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let digits = value
            .strip_prefix(PUBLISHER_PREFIX)
            .ok_or(Error::ExpectedPrefix)?;

        if !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(Error::InvalidDigit);
        }
        if digits.len() != 16 {
            return Err(Error::Length);
        }

        let mut id = [0_u8; 16];
        id.copy_from_slice(digits.as_bytes());

        Ok(Self(id))
    }
}

impl TryFrom<&str> for PublisherId {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for PublisherId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for PublisherId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PublisherId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(PublisherIdVisitor)
    }
}

struct PublisherIdVisitor;

impl<'de> de::Visitor<'de> for PublisherIdVisitor {
    type Value = PublisherId;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a `pub-` prefixed publisher ID string")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        value.parse().map_err(E::custom)
    }
}

/// Publisher account as returned by `GET /accounts/{publisherId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Resource name, `accounts/{publisherId}`.
    pub name: String,
    pub publisher_id: PublisherId,
    pub currency_code: String,
    pub reporting_time_zone: String,
}
