use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::account::{self, PublisherId};

/// Prefix of every full ad unit ID.
pub const AD_UNIT_PREFIX: &str = "ca-app-";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Ad unit ID fragments are 1 or more digits")]
    InvalidFragment,
    #[error("Full ad unit IDs start with a `ca-app-` prefix")]
    ExpectedPrefix,
    #[error("Expected `{{publisher}}/{{fragment}}` after the `ca-app-` prefix")]
    MissingFragment,
    #[error("Publisher ID: {0}")]
    PublisherId(#[from] account::Error),
}

/// The trailing digits of a full ad unit ID, i.e. the `{adUnitId}` resource
/// path segment of `accounts/{publisherId}/adUnits/{adUnitId}`.
///
/// The AdMob frontend labels exactly these digits the "ad unit ID" when an
/// ad unit is created, which is why callers pass fragments around and the
/// publisher prefix gets attached on demand.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AdUnitIdFragment(String);

impl AdUnitIdFragment {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdUnitIdFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AdUnitIdFragment {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(Error::InvalidFragment);
        }

        Ok(Self(value.to_string()))
    }
}

impl TryFrom<&str> for AdUnitIdFragment {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for AdUnitIdFragment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AdUnitIdFragment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(FragmentVisitor)
    }
}

struct FragmentVisitor;

impl<'de> de::Visitor<'de> for FragmentVisitor {
    type Value = AdUnitIdFragment;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an ad unit ID fragment string of digits")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        value.parse().map_err(E::custom)
    }
}

/// Full ad unit ID, `ca-app-{publisherId}/{fragment}`.
///
/// This is the form apps embed and the form mediation group targeting and
/// line mappings refer to ad units by.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AdUnitId {
    publisher: PublisherId,
    fragment: AdUnitIdFragment,
}

impl AdUnitId {
    pub fn new(publisher: PublisherId, fragment: AdUnitIdFragment) -> Self {
        Self { publisher, fragment }
    }

    pub fn publisher(&self) -> PublisherId {
        self.publisher
    }

    pub fn fragment(&self) -> &AdUnitIdFragment {
        &self.fragment
    }
}

impl fmt::Display for AdUnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", AD_UNIT_PREFIX, self.publisher, self.fragment)
    }
}

impl fmt::Debug for AdUnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AdUnitId({})", self)
    }
}

impl FromStr for AdUnitId {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let rest = value
            .strip_prefix(AD_UNIT_PREFIX)
            .ok_or(Error::ExpectedPrefix)?;
        let (publisher, fragment) = rest.split_once('/').ok_or(Error::MissingFragment)?;

        Ok(Self {
            publisher: publisher.parse()?,
            fragment: fragment.parse()?,
        })
    }
}

impl Serialize for AdUnitId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AdUnitId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(AdUnitIdVisitor)
    }
}

struct AdUnitIdVisitor;

impl<'de> de::Visitor<'de> for AdUnitIdVisitor {
    type Value = AdUnitId;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a full `ca-app-` prefixed ad unit ID string")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        value.parse().map_err(E::custom)
    }
}

/// Ad unit as returned by `GET /accounts/{publisherId}/adUnits`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdUnit {
    /// Resource name, `accounts/{publisherId}/adUnits/{fragment}`.
    pub name: String,
    pub ad_unit_id: AdUnitId,
    pub app_id: String,
    pub display_name: String,
    /// Listings also carry formats no custom event line targets,
    /// e.g. `REWARDED`, so this stays an open string.
    pub ad_format: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ad_types: Vec<String>,
}
