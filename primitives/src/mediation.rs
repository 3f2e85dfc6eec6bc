use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ad_unit::AdUnitId,
    cpm::CpmMicros,
    platform::{custom_event_label, AdFormat, Platform, CUSTOM_EVENT_AD_SOURCE_ID},
};

pub use line_key::LineKey;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Mediation group IDs cannot be empty")]
pub struct InvalidGroupId;

/// ID of a mediation group, a non-empty string of digits assigned by the API
/// on creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MediationGroupId(String);

impl MediationGroupId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MediationGroupId {
    type Error = InvalidGroupId;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        if id.trim().is_empty() {
            Err(InvalidGroupId)
        } else {
            Ok(Self(id))
        }
    }
}

impl From<MediationGroupId> for String {
    fn from(id: MediationGroupId) -> Self {
        id.0
    }
}

impl FromStr for MediationGroupId {
    type Err = InvalidGroupId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::try_from(value.to_string())
    }
}

impl fmt::Display for MediationGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ID of a mediation ad source, e.g. the AdMob Network or the custom event
/// ad source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdSourceId(String);

impl AdSourceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AdSourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for AdSourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

mod line_key {
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::{fmt, num::ParseIntError, str::FromStr};

    /// Key of a line in a group's line map, a signed integer carried as the
    /// JSON object key string.
    ///
    /// The API assigns positive keys to lines that exist; a request adds
    /// lines under negative keys (`-1`, `-2`, ...) of its own choosing, and
    /// the update mask of a PATCH lists exactly the keys it adds.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct LineKey(i64);

    impl LineKey {
        /// Key of the `ordinal`-th (1-based) line added by a single request.
        pub fn synthetic(ordinal: u64) -> Self {
            Self(-i64::try_from(ordinal).unwrap_or(i64::MAX))
        }

        /// Negative keys mark lines new to the group.
        pub fn is_new(self) -> bool {
            self.0 < 0
        }

        pub fn to_i64(self) -> i64 {
            self.0
        }

        /// The update mask path of this line, `mediationGroupLines["{key}"]`.
        pub fn field_path(self) -> String {
            format!("mediationGroupLines[\"{}\"]", self.0)
        }
    }

    impl From<i64> for LineKey {
        fn from(key: i64) -> Self {
            Self(key)
        }
    }

    impl FromStr for LineKey {
        type Err = ParseIntError;

        fn from_str(value: &str) -> Result<Self, Self::Err> {
            Ok(Self(value.parse()?))
        }
    }

    impl fmt::Display for LineKey {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl Serialize for LineKey {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.collect_str(&self.0)
        }
    }

    impl<'de> Deserialize<'de> for LineKey {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_str(KeyVisitor)
        }
    }

    struct KeyVisitor;

    impl<'de> de::Visitor<'de> for KeyVisitor {
        type Value = LineKey;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a line key string holding a signed integer")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            value.parse().map_err(E::custom)
        }
    }
}

/// How a line's CPM is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CpmMode {
    #[serde(rename = "CPM_MODE_UNSPECIFIED")]
    Unspecified,
    /// Reported by the third party network.
    Live,
    /// Fixed value carried in the line itself.
    Manual,
    Ano,
}

/// Serving state of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineState {
    #[serde(rename = "STATE_UNSPECIFIED")]
    Unspecified,
    Enabled,
    Disabled,
    Removed,
}

/// One ad source instance inside a mediation group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediationGroupLine {
    pub display_name: String,
    pub ad_source_id: AdSourceId,
    pub cpm_mode: CpmMode,
    /// Absent on `LIVE` lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpm_micros: Option<CpmMicros>,
    pub state: LineState,
    /// Full ad unit ID to the resource name of the mapping serving it.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub ad_unit_mappings: IndexMap<AdUnitId, String>,
}

impl MediationGroupLine {
    /// An enabled manual-CPM custom event line for one encoded price point,
    /// with no mappings attached yet.
    pub fn custom_event(encoded_price_point: &str, cpm: CpmMicros) -> Self {
        Self {
            display_name: custom_event_label(encoded_price_point),
            ad_source_id: CUSTOM_EVENT_AD_SOURCE_ID.into(),
            cpm_mode: CpmMode::Manual,
            cpm_micros: Some(cpm),
            state: LineState::Enabled,
            ad_unit_mappings: IndexMap::new(),
        }
    }
}

/// Scope a mediation group serves: one platform, one format and the chosen
/// ad units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Targeting {
    pub platform: Platform,
    pub format: AdFormat,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ad_unit_ids: Vec<AdUnitId>,
}

/// Mediation group resource.
///
/// Platform and format are fixed at creation. An update never touches
/// `targeting`, it only grows [`mediation_group_lines`] under fresh negative
/// keys.
///
/// [`mediation_group_lines`]: MediationGroup::mediation_group_lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediationGroup {
    /// Resource name, `accounts/{publisherId}/mediationGroups/{id}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mediation_group_id: Option<MediationGroupId>,
    pub display_name: String,
    pub targeting: Targeting,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub mediation_group_lines: IndexMap<LineKey, MediationGroupLine>,
}

impl MediationGroup {
    /// A create payload: no IDs yet, lines still to be filled in.
    pub fn new(display_name: String, targeting: Targeting) -> Self {
        Self {
            name: None,
            mediation_group_id: None,
            display_name,
            targeting,
            mediation_group_lines: IndexMap::new(),
        }
    }
}

/// PATCH body of a group update, kept to the one field the update mask
/// names so everything else on the group stays as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediationGroupPatch {
    pub mediation_group_lines: IndexMap<LineKey, MediationGroupLine>,
}

/// Ordered `updateMask` field paths of a PATCH request, one
/// `mediationGroupLines["{key}"]` entry per added line, rendered
/// comma-joined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateMask(Vec<String>);

impl UpdateMask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the field path of one line key.
    pub fn add_line(&mut self, key: LineKey) {
        self.0.push(key.field_path());
    }

    pub fn paths(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UpdateMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

impl FromIterator<LineKey> for UpdateMask {
    fn from_iter<I: IntoIterator<Item = LineKey>>(keys: I) -> Self {
        let mut mask = Self::new();
        for key in keys {
            mask.add_line(key);
        }

        mask
    }
}
