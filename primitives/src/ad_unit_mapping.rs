use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::platform::{custom_event_label, Platform};

/// ID of a mediation adapter under an ad source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdapterId(String);

impl AdapterId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AdapterId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for AdapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Adapter settings of one ad unit, created with
/// `POST /accounts/{publisherId}/adUnits/{fragment}/adUnitMappings`.
///
/// The response carries the resource [`name`] which a mediation group line
/// then references per ad unit.
///
/// [`name`]: AdUnitMapping::name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdUnitMapping {
    /// Resource name, assigned by the API on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub display_name: String,
    pub adapter_id: AdapterId,
    /// Slot key to slot value, keyed per platform adapter.
    pub ad_unit_configurations: BTreeMap<u32, String>,
}

impl AdUnitMapping {
    /// The custom event mapping of one encoded price point: the label and
    /// display name are `{tag}-{price point}`, the platform's adapter class
    /// fills the class slot and the raw price point is the parameter the
    /// adapter receives.
    pub fn custom_event(platform: Platform, encoded_price_point: &str) -> Self {
        let adapter = platform.custom_event();
        let label = custom_event_label(encoded_price_point);

        let ad_unit_configurations = [
            (adapter.label_key, label.clone()),
            (adapter.class_name_key, adapter.class_name.to_string()),
            (adapter.parameter_key, encoded_price_point.to_string()),
        ]
        .into_iter()
        .collect();

        Self {
            name: None,
            display_name: label,
            adapter_id: adapter.adapter_id.into(),
            ad_unit_configurations,
        }
    }
}
