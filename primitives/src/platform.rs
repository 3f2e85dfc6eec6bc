use parse_display::{Display, FromStr};
use serde::{Deserialize, Serialize};

/// Ad source ID of the "Custom event" ad source every generated line and
/// mapping points at.
pub const CUSTOM_EVENT_AD_SOURCE_ID: &str = "18351550913290782395";

/// Network tag of the header bidding partner, used in every generated label
/// and display name.
pub const CUSTOM_EVENT_TAG: &str = "Amazon";

/// `{tag}-{encoded price point}`, shared by the mapping's display name, the
/// line's display name and the adapter label of one configuration row.
pub fn custom_event_label(encoded_price_point: &str) -> String {
    format!("{}-{}", CUSTOM_EVENT_TAG, encoded_price_point)
}

/// Operating system an app runs on and a mediation group targets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, FromStr,
)]
#[display(style = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    /// The custom event adapter serving this platform.
    pub fn custom_event(self) -> &'static CustomEventAdapter {
        match self {
            Platform::Android => &ANDROID_CUSTOM_EVENT,
            Platform::Ios => &IOS_CUSTOM_EVENT,
        }
    }
}

/// Ad format a mediation group targets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, FromStr,
)]
#[display(style = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AdFormat {
    Banner,
    Interstitial,
}

/// Per-platform constants of the custom event adapter: the adapter ID under
/// the custom event ad source, the adapter class shipped inside the app and
/// the numeric keys of the three ad unit configuration slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomEventAdapter {
    pub adapter_id: &'static str,
    pub class_name: &'static str,
    /// Configuration slot holding the `{tag}-{price point}` label.
    pub label_key: u32,
    /// Configuration slot holding the adapter class name.
    pub class_name_key: u32,
    /// Configuration slot holding the raw encoded price point, which is the
    /// parameter the adapter is invoked with.
    pub parameter_key: u32,
}

pub static ANDROID_CUSTOM_EVENT: CustomEventAdapter = CustomEventAdapter {
    adapter_id: "12",
    class_name: "com.google.ads.mediation.customevent.amazon.AmazonCustomEventAdapter",
    label_key: 13,
    class_name_key: 14,
    parameter_key: 15,
};

pub static IOS_CUSTOM_EVENT: CustomEventAdapter = CustomEventAdapter {
    adapter_id: "13",
    class_name: "GADCustomEventAdapterAmazon",
    label_key: 16,
    class_name_key: 17,
    parameter_key: 18,
};
