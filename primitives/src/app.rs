use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// App as returned by `GET /accounts/{publisherId}/apps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    /// Resource name, `accounts/{publisherId}/apps/{appId}`.
    pub name: String,
    /// Externally visible ID, `ca-app-{publisherId}~{digits}`.
    pub app_id: String,
    pub platform: Platform,
    /// Present until the app is linked to a store listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_app_info: Option<ManualAppInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_app_info: Option<LinkedAppInfo>,
}

impl App {
    /// The store listing name when linked, the manual name otherwise.
    pub fn display_name(&self) -> Option<&str> {
        self.linked_app_info
            .as_ref()
            .and_then(|linked| linked.display_name.as_deref())
            .or_else(|| {
                self.manual_app_info
                    .as_ref()
                    .map(|manual| manual.display_name.as_str())
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualAppInfo {
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAppInfo {
    /// Store-assigned ID, a package name on Android.
    pub app_store_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[cfg(test)]
mod test {
    use super::*;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn deserializes_manual_and_linked_apps() {
        let manual: App = serde_json::from_value(json!({
            "name": "accounts/pub-9876543210987654/apps/0987654321",
            "appId": "ca-app-pub-9876543210987654~0987654321",
            "platform": "ANDROID",
            "manualAppInfo": { "displayName": "Dev build" }
        }))
        .expect("Should deserialize");

        assert_eq!(Platform::Android, manual.platform);
        assert_eq!(Some("Dev build"), manual.display_name());

        let linked: App = serde_json::from_value(json!({
            "name": "accounts/pub-9876543210987654/apps/1234509876",
            "appId": "ca-app-pub-9876543210987654~1234509876",
            "platform": "IOS",
            "linkedAppInfo": {
                "appStoreId": "123450987",
                "displayName": "Prod app"
            }
        }))
        .expect("Should deserialize");

        assert_eq!(Platform::Ios, linked.platform);
        assert_eq!(Some("Prod app"), linked.display_name());
    }
}
