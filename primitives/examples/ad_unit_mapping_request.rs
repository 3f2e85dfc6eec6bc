use primitives::{AdUnitMapping, Platform};
use serde_json::json;

fn main() {
    let android = AdUnitMapping::custom_event(Platform::Android, "r250");

    let android_request = json!({
        "displayName": "Amazon-r250",
        "adapterId": "12",
        "adUnitConfigurations": {
            "13": "Amazon-r250",
            "14": "com.google.ads.mediation.customevent.amazon.AmazonCustomEventAdapter",
            "15": "r250"
        }
    });
    assert_eq!(
        android_request,
        serde_json::to_value(&android).expect("Should serialize")
    );

    // the same price point on iOS lands in the iOS slots of the iOS adapter
    let ios = AdUnitMapping::custom_event(Platform::Ios, "r250");

    let ios_request = json!({
        "displayName": "Amazon-r250",
        "adapterId": "13",
        "adUnitConfigurations": {
            "16": "Amazon-r250",
            "17": "GADCustomEventAdapterAmazon",
            "18": "r250"
        }
    });
    assert_eq!(
        ios_request,
        serde_json::to_value(&ios).expect("Should serialize")
    );
}
