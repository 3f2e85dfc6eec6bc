use primitives::{
    mediation::{LineKey, MediationGroup, MediationGroupLine, Targeting, UpdateMask},
    platform::{AdFormat, Platform},
    test_util::{DUMMY_FRAGMENTS, DUMMY_PUBLISHER},
    AdUnitId,
};
use serde_json::json;

fn main() {
    let targeting = Targeting {
        platform: Platform::Android,
        format: AdFormat::Banner,
        ad_unit_ids: vec![AdUnitId::new(*DUMMY_PUBLISHER, DUMMY_FRAGMENTS[0].clone())],
    };
    let mut group = MediationGroup::new("Amazon TAM banners".to_string(), targeting);

    for (ordinal, (price_point, cpm)) in [("r100", "1.00"), ("r250", "2.50")].iter().enumerate() {
        let line = MediationGroupLine::custom_event(price_point, cpm.parse().expect("Valid CPM"));
        group
            .mediation_group_lines
            .insert(LineKey::synthetic(ordinal as u64 + 1), line);
    }

    let create_request = json!({
        "displayName": "Amazon TAM banners",
        "targeting": {
            "platform": "ANDROID",
            "format": "BANNER",
            "adUnitIds": ["ca-app-pub-9876543210987654/1234567890"]
        },
        "mediationGroupLines": {
            "-1": {
                "displayName": "Amazon-r100",
                "adSourceId": "18351550913290782395",
                "cpmMode": "MANUAL",
                "cpmMicros": 1_000_000,
                "state": "ENABLED"
            },
            "-2": {
                "displayName": "Amazon-r250",
                "adSourceId": "18351550913290782395",
                "cpmMode": "MANUAL",
                "cpmMicros": 2_500_000,
                "state": "ENABLED"
            }
        }
    });

    assert_eq!(
        create_request,
        serde_json::to_value(&group).expect("Should serialize")
    );

    // were these lines added to an existing group instead, the PATCH would
    // carry exactly their keys in its update mask
    let mask: UpdateMask = group.mediation_group_lines.keys().copied().collect();
    assert_eq!(
        r#"mediationGroupLines["-1"],mediationGroupLines["-2"]"#,
        &mask.to_string()
    );
}
