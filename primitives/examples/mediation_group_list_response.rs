use primitives::{
    admob::{ApiResponse, MediationGroupListResponse},
    test_util::DUMMY_GROUP,
};
use serde_json::json;

fn main() {
    let list_response = json!({
        "mediationGroups": [{
            "name": "accounts/pub-9876543210987654/mediationGroups/9876543210988",
            "mediationGroupId": "9876543210988",
            "displayName": "Prod banners",
            "targeting": {
                "platform": "ANDROID",
                "format": "BANNER",
                "adUnitIds": ["ca-app-pub-9876543210987654/1234567890"]
            },
            "mediationGroupLines": {
                "1234567890": {
                    "displayName": "AdMob Network",
                    "adSourceId": "5450213213286189855",
                    "cpmMode": "LIVE",
                    "state": "ENABLED"
                }
            }
        }]
    });

    let response: ApiResponse<MediationGroupListResponse> =
        serde_json::from_value(list_response).expect("Should deserialize");
    let page = response.ok().expect("Should be a payload");

    assert_eq!(vec![DUMMY_GROUP.clone()], page.mediation_groups);
    assert_eq!(None, page.next_page_token);

    // the same endpoint answers failures with the error envelope, which must
    // never pass for an empty page
    let error_response = json!({
        "error": {
            "code": 404,
            "message": "Requested entity was not found.",
            "status": "NOT_FOUND"
        }
    });

    let response: ApiResponse<MediationGroupListResponse> =
        serde_json::from_value(error_response).expect("Should deserialize");
    let error = response.ok().expect_err("Should be the error envelope");

    assert_eq!("NOT_FOUND", &error.status);
}
