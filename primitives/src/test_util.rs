use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::{
    ad_unit::AdUnitIdFragment,
    mediation::{
        CpmMode, LineKey, LineState, MediationGroup, MediationGroupId, MediationGroupLine,
        Targeting,
    },
    platform::{AdFormat, Platform},
    AdUnitId, PublisherId,
};

pub use crate::util::logging::discard_logger;

pub static DUMMY_PUBLISHER: Lazy<PublisherId> = Lazy::new(|| {
    "pub-9876543210987654"
        .parse()
        .expect("Should be a valid publisher ID")
});

pub static DUMMY_FRAGMENTS: Lazy<Vec<AdUnitIdFragment>> = Lazy::new(|| {
    vec![
        "1234567890".parse().expect("Should be a valid fragment"),
        "3456789012".parse().expect("Should be a valid fragment"),
    ]
});

pub static DUMMY_GROUP_ID: Lazy<MediationGroupId> = Lazy::new(|| {
    "9876543210988"
        .parse()
        .expect("Should be a valid mediation group ID")
});

/// An existing group the way the list endpoint returns it: a positive line
/// key and a live AdMob Network line carrying no manual CPM.
pub static DUMMY_GROUP: Lazy<MediationGroup> = Lazy::new(|| {
    let mut lines = IndexMap::new();
    lines.insert(
        LineKey::from(1234567890),
        MediationGroupLine {
            display_name: "AdMob Network".to_string(),
            ad_source_id: "5450213213286189855".into(),
            cpm_mode: CpmMode::Live,
            cpm_micros: None,
            state: LineState::Enabled,
            ad_unit_mappings: IndexMap::new(),
        },
    );

    MediationGroup {
        name: Some(format!(
            "accounts/{}/mediationGroups/{}",
            *DUMMY_PUBLISHER, *DUMMY_GROUP_ID
        )),
        mediation_group_id: Some(DUMMY_GROUP_ID.clone()),
        display_name: "Prod banners".to_string(),
        targeting: Targeting {
            platform: Platform::Android,
            format: AdFormat::Banner,
            ad_unit_ids: vec![AdUnitId::new(*DUMMY_PUBLISHER, DUMMY_FRAGMENTS[0].clone())],
        },
        mediation_group_lines: lines,
    }
});
