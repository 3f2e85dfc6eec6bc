use indexmap::IndexMap;
use serde::Serialize;
use slog::{info, warn};
use thiserror::Error;

use primitives::{
    ad_unit::{AdUnitId, AdUnitIdFragment},
    ad_unit_mapping::AdUnitMapping,
    admob::ApiResponse,
    mediation::{
        LineKey, MediationGroup, MediationGroupId, MediationGroupLine, MediationGroupPatch,
        Targeting, UpdateMask,
    },
    platform::{AdFormat, Platform},
};

use crate::{admob_interface, sheet::ConfigurationRow, AdMobApi};

#[derive(Debug, Error)]
pub enum Error {
    #[error("No ad unit ID fragments were provided")]
    NoAdUnits,
    #[error("Mediation group {0} does not exist")]
    GroupNotFound(MediationGroupId),
    #[error("{found} configuration rows exceed the limit of {max} lines per group")]
    TooManyLines { found: usize, max: usize },
    #[error(transparent)]
    Api(#[from] admob_interface::Error),
}

/// What a submission writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// A new group carrying all the lines.
    Create {
        name: String,
        platform: Platform,
        format: AdFormat,
    },
    /// New lines for an existing group, whose current lines stay as they
    /// are.
    Update { group_id: MediationGroupId },
}

/// Outcome of one submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// The final create or update response, exactly as the API answered it.
    pub response: ApiResponse<MediationGroup>,
    /// Lines sent, one per processed row.
    pub lines: usize,
    /// Ad unit mappings created on the account.
    pub mappings_created: usize,
    /// 1-based sheet positions of the rows skipped over the ignore flag.
    pub skipped_rows: Vec<usize>,
    /// `(row, ad unit)` pairs whose mapping call failed, leaving the row's
    /// line without that ad unit.
    pub omitted: Vec<(usize, AdUnitId)>,
}

/// Turns the configuration rows into custom event mediation group lines and
/// submits them in a single create or update call.
///
/// Ad unit mappings are created first, one per processed row and ad unit. A
/// mapping call that fails, or that answers without a resource name, only
/// costs that ad unit its entry in the row's line: the omission is logged
/// and reported, the line itself still goes out. There is no rollback, so
/// mappings created before a later failure stay behind on the account.
pub async fn write_custom_event_lines(
    api: &AdMobApi,
    mode: Mode,
    rows: &[ConfigurationRow],
    fragments: &[AdUnitIdFragment],
) -> Result<SyncReport, Error> {
    let logger = &api.logger;
    let max = api.config.max_lines_per_group as usize;

    // both checks need no I/O, nothing at all is sent when they fail
    let to_process = rows.iter().filter(|row| !row.ignore).count();
    if to_process > max {
        return Err(Error::TooManyLines {
            found: to_process,
            max,
        });
    }
    if fragments.is_empty() {
        return Err(Error::NoAdUnits);
    }

    // an update serves the platform and format of the existing group,
    // whatever the caller believes them to be
    let (platform, format) = match &mode {
        Mode::Create {
            platform, format, ..
        } => (*platform, *format),
        Mode::Update { group_id } => {
            let groups = api.list_mediation_groups().await?;
            let group = groups
                .into_iter()
                .find(|group| group.mediation_group_id.as_ref() == Some(group_id))
                .ok_or_else(|| Error::GroupNotFound(group_id.clone()))?;

            (group.targeting.platform, group.targeting.format)
        }
    };

    let mut group_lines: IndexMap<LineKey, MediationGroupLine> = IndexMap::new();
    let mut skipped_rows = Vec::new();
    let mut omitted = Vec::new();
    let mut mappings_created = 0;

    for (position, row) in rows.iter().enumerate() {
        let row_number = position + 1;
        if row.ignore {
            skipped_rows.push(row_number);
            continue;
        }

        let mut line = MediationGroupLine::custom_event(&row.encoded_price_point, row.cpm);
        for fragment in fragments {
            let ad_unit_id = AdUnitId::new(api.publisher, fragment.clone());
            let mapping = AdUnitMapping::custom_event(platform, &row.encoded_price_point);

            match api.create_ad_unit_mapping(fragment, &mapping).await {
                Ok(ApiResponse::Payload(AdUnitMapping {
                    name: Some(name), ..
                })) => {
                    line.ad_unit_mappings.insert(ad_unit_id, name);
                    mappings_created += 1;
                }
                Ok(ApiResponse::Payload(_)) => {
                    warn!(logger, "Mapping came back without a resource name";
                        "row" => row_number, "adUnit" => %ad_unit_id);
                    omitted.push((row_number, ad_unit_id));
                }
                Ok(ApiResponse::Error { error }) => {
                    warn!(logger, "Mapping was rejected";
                        "row" => row_number, "adUnit" => %ad_unit_id, "error" => %error);
                    omitted.push((row_number, ad_unit_id));
                }
                Err(error) => {
                    warn!(logger, "Mapping request failed";
                        "row" => row_number, "adUnit" => %ad_unit_id, "error" => ?error);
                    omitted.push((row_number, ad_unit_id));
                }
            }
        }

        // the next negative key, counting processed rows only
        group_lines.insert(LineKey::synthetic(group_lines.len() as u64 + 1), line);
    }

    let lines = group_lines.len();
    let response = match mode {
        Mode::Create {
            name,
            platform,
            format,
        } => {
            let ad_unit_ids = fragments
                .iter()
                .map(|fragment| AdUnitId::new(api.publisher, fragment.clone()))
                .collect();
            let mut group = MediationGroup::new(
                name,
                Targeting {
                    platform,
                    format,
                    ad_unit_ids,
                },
            );
            group.mediation_group_lines = group_lines;

            info!(logger, "Creating a mediation group with {} lines", lines;
                "name" => &group.display_name);
            api.create_mediation_group(&group).await?
        }
        Mode::Update { group_id } => {
            let mask: UpdateMask = group_lines.keys().copied().collect();
            let patch = MediationGroupPatch {
                mediation_group_lines: group_lines,
            };

            info!(logger, "Adding {} lines to mediation group {}", lines, group_id;
                "updateMask" => %mask);
            api.update_mediation_group(&group_id, &patch, &mask).await?
        }
    };

    Ok(SyncReport {
        response,
        lines,
        mappings_created,
        skipped_rows,
        omitted,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, body_partial_json, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use primitives::{
        admob::MediationGroupListResponse,
        config::DEVELOPMENT_CONFIG,
        test_util::{
            discard_logger, DUMMY_FRAGMENTS, DUMMY_GROUP, DUMMY_GROUP_ID, DUMMY_PUBLISHER,
        },
        util::ApiUrl,
        CpmMicros,
    };

    fn test_api(server: &MockServer) -> AdMobApi {
        let mut config = DEVELOPMENT_CONFIG.clone();
        config.api_url = format!("{}/v1alpha", server.uri())
            .parse::<ApiUrl>()
            .expect("Should parse the mock server url");

        AdMobApi::init(
            *DUMMY_PUBLISHER,
            "test-token".to_string(),
            config,
            discard_logger(),
        )
        .expect("Should build the client")
    }

    fn row(cpm: &str, price_point: &str) -> ConfigurationRow {
        ConfigurationRow {
            slot_name: format!("slot_{}", price_point),
            cpm: cpm.parse().expect("Valid CPM"),
            encoded_price_point: price_point.to_string(),
            ignore: false,
        }
    }

    fn ignored_row() -> ConfigurationRow {
        ConfigurationRow {
            slot_name: "ignored".to_string(),
            cpm: CpmMicros::default(),
            encoded_price_point: String::new(),
            ignore: true,
        }
    }

    fn mapping_mock(fragment: &str, mapping_name: &str) -> Mock {
        Mock::given(method("POST"))
            .and(path(format!(
                "/v1alpha/accounts/{}/adUnits/{}/adUnitMappings",
                *DUMMY_PUBLISHER, fragment
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": mapping_name,
                "displayName": "Amazon-any",
                "adapterId": "12",
                "adUnitConfigurations": {}
            })))
    }

    #[tokio::test]
    async fn creates_a_group_with_one_line_per_processed_row() {
        let server = MockServer::start().await;
        let api = test_api(&server);

        let fragment = DUMMY_FRAGMENTS[0].as_str();
        let ad_unit_id = format!("ca-app-{}/{}", *DUMMY_PUBLISHER, fragment);
        let mapping_name = format!(
            "accounts/{}/adUnits/{}/adUnitMappings/101",
            *DUMMY_PUBLISHER, fragment
        );

        mapping_mock(fragment, &mapping_name)
            .expect(3)
            .mount(&server)
            .await;

        let line = |price_point: &str, micros: u64| {
            json!({
                "displayName": format!("Amazon-{}", price_point),
                "adSourceId": "18351550913290782395",
                "cpmMode": "MANUAL",
                "cpmMicros": micros,
                "state": "ENABLED",
                "adUnitMappings": { ad_unit_id.as_str(): &mapping_name }
            })
        };
        let create_request = json!({
            "displayName": "Amazon TAM banners",
            "targeting": {
                "platform": "ANDROID",
                "format": "BANNER",
                "adUnitIds": [&ad_unit_id]
            },
            "mediationGroupLines": {
                "-1": line("a", 100_000),
                "-2": line("b", 200_000),
                "-3": line("c", 300_000)
            }
        });

        let mut created = create_request.clone();
        created["name"] = json!(format!(
            "accounts/{}/mediationGroups/5556667770001",
            *DUMMY_PUBLISHER
        ));
        created["mediationGroupId"] = json!("5556667770001");

        Mock::given(method("POST"))
            .and(path(format!(
                "/v1alpha/accounts/{}/mediationGroups",
                *DUMMY_PUBLISHER
            )))
            .and(body_json(&create_request))
            .respond_with(ResponseTemplate::new(200).set_body_json(&created))
            .expect(1)
            .mount(&server)
            .await;

        let rows = [row("0.10", "a"), row("0.20", "b"), row("0.30", "c")];
        let mode = Mode::Create {
            name: "Amazon TAM banners".to_string(),
            platform: Platform::Android,
            format: AdFormat::Banner,
        };

        let report = write_custom_event_lines(&api, mode, &rows, &DUMMY_FRAGMENTS[..1])
            .await
            .expect("Should create the group");

        assert_eq!(3, report.lines);
        assert_eq!(3, report.mappings_created);
        assert!(report.skipped_rows.is_empty());
        assert!(report.omitted.is_empty());

        let group = report.response.ok().expect("Should be the created group");
        assert_eq!(
            Some("5556667770001"),
            group.mediation_group_id.as_ref().map(|id| id.as_str())
        );
    }

    #[tokio::test]
    async fn ignored_rows_produce_no_mapping_no_line_and_no_key_gap() {
        let server = MockServer::start().await;
        let api = test_api(&server);

        let fragment = DUMMY_FRAGMENTS[0].as_str();
        mapping_mock(
            fragment,
            &format!(
                "accounts/{}/adUnits/{}/adUnitMappings/102",
                *DUMMY_PUBLISHER, fragment
            ),
        )
        .expect(2)
        .mount(&server)
        .await;

        // line keys must be "-1" and "-2" although row "b" sits third
        Mock::given(method("POST"))
            .and(path(format!(
                "/v1alpha/accounts/{}/mediationGroups",
                *DUMMY_PUBLISHER
            )))
            .and(body_partial_json(json!({
                "mediationGroupLines": {
                    "-1": { "displayName": "Amazon-a" },
                    "-2": { "displayName": "Amazon-b" }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "displayName": "Amazon TAM banners",
                "mediationGroupId": "5556667770002",
                "targeting": { "platform": "ANDROID", "format": "BANNER" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let rows = [row("0.10", "a"), ignored_row(), row("0.20", "b")];
        let mode = Mode::Create {
            name: "Amazon TAM banners".to_string(),
            platform: Platform::Android,
            format: AdFormat::Banner,
        };

        let report = write_custom_event_lines(&api, mode, &rows, &DUMMY_FRAGMENTS[..1])
            .await
            .expect("Should create the group");

        assert_eq!(2, report.lines);
        assert_eq!(vec![2], report.skipped_rows);
    }

    #[tokio::test]
    async fn refuses_too_many_rows_without_a_single_request() {
        let server = MockServer::start().await;
        let api = test_api(&server);

        let rows: Vec<ConfigurationRow> = (0..151)
            .map(|ordinal| row("0.10", &format!("p{}", ordinal)))
            .collect();
        let mode = Mode::Update {
            group_id: DUMMY_GROUP_ID.clone(),
        };

        let error = write_custom_event_lines(&api, mode, &rows, &DUMMY_FRAGMENTS)
            .await
            .expect_err("151 rows must not fit into a group");

        assert!(
            matches!(error, Error::TooManyLines { found: 151, max: 150 }),
            "got {:?}",
            error
        );
        // not even the group lookup went out
        assert!(server
            .received_requests()
            .await
            .expect("Requests are recorded")
            .is_empty());
    }

    #[tokio::test]
    async fn ignored_rows_do_not_count_against_the_line_limit() {
        let server = MockServer::start().await;
        let mut api = test_api(&server);
        api.config.max_lines_per_group = 2;

        let over = [row("0.10", "a"), row("0.20", "b"), row("0.30", "c")];
        let error = write_custom_event_lines(
            &api,
            Mode::Update {
                group_id: DUMMY_GROUP_ID.clone(),
            },
            &over,
            &DUMMY_FRAGMENTS,
        )
        .await
        .expect_err("3 processed rows exceed a limit of 2");
        assert!(matches!(error, Error::TooManyLines { found: 3, max: 2 }));

        // with one row ignored the same sheet fits, so the run reaches the
        // group lookup and fails there instead
        let fitting = [row("0.10", "a"), ignored_row(), row("0.20", "b")];
        Mock::given(method("GET"))
            .and(path(format!(
                "/v1alpha/accounts/{}/mediationGroups",
                *DUMMY_PUBLISHER
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let error = write_custom_event_lines(
            &api,
            Mode::Update {
                group_id: DUMMY_GROUP_ID.clone(),
            },
            &fitting,
            &DUMMY_FRAGMENTS,
        )
        .await
        .expect_err("The group does not exist");
        assert!(matches!(error, Error::GroupNotFound(_)));
    }

    #[tokio::test]
    async fn refuses_to_run_without_ad_units() {
        let server = MockServer::start().await;
        let api = test_api(&server);

        let error = write_custom_event_lines(
            &api,
            Mode::Create {
                name: "Amazon TAM banners".to_string(),
                platform: Platform::Android,
                format: AdFormat::Banner,
            },
            &[row("0.10", "a")],
            &[],
        )
        .await
        .expect_err("No fragments, nothing to map");

        assert!(matches!(error, Error::NoAdUnits));
        assert!(server
            .received_requests()
            .await
            .expect("Requests are recorded")
            .is_empty());
    }

    #[tokio::test]
    async fn update_takes_platform_from_the_group_and_masks_exactly_the_new_lines() {
        let server = MockServer::start().await;
        let api = test_api(&server);

        Mock::given(method("GET"))
            .and(path(format!(
                "/v1alpha/accounts/{}/mediationGroups",
                *DUMMY_PUBLISHER
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                &MediationGroupListResponse {
                    mediation_groups: vec![DUMMY_GROUP.clone()],
                    next_page_token: None,
                },
            ))
            .expect(1)
            .mount(&server)
            .await;

        // DUMMY_GROUP targets ANDROID, so the mappings must use the Android
        // adapter although the mode never says so
        let fragment = DUMMY_FRAGMENTS[0].as_str();
        let mapping_name = format!(
            "accounts/{}/adUnits/{}/adUnitMappings/103",
            *DUMMY_PUBLISHER, fragment
        );
        Mock::given(method("POST"))
            .and(path(format!(
                "/v1alpha/accounts/{}/adUnits/{}/adUnitMappings",
                *DUMMY_PUBLISHER, fragment
            )))
            .and(body_partial_json(json!({ "adapterId": "12" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": &mapping_name,
                "displayName": "Amazon-any",
                "adapterId": "12",
                "adUnitConfigurations": {}
            })))
            .expect(2)
            .mount(&server)
            .await;

        let ad_unit_id = format!("ca-app-{}/{}", *DUMMY_PUBLISHER, fragment);
        let line = |price_point: &str, micros: u64| {
            json!({
                "displayName": format!("Amazon-{}", price_point),
                "adSourceId": "18351550913290782395",
                "cpmMode": "MANUAL",
                "cpmMicros": micros,
                "state": "ENABLED",
                "adUnitMappings": { ad_unit_id.as_str(): &mapping_name }
            })
        };
        let patch_request = json!({
            "mediationGroupLines": {
                "-1": line("a", 250_000),
                "-2": line("b", 1_300_000)
            }
        });

        Mock::given(method("PATCH"))
            .and(path(format!(
                "/v1alpha/accounts/{}/mediationGroups/{}",
                *DUMMY_PUBLISHER, *DUMMY_GROUP_ID
            )))
            .and(query_param(
                "updateMask",
                r#"mediationGroupLines["-1"],mediationGroupLines["-2"]"#,
            ))
            .and(body_json(&patch_request))
            .respond_with(ResponseTemplate::new(200).set_body_json(&*DUMMY_GROUP))
            .expect(1)
            .mount(&server)
            .await;

        let rows = [row("0.25", "a"), row("1.30", "b")];
        let mode = Mode::Update {
            group_id: DUMMY_GROUP_ID.clone(),
        };

        let report = write_custom_event_lines(&api, mode, &rows, &DUMMY_FRAGMENTS[..1])
            .await
            .expect("Should update the group");

        assert_eq!(2, report.lines);
        assert_eq!(2, report.mappings_created);
        assert_eq!(
            *DUMMY_GROUP,
            report.response.ok().expect("Should be the updated group")
        );
    }

    #[tokio::test]
    async fn updating_a_missing_group_fails_after_the_lookup_only() {
        let server = MockServer::start().await;
        let api = test_api(&server);

        Mock::given(method("GET"))
            .and(path(format!(
                "/v1alpha/accounts/{}/mediationGroups",
                *DUMMY_PUBLISHER
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "mediationGroups": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mode = Mode::Update {
            group_id: "404404404".parse().expect("Valid group ID"),
        };
        let error = write_custom_event_lines(&api, mode, &[row("0.10", "a")], &DUMMY_FRAGMENTS)
            .await
            .expect_err("The group is not on the account");

        match &error {
            Error::GroupNotFound(group_id) => assert_eq!("404404404", group_id.as_str()),
            other => panic!("Expected GroupNotFound, got {:?}", other),
        }
        // the lookup was the one and only request
        assert_eq!(
            1,
            server
                .received_requests()
                .await
                .expect("Requests are recorded")
                .len()
        );
    }

    #[tokio::test]
    async fn a_rejected_mapping_omits_the_ad_unit_but_keeps_the_line() {
        let server = MockServer::start().await;
        let api = test_api(&server);

        let good = DUMMY_FRAGMENTS[0].as_str();
        let bad = DUMMY_FRAGMENTS[1].as_str();
        let mapping_name = format!(
            "accounts/{}/adUnits/{}/adUnitMappings/104",
            *DUMMY_PUBLISHER, good
        );

        mapping_mock(good, &mapping_name).expect(1).mount(&server).await;
        Mock::given(method("POST"))
            .and(path(format!(
                "/v1alpha/accounts/{}/adUnits/{}/adUnitMappings",
                *DUMMY_PUBLISHER, bad
            )))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": 400,
                    "message": "An ad unit mapping with this label already exists",
                    "status": "INVALID_ARGUMENT"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let good_ad_unit = format!("ca-app-{}/{}", *DUMMY_PUBLISHER, good);
        let create_request = json!({
            "displayName": "Amazon TAM banners",
            "targeting": {
                "platform": "ANDROID",
                "format": "BANNER",
                "adUnitIds": [
                    &good_ad_unit,
                    format!("ca-app-{}/{}", *DUMMY_PUBLISHER, bad)
                ]
            },
            "mediationGroupLines": {
                "-1": {
                    "displayName": "Amazon-a",
                    "adSourceId": "18351550913290782395",
                    "cpmMode": "MANUAL",
                    "cpmMicros": 100_000,
                    "state": "ENABLED",
                    // only the mapped ad unit makes it into the line
                    "adUnitMappings": { good_ad_unit.as_str(): &mapping_name }
                }
            }
        });
        Mock::given(method("POST"))
            .and(path(format!(
                "/v1alpha/accounts/{}/mediationGroups",
                *DUMMY_PUBLISHER
            )))
            .and(body_json(&create_request))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "displayName": "Amazon TAM banners",
                "mediationGroupId": "5556667770003",
                "targeting": { "platform": "ANDROID", "format": "BANNER" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mode = Mode::Create {
            name: "Amazon TAM banners".to_string(),
            platform: Platform::Android,
            format: AdFormat::Banner,
        };
        let report = write_custom_event_lines(&api, mode, &[row("0.10", "a")], &DUMMY_FRAGMENTS)
            .await
            .expect("The run itself should succeed");

        assert_eq!(1, report.lines);
        assert_eq!(1, report.mappings_created);
        assert_eq!(
            vec![(
                1,
                AdUnitId::new(*DUMMY_PUBLISHER, DUMMY_FRAGMENTS[1].clone())
            )],
            report.omitted
        );
    }
}
