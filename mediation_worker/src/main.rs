#![deny(rust_2018_idioms)]
#![deny(clippy::all)]

use std::{error::Error, path::Path};

use clap::{crate_version, App, AppSettings, Arg, ArgMatches};
use slog::{error, info, warn, Logger};
use tokio::runtime::Runtime;

use mediation_worker::{submit_sheet, AdMobApi, Mode};
use primitives::{
    config::{configuration, Environment},
    util::logging::new_logger,
    AdUnitIdFragment, MediationGroupId, PublisherId,
};

fn main() -> Result<(), Box<dyn Error>> {
    let ad_units_arg = Arg::new("adUnits")
        .long("adUnits")
        .help("comma separated ad unit ID fragments the lines should serve")
        .required(true)
        .takes_value(true);
    let sheet_arg = Arg::new("sheet")
        .long("sheet")
        .help("path to the configuration sheet exported as CSV")
        .required(true)
        .takes_value(true);

    let cli = App::new("Mediation worker")
        .version(crate_version!())
        .about("Writes custom event mediation group lines from a pricing sheet to AdMob")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::new("config")
                .help("the config file for the mediation worker")
                .takes_value(true),
        )
        .arg(
            Arg::new("publisherId")
                .long("publisherId")
                .help("the publisher ID of the AdMob account, e.g. pub-9876543210987654")
                .required(true)
                .takes_value(true),
        )
        .subcommand(
            App::new("create")
                .about("create a new mediation group out of the configuration sheet")
                .arg(
                    Arg::new("name")
                        .long("name")
                        .help("display name of the new mediation group")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::new("platform")
                        .long("platform")
                        .possible_values(["ANDROID", "IOS"])
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .possible_values(["BANNER", "INTERSTITIAL"])
                        .required(true)
                        .takes_value(true),
                )
                .arg(ad_units_arg.clone())
                .arg(sheet_arg.clone()),
        )
        .subcommand(
            App::new("update")
                .about("add the configuration sheet's lines to an existing mediation group")
                .arg(
                    Arg::new("group")
                        .long("group")
                        .help("ID of the mediation group to update")
                        .required(true)
                        .takes_value(true),
                )
                .arg(ad_units_arg)
                .arg(sheet_arg),
        )
        .subcommand(App::new("groups").about("list the account's mediation groups"))
        .subcommand(App::new("ad-units").about("list the account's ad units"))
        .subcommand(App::new("apps").about("list the account's apps"))
        .subcommand(App::new("account").about("show the publisher account"))
        .get_matches();

    let environment: Environment = serde_json::from_value(serde_json::Value::String(
        std::env::var("ENV").unwrap_or_else(|_| "development".to_string()),
    ))
    .expect("Valid environment - development or production");

    let config_file = cli.value_of("config");
    let config = configuration(environment, config_file).expect("failed to parse configuration");

    let publisher: PublisherId = cli
        .value_of("publisherId")
        .expect("publisher id is required")
        .parse()?;
    let token =
        std::env::var("ADMOB_ACCESS_TOKEN").expect("unable to get the ADMOB_ACCESS_TOKEN");

    let logger = new_logger("mediation_worker");
    let api = AdMobApi::init(publisher, token, config, logger.clone())?;

    let rt = Runtime::new()?;

    match cli.subcommand() {
        Some(("create", create)) => {
            let mode = Mode::Create {
                name: create
                    .value_of("name")
                    .expect("group name is required")
                    .to_string(),
                platform: create
                    .value_of("platform")
                    .expect("platform is required")
                    .parse()?,
                format: create
                    .value_of("format")
                    .expect("format is required")
                    .parse()?,
            };

            rt.block_on(submit(&api, &logger, mode, create))
        }
        Some(("update", update)) => {
            let group_id: MediationGroupId = update
                .value_of("group")
                .expect("group id is required")
                .parse()?;

            rt.block_on(submit(&api, &logger, Mode::Update { group_id }, update))
        }
        Some(("groups", _)) => rt.block_on(async {
            let groups = api.list_mediation_groups().await?;

            info!(logger, "Found {} mediation groups", groups.len());
            println!("{}", serde_json::to_string_pretty(&groups)?);
            Ok(())
        }),
        Some(("ad-units", _)) => rt.block_on(async {
            let ad_units = api.list_ad_units().await?;

            info!(logger, "Found {} ad units", ad_units.len());
            println!("{}", serde_json::to_string_pretty(&ad_units)?);
            Ok(())
        }),
        Some(("apps", _)) => rt.block_on(async {
            let apps = api.list_apps().await?;

            info!(logger, "Found {} apps", apps.len());
            println!("{}", serde_json::to_string_pretty(&apps)?);
            Ok(())
        }),
        Some(("account", _)) => rt.block_on(async {
            let account = api.get_account().await?;

            println!("{}", serde_json::to_string_pretty(&account)?);
            Ok(())
        }),
        _ => Ok(()),
    }
}

async fn submit(
    api: &AdMobApi,
    logger: &Logger,
    mode: Mode,
    matches: &ArgMatches,
) -> Result<(), Box<dyn Error>> {
    let fragments = matches
        .value_of("adUnits")
        .expect("ad units are required")
        .split(',')
        .map(|fragment| fragment.trim().parse::<AdUnitIdFragment>())
        .collect::<Result<Vec<_>, _>>()?;

    let sheet_path = Path::new(matches.value_of("sheet").expect("sheet path is required"));
    let report = submit_sheet(api, mode, sheet_path, &fragments).await?;

    for (row, ad_unit) in &report.omitted {
        warn!(logger, "Row {} has no mapping for {}", row, ad_unit);
    }
    println!("{}", serde_json::to_string_pretty(&report)?);

    match report.response.as_error() {
        Some(rejection) => {
            error!(logger, "The mediation group call was rejected: {}", rejection);

            Err(Box::new(rejection.clone()))
        }
        None => {
            info!(logger, "Submitted {} mediation group lines", report.lines;
                "mappings" => report.mappings_created,
                "skippedRows" => ?report.skipped_rows);

            Ok(())
        }
    }
}
