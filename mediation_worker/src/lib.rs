#![deny(rust_2018_idioms)]
#![deny(clippy::all)]

use std::{fs::File, path::Path};

use primitives::ad_unit::AdUnitIdFragment;

pub use self::admob_interface::AdMobApi;
pub use self::error::Error;
pub use self::lines::{write_custom_event_lines, Mode, SyncReport};

pub mod admob_interface;
pub mod error;
pub mod lines;
pub mod sheet;

/// Reads the configuration sheet at `sheet_path` and submits its rows as
/// custom event lines in a single create or update call.
pub async fn submit_sheet(
    api: &AdMobApi,
    mode: Mode,
    sheet_path: &Path,
    fragments: &[AdUnitIdFragment],
) -> Result<SyncReport, Error> {
    let rows = sheet::read_rows(File::open(sheet_path)?)?;

    Ok(write_custom_event_lines(api, mode, &rows, fragments).await?)
}
