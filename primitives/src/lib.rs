#![deny(rust_2018_idioms)]
#![deny(clippy::all)]

pub mod account;
pub mod ad_unit;
pub mod ad_unit_mapping;
pub mod admob;
pub mod app;
pub mod config;
pub mod cpm;
pub mod mediation;
pub mod platform;
#[cfg(any(test, feature = "test-util"))]
pub mod test_util;
pub mod util;

pub use self::account::{Account, PublisherId};
pub use self::ad_unit::{AdUnit, AdUnitId, AdUnitIdFragment};
pub use self::ad_unit_mapping::AdUnitMapping;
pub use self::app::App;
pub use self::config::Config;
pub use self::cpm::CpmMicros;
pub use self::mediation::{MediationGroup, MediationGroupId, MediationGroupLine};
pub use self::platform::{AdFormat, Platform};
