use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ad_unit::AdUnit, app::App, mediation::MediationGroup};

/// The `error` object the API wraps every failed call in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: u16,
    pub message: String,
    /// Canonical status, e.g. `INVALID_ARGUMENT` or `PERMISSION_DENIED`.
    pub status: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Body of an API response: either the payload of a successful call or the
/// `{"error": {...}}` envelope.
///
/// The error variant comes first so an envelope never passes for a payload
/// type with defaulted fields, e.g. an empty list page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    Error { error: ApiError },
    Payload(T),
}

impl<T> ApiResponse<T> {
    pub fn ok(self) -> Result<T, ApiError> {
        match self {
            ApiResponse::Payload(payload) => Ok(payload),
            ApiResponse::Error { error } => Err(error),
        }
    }

    pub fn as_error(&self) -> Option<&ApiError> {
        match self {
            ApiResponse::Error { error } => Some(error),
            ApiResponse::Payload(_) => None,
        }
    }
}

/// One page of `GET /accounts/{publisherId}/mediationGroups`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediationGroupListResponse {
    #[serde(default)]
    pub mediation_groups: Vec<MediationGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// One page of `GET /accounts/{publisherId}/adUnits`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdUnitListResponse {
    #[serde(default)]
    pub ad_units: Vec<AdUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// One page of `GET /accounts/{publisherId}/apps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppListResponse {
    #[serde(default)]
    pub apps: Vec<App>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}
