use std::time::Duration;

use futures::future::TryFutureExt;
use reqwest::{Client, Response};
use slog::{debug, Logger};
use thiserror::Error;

use primitives::{
    account::Account,
    ad_unit::{AdUnit, AdUnitIdFragment},
    ad_unit_mapping::AdUnitMapping,
    admob::{
        AdUnitListResponse, ApiError, ApiResponse, AppListResponse, MediationGroupListResponse,
    },
    app::App,
    mediation::{MediationGroup, MediationGroupId, MediationGroupPatch, UpdateMask},
    util::api,
    Config, PublisherId,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Building client: {0}")]
    BuildingClient(reqwest::Error),
    /// Error returned when the request is made, i.e. transport or decoding
    /// failures, never an API rejection.
    #[error("Making a request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Building a request URL: {0}")]
    Url(#[from] api::Error),
    #[error("AdMob API: {0}")]
    Api(ApiError),
}

/// Client for the AdMob REST API, scoped to one publisher account.
///
/// Requests authenticate with the OAuth2 bearer token the client is
/// initialized with; obtaining and refreshing that token is up to the
/// caller.
#[derive(Debug, Clone)]
pub struct AdMobApi {
    pub publisher: PublisherId,
    pub client: Client,
    pub logger: Logger,
    pub config: Config,
    token: String,
}

impl AdMobApi {
    /// Builds the client with the configured `fetch_timeout`.
    pub fn init(
        publisher: PublisherId,
        token: String,
        config: Config,
        logger: Logger,
    ) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.fetch_timeout.into()))
            .build()
            .map_err(Error::BuildingClient)?;

        Ok(Self {
            publisher,
            client,
            logger,
            config,
            token,
        })
    }

    /// `GET accounts/{publisherId}`
    pub async fn get_account(&self) -> Result<Account, Error> {
        let url = self
            .config
            .api_url
            .join(&format!("accounts/{}", self.publisher))?;

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .and_then(|res: Response| res.json::<ApiResponse<Account>>())
            .await?;

        response.ok().map_err(Error::Api)
    }

    /// `GET accounts/{publisherId}/mediationGroups`, walking all pages.
    pub async fn list_mediation_groups(&self) -> Result<Vec<MediationGroup>, Error> {
        let mut groups = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self
                .config
                .api_url
                .join(&format!("accounts/{}/mediationGroups", self.publisher))?;
            url.query_pairs_mut()
                .append_pair("pageSize", &self.config.list_page_size.to_string());
            if let Some(page_token) = &page_token {
                url.query_pairs_mut().append_pair("pageToken", page_token);
            }

            let response = self
                .client
                .get(url)
                .bearer_auth(&self.token)
                .send()
                .and_then(|res: Response| res.json::<ApiResponse<MediationGroupListResponse>>())
                .await?;
            let page = response.ok().map_err(Error::Api)?;

            debug!(
                self.logger,
                "Fetched a page of {} mediation groups",
                page.mediation_groups.len()
            );
            groups.extend(page.mediation_groups);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(groups)
    }

    /// `GET accounts/{publisherId}/adUnits`, walking all pages.
    pub async fn list_ad_units(&self) -> Result<Vec<AdUnit>, Error> {
        let mut ad_units = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self
                .config
                .api_url
                .join(&format!("accounts/{}/adUnits", self.publisher))?;
            url.query_pairs_mut()
                .append_pair("pageSize", &self.config.list_page_size.to_string());
            if let Some(page_token) = &page_token {
                url.query_pairs_mut().append_pair("pageToken", page_token);
            }

            let response = self
                .client
                .get(url)
                .bearer_auth(&self.token)
                .send()
                .and_then(|res: Response| res.json::<ApiResponse<AdUnitListResponse>>())
                .await?;
            let page = response.ok().map_err(Error::Api)?;

            debug!(self.logger, "Fetched a page of {} ad units", page.ad_units.len());
            ad_units.extend(page.ad_units);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(ad_units)
    }

    /// `GET accounts/{publisherId}/apps`, walking all pages.
    pub async fn list_apps(&self) -> Result<Vec<App>, Error> {
        let mut apps = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self
                .config
                .api_url
                .join(&format!("accounts/{}/apps", self.publisher))?;
            url.query_pairs_mut()
                .append_pair("pageSize", &self.config.list_page_size.to_string());
            if let Some(page_token) = &page_token {
                url.query_pairs_mut().append_pair("pageToken", page_token);
            }

            let response = self
                .client
                .get(url)
                .bearer_auth(&self.token)
                .send()
                .and_then(|res: Response| res.json::<ApiResponse<AppListResponse>>())
                .await?;
            let page = response.ok().map_err(Error::Api)?;

            debug!(self.logger, "Fetched a page of {} apps", page.apps.len());
            apps.extend(page.apps);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(apps)
    }

    /// `POST accounts/{publisherId}/adUnits/{fragment}/adUnitMappings`
    ///
    /// The response body is handed back as is; what to do about a rejected
    /// mapping is the caller's call.
    pub async fn create_ad_unit_mapping(
        &self,
        fragment: &AdUnitIdFragment,
        mapping: &AdUnitMapping,
    ) -> Result<ApiResponse<AdUnitMapping>, Error> {
        let url = self.config.api_url.join(&format!(
            "accounts/{}/adUnits/{}/adUnitMappings",
            self.publisher, fragment
        ))?;

        Ok(self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(mapping)
            .send()
            .and_then(|res: Response| res.json::<ApiResponse<AdUnitMapping>>())
            .await?)
    }

    /// `POST accounts/{publisherId}/mediationGroups`
    pub async fn create_mediation_group(
        &self,
        group: &MediationGroup,
    ) -> Result<ApiResponse<MediationGroup>, Error> {
        let url = self
            .config
            .api_url
            .join(&format!("accounts/{}/mediationGroups", self.publisher))?;

        Ok(self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(group)
            .send()
            .and_then(|res: Response| res.json::<ApiResponse<MediationGroup>>())
            .await?)
    }

    /// `PATCH accounts/{publisherId}/mediationGroups/{id}?updateMask=...`
    ///
    /// The mask must list exactly the line keys the patch adds, anything
    /// else on the group stays untouched.
    pub async fn update_mediation_group(
        &self,
        group_id: &MediationGroupId,
        patch: &MediationGroupPatch,
        mask: &UpdateMask,
    ) -> Result<ApiResponse<MediationGroup>, Error> {
        let mut url = self.config.api_url.join(&format!(
            "accounts/{}/mediationGroups/{}",
            self.publisher, group_id
        ))?;
        url.query_pairs_mut()
            .append_pair("updateMask", &mask.to_string());

        Ok(self
            .client
            .patch(url)
            .bearer_auth(&self.token)
            .json(patch)
            .send()
            .and_then(|res: Response| res.json::<ApiResponse<MediationGroup>>())
            .await?)
    }
}
