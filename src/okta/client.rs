//! Okta management API client.
//!
//! Read-only calls used to build the provisioning inventory.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use super::models::{
    AppFeature, AppUserSchema, Application, FeatureDetail, OktaErrorBody, ProfileMapping,
    ProfileMappingDetail,
};
use super::pagination::next_link;
use crate::config::Config;
use crate::error::ApiError;
use crate::secret::ApiToken;

/// Okta API client.
pub struct OktaClient {
    http_client: Client,
    base_url: Url,
    authorization: ApiToken,
}

impl OktaClient {
    /// Create a client for the org in `config`.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            &config.base_url(),
            &config.okta.token_scheme,
            &config.okta.api_token,
            config.request_timeout(),
            config.connect_timeout(),
        )
    }

    /// Create a new Okta client.
    pub fn new(
        base_url: &str,
        token_scheme: &str,
        token: &ApiToken,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            http_client,
            base_url,
            authorization: ApiToken::new(format!("{} {}", token_scheme.trim(), token.as_str())),
        })
    }

    /// List every application, following `Link: rel="next"` until exhausted.
    pub async fn list_applications(&self, page_size: u32) -> Result<Vec<Application>, ApiError> {
        let mut url = self.endpoint(&["api", "v1", "apps"])?;
        url.query_pairs_mut()
            .append_pair("limit", &page_size.to_string());

        let mut next = Some(url.to_string());
        let mut applications = Vec::new();
        let mut page = 0usize;

        while let Some(url) = next.take() {
            page += 1;
            debug!("Fetching application page {} from {}", page, url);

            let response = self.send(&url).await?;
            next = next_link(response.headers());

            let batch: Vec<Application> = Self::parse(response).await?;
            debug!("Page {} returned {} applications", page, batch.len());
            applications.extend(batch);
        }

        info!(
            "Retrieved {} applications in {} page(s)",
            applications.len(),
            page
        );
        Ok(applications)
    }

    /// List the features exposed by an application.
    pub async fn list_features(&self, app_id: &str) -> Result<Vec<AppFeature>, ApiError> {
        let url = self.endpoint(&["api", "v1", "apps", app_id, "features"])?;
        self.get_json(url).await
    }

    /// Fetch the detailed configuration of one named feature.
    pub async fn get_feature(
        &self,
        app_id: &str,
        feature_name: &str,
    ) -> Result<FeatureDetail, ApiError> {
        let url = self.endpoint(&["api", "v1", "apps", app_id, "features", feature_name])?;
        self.get_json(url).await
    }

    /// List profile mappings that target an application.
    pub async fn list_mappings(&self, app_id: &str) -> Result<Vec<ProfileMapping>, ApiError> {
        let mut url = self.endpoint(&["api", "v1", "mappings"])?;
        url.query_pairs_mut().append_pair("targetId", app_id);
        self.get_json(url).await
    }

    /// Fetch one profile mapping with its property expressions.
    pub async fn get_mapping(&self, mapping_id: &str) -> Result<ProfileMappingDetail, ApiError> {
        let url = self.endpoint(&["api", "v1", "mappings", mapping_id])?;
        self.get_json(url).await
    }

    /// Fetch the default app user schema of an application.
    pub async fn get_app_user_schema(&self, app_id: &str) -> Result<AppUserSchema, ApiError> {
        let url = self.endpoint(&["api", "v1", "meta", "schemas", "apps", app_id, "default"])?;
        self.get_json(url).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.send(url.as_str()).await?;
        Self::parse(response).await
    }

    async fn send(&self, url: &str) -> Result<Response, ApiError> {
        let response = self
            .http_client
            .get(url)
            .header(AUTHORIZATION, self.authorization.as_str())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(ApiError::Network)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!("GET {} failed: HTTP {}", url, status);
        Err(classify_failure(status, &body))
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

/// Map a non-success response to an `ApiError`.
///
/// Okta answers capability queries on apps that lack the capability with a
/// 4xx whose summary says the operation is not supported.
pub fn classify_failure(status: StatusCode, body: &str) -> ApiError {
    let error = serde_json::from_str::<OktaErrorBody>(body).unwrap_or_default();
    let summary = if error.error_summary.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown status")
            .to_string()
    } else {
        error.error_summary
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited,
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::FORBIDDEN => ApiError::Forbidden,
        s if s.is_client_error() && summary.to_ascii_lowercase().contains("not supported") => {
            ApiError::NotSupported(summary)
        }
        StatusCode::NOT_FOUND => ApiError::NotFound(summary),
        s => ApiError::Status {
            status: s.as_u16(),
            summary,
        },
    }
}
