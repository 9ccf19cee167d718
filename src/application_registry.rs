use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::error::UpstreamError;

const SERVICE: &str = "origination service";

#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ApplicationSummary {
    pub application_id: i32,
    pub client_id: i32,
    #[serde(default)]
    pub business_name: Option<String>,
}

/// Lookup of loan applications owned by the origination service.
#[async_trait::async_trait]
pub trait ApplicationRegistry: Send + Sync {
    /// `Ok(None)` when the registry does not know the application.
    async fn get_application(
        &self,
        application_id: i32,
    ) -> Result<Option<ApplicationSummary>, UpstreamError>;
}

pub struct OriginationClient {
    http_client: Client,
    base_url: String,
}

impl OriginationClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl ApplicationRegistry for OriginationClient {
    #[tracing::instrument(name = "Fetching application from origination service", skip(self))]
    async fn get_application(
        &self,
        application_id: i32,
    ) -> Result<Option<ApplicationSummary>, UpstreamError> {
        let url = format!("{}/application/{}", self.base_url, application_id);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|source| UpstreamError::Unreachable { service: SERVICE, source })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .json()
                .await
                .map(Some)
                .map_err(|source| UpstreamError::Body { service: SERVICE, source }),
            status => Err(UpstreamError::Status { service: SERVICE, status }),
        }
    }
}
