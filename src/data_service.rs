use std::time::Duration;

use reqwest::Client;

use crate::error::UpstreamError;

const SERVICE: &str = "data service";

/// Which cash-flow data provider backs a client's bank data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashflowSource {
    Plaid,
    Yodlee,
    Unclassified,
}

impl CashflowSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CashflowSource::Plaid => "PLAID",
            CashflowSource::Yodlee => "YODLEE",
            CashflowSource::Unclassified => "",
        }
    }

    fn from_label(label: &str) -> Self {
        match label.trim() {
            "PLAID" => CashflowSource::Plaid,
            "YODLEE" => CashflowSource::Yodlee,
            "" => CashflowSource::Unclassified,
            other => {
                tracing::warn!(source = other, "Unknown cash-flow source, storing it as unclassified");
                CashflowSource::Unclassified
            }
        }
    }
}

#[async_trait::async_trait]
pub trait CashflowSourceClassifier: Send + Sync {
    async fn classify(&self, client_id: i32) -> Result<CashflowSource, UpstreamError>;
}

#[derive(serde::Deserialize)]
struct CashflowSourceResponse {
    #[serde(default)]
    source: Option<String>,
}

pub struct DataServiceClient {
    http_client: Client,
    base_url: String,
}

impl DataServiceClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl CashflowSourceClassifier for DataServiceClient {
    #[tracing::instrument(name = "Classifying client cash-flow source", skip(self))]
    async fn classify(&self, client_id: i32) -> Result<CashflowSource, UpstreamError> {
        let url = format!("{}/client/{}/cashflow/source", self.base_url, client_id);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|source| UpstreamError::Unreachable { service: SERVICE, source })?;

        if !response.status().is_success() {
            return Err(UpstreamError::Status {
                service: SERVICE,
                status: response.status(),
            });
        }

        let body: CashflowSourceResponse = response
            .json()
            .await
            .map_err(|source| UpstreamError::Body { service: SERVICE, source })?;

        Ok(CashflowSource::from_label(body.source.as_deref().unwrap_or_default()))
    }
}
