//! HTTP client for a running aiclass server.

use std::time::Duration;

use aiclass_core::{
    BatchPredictItem, Category, CategoryEntry, HealthResponse, PredictRequest, PredictResponse,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
const PREDICT_TIMEOUT: Duration = Duration::from_secs(10);
const BATCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct ClassifierClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for ClassifierClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClassifierClient {
    /// Create a client for the given server, e.g. `http://localhost:8000`.
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// True only when the server answers 200, i.e. the statistical model is loaded.
    pub async fn is_healthy(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).timeout(HEALTH_TIMEOUT).send().await {
            Ok(resp) => resp.status() == StatusCode::OK,
            Err(e) => {
                debug!(url = %url, error = %e, "health check failed");
                false
            }
        }
    }

    /// Fetch the health body. A degraded (503) server still reports its state.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).timeout(HEALTH_TIMEOUT).send().await?;
        if resp.status() == StatusCode::SERVICE_UNAVAILABLE {
            let bytes = resp.bytes().await?;
            return Ok(serde_json::from_slice(&bytes)?);
        }
        decode(resp).await
    }

    pub async fn predict(&self, text: &str) -> Result<PredictResponse, ClientError> {
        let url = format!("{}/predict", self.base_url);
        let body = PredictRequest {
            text: text.to_string(),
        };
        let resp = self
            .client
            .post(&url)
            .timeout(PREDICT_TIMEOUT)
            .json(&body)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn predict_batch(
        &self,
        texts: &[String],
    ) -> Result<Vec<BatchPredictItem>, ClientError> {
        let url = format!("{}/predict_batch", self.base_url);
        info!(url = %url, count = texts.len(), "sending batch");
        let resp = self
            .client
            .post(&url)
            .timeout(BATCH_TIMEOUT)
            .json(texts)
            .send()
            .await?;
        let items: Vec<BatchPredictItem> = decode(resp).await?;
        info!(count = items.len(), "batch classified");
        Ok(items)
    }

    pub async fn categories(&self) -> Result<Vec<CategoryEntry>, ClientError> {
        let url = format!("{}/categories", self.base_url);
        let resp = self.client.get(&url).timeout(HEALTH_TIMEOUT).send().await?;
        decode(resp).await
    }
}

/// Display name for a category id, `"Unknown"` when out of range.
pub fn category_name(id: i64) -> &'static str {
    Category::try_from(id).map_or("Unknown", |c| c.name())
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Server {
            status: status.as_u16(),
            body,
        });
    }
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
