use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::{ApiError, EngineEvent, ProgressPage};

const LAST_SCRAPE_PATH: &str = "api/scraping/last-time";
const REFRESH_PATH: &str = "api/scraping/refresh";
const PROGRESS_PATH: &str = "api/scraping/progress";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ApiSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Requests the dashboard makes against the scrape backend.
#[async_trait::async_trait]
pub trait ScrapeApi: Send + Sync {
    /// Time of the last successful scrape, or `None` if there never was one.
    async fn last_scrape_time(&self) -> Result<Option<i64>, ApiError>;

    /// Starts a new scrape run.
    async fn trigger_refresh(&self) -> Result<(), ApiError>;

    /// Progress events recorded after `cursor` for the current run.
    async fn progress_since(&self, cursor: u64) -> Result<ProgressPage, ApiError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LastScrapeResponse {
    last_scrape_time: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct ReqwestScrapeApi {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestScrapeApi {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::InvalidUrl(format!("{}: {err}", settings.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(settings.base_url.clone()));
        }
        // Url::join replaces the last segment unless the path ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::InvalidUrl(err.to_string()))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.send(self.client.get(url)).await?;
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

#[async_trait::async_trait]
impl ScrapeApi for ReqwestScrapeApi {
    async fn last_scrape_time(&self) -> Result<Option<i64>, ApiError> {
        let url = self.endpoint(LAST_SCRAPE_PATH)?;
        let body: LastScrapeResponse = self.get_json(url).await?;
        Ok(body.last_scrape_time)
    }

    async fn trigger_refresh(&self) -> Result<(), ApiError> {
        let url = self.endpoint(REFRESH_PATH)?;
        self.send(self.client.post(url)).await?;
        Ok(())
    }

    async fn progress_since(&self, cursor: u64) -> Result<ProgressPage, ApiError> {
        let mut url = self.endpoint(PROGRESS_PATH)?;
        url.query_pairs_mut()
            .append_pair("since", &cursor.to_string());
        self.get_json(url).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Network(err.to_string())
    }
}
