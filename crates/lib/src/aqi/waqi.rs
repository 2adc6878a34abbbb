//! World Air Quality Index (waqi.info) feed client.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

const DEFAULT_BASE_URL: &str = "https://api.waqi.info";

#[derive(Debug, thiserror::Error)]
pub enum WaqiError {
    #[error("WAQI_TOKEN not set")]
    NotConfigured,
    #[error("waqi request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("waqi api error: {0}")]
    Api(String),
    #[error("invalid waqi base url: {0}")]
    Url(String),
    #[error("no aqi reading for {0}")]
    NoReading(String),
}

/// Source of current AQI readings for a named location.
#[async_trait]
pub trait AqiSource: Send + Sync {
    async fn fetch_aqi(&self, location: &str) -> Result<i64, WaqiError>;
}

#[derive(Clone)]
pub struct WaqiClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    status: String,
    #[serde(default)]
    data: Value,
}

impl WaqiClient {
    pub fn new(token: Option<String>, base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            token,
            client: reqwest::Client::new(),
        }
    }

    /// `{base}/feed/{location}/` with the location percent-encoded as one path segment.
    fn feed_url(&self, location: &str) -> Result<reqwest::Url, WaqiError> {
        let mut url =
            reqwest::Url::parse(&self.base_url).map_err(|e| WaqiError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| WaqiError::Url(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["feed", location, ""]);
        Ok(url)
    }
}

/// `data.aqi` may be a number or a numeric string; "-" means no reading.
fn aqi_from_data(data: &Value) -> Option<i64> {
    match data.get("aqi")? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl AqiSource for WaqiClient {
    /// GET /feed/{location}/?token=…: current AQI for the nearest station.
    async fn fetch_aqi(&self, location: &str) -> Result<i64, WaqiError> {
        let token = self.token.as_deref().ok_or(WaqiError::NotConfigured)?;
        let url = self.feed_url(location)?;
        let res = self
            .client
            .get(url)
            .query(&[("token", token)])
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(WaqiError::Api(format!("{} {}", status, body)));
        }
        let feed: FeedResponse = res.json().await?;
        log::debug!("waqi: feed for {} status={}", location, feed.status);
        if feed.status != "ok" {
            return Err(WaqiError::Api(feed.data.as_str().unwrap_or("unknown error").to_string()));
        }
        aqi_from_data(&feed.data).ok_or_else(|| WaqiError::NoReading(location.to_string()))
    }
}
