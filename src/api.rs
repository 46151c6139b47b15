//! HTTP client for the myPV cloud API
//!
//! Every request is an authenticated GET bounded by the configured timeout.
//! Failures are classified into [`FetchError`] kinds and logged with the
//! failing URL; retries are left to the caller's schedule.

use crate::config::ApiConfig;
use crate::device::DeviceIdentity;
use crate::error::{FetchError, MyPvError, Result};
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Data category, one per upstream resource and poller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Live device data
    Data,
    /// State of charge
    Soc,
    /// Solar forecast
    Forecast,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Data, Category::Soc, Category::Forecast];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Data => "data",
            Category::Soc => "soc",
            Category::Forecast => "forecast",
        }
    }

    /// Path suffix of this category's resource for `serial`
    pub fn endpoint(&self, serial: &str) -> String {
        match self {
            Category::Data => format!("/device/{}/data", serial),
            Category::Soc => format!("/device/{}/data/soc", serial),
            Category::Forecast => format!("/device/{}/solarForecast", serial),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = MyPvError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "data" => Ok(Category::Data),
            "soc" => Ok(Category::Soc),
            "forecast" => Ok(Category::Forecast),
            other => Err(MyPvError::validation(
                "category".to_string(),
                format!("Unknown category: {}", other),
            )),
        }
    }
}

/// Source of raw JSON payloads for one device
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    /// Serial of the device this client talks to
    fn serial(&self) -> &str;

    /// Fetch the raw payload of `category`
    async fn fetch(&self, category: Category) -> std::result::Result<Value, FetchError>;

    /// Device data
    async fn get_data(&self) -> std::result::Result<Value, FetchError> {
        self.fetch(Category::Data).await
    }

    /// State of charge data
    async fn get_soc(&self) -> std::result::Result<Value, FetchError> {
        self.fetch(Category::Soc).await
    }

    /// Solar forecast data
    async fn get_solar_forecast(&self) -> std::result::Result<Value, FetchError> {
        self.fetch(Category::Forecast).await
    }

    /// Test if we can communicate with the API by fetching device data once
    async fn validate_connection(&self) -> bool {
        match self.get_data().await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(serial = self.serial(), "Failed to validate connection: {}", e);
                false
            }
        }
    }
}

/// reqwest-backed client for the myPV cloud
pub struct MyPvClient {
    identity: DeviceIdentity,
    base_url: String,
    http: reqwest::Client,
    logger: StructuredLogger,
}

impl MyPvClient {
    /// Build a client with its own connection pool
    pub fn new(identity: DeviceIdentity, api: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("mypv/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|e| MyPvError::config(format!("Invalid user agent: {}", e)))?,
        );
        let http = reqwest::Client::builder()
            .timeout(api.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| MyPvError::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_http_client(identity, &api.base_url, http))
    }

    /// Build a client on top of an existing (shared) reqwest client
    pub fn with_http_client(
        identity: DeviceIdentity,
        base_url: &str,
        http: reqwest::Client,
    ) -> Self {
        let logger = get_logger_with_context(LogContext::new("api").with_serial(identity.serial()));
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            identity,
            http,
            logger,
        }
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Full URL of `category` for this device
    pub fn url_for(&self, category: Category) -> String {
        format!(
            "{}{}",
            self.base_url,
            category.endpoint(self.identity.serial())
        )
    }

    async fn get_json(&self, url: &str) -> std::result::Result<Value, FetchError> {
        let result: std::result::Result<Value, FetchError> = async {
            let response = self
                .http
                .get(url)
                .bearer_auth(self.identity.api_key())
                .header(ACCEPT, "application/json")
                .send()
                .await
                .map_err(|e| FetchError::from_reqwest(url, e))?;
            let response = response
                .error_for_status()
                .map_err(|e| FetchError::from_reqwest(url, e))?;
            response
                .json::<Value>()
                .await
                .map_err(|e| FetchError::from_reqwest(url, e))
        }
        .await;

        if let Err(ref e) = result {
            match e {
                FetchError::Timeout { .. } => self
                    .logger
                    .error(&format!("Timeout error fetching information from {}", url)),
                FetchError::Transport { source, .. } => self.logger.error(&format!(
                    "Error fetching information from {}: {}",
                    url, source
                )),
                FetchError::HttpStatus { status, .. } => self.logger.error(&format!(
                    "Error fetching information from {}: HTTP {}",
                    url, status
                )),
                FetchError::Unexpected { message, .. } => self.logger.error(&format!(
                    "Unexpected error fetching from {}: {}",
                    url, message
                )),
            }
        }
        result
    }
}

#[async_trait::async_trait]
impl ApiClient for MyPvClient {
    fn serial(&self) -> &str {
        self.identity.serial()
    }

    async fn fetch(&self, category: Category) -> std::result::Result<Value, FetchError> {
        let url = self.url_for(category);
        self.logger.trace(&format!("GET {}", url));
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_follow_api_layout() {
        assert_eq!(Category::Data.endpoint("123"), "/device/123/data");
        assert_eq!(Category::Soc.endpoint("123"), "/device/123/data/soc");
        assert_eq!(
            Category::Forecast.endpoint("123"),
            "/device/123/solarForecast"
        );
    }

    #[test]
    fn category_parse_and_display() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("history".parse::<Category>().is_err());
        assert_eq!(Category::Soc.to_string(), "soc");
    }

    #[test]
    fn url_joins_base_and_endpoint() {
        let client = MyPvClient::new(
            DeviceIdentity::new("2001003", "key"),
            &ApiConfig {
                base_url: "https://api.my-pv.com/api/v1/".to_string(),
                timeout_seconds: 30,
            },
        )
        .unwrap();
        assert_eq!(
            client.url_for(Category::Forecast),
            "https://api.my-pv.com/api/v1/device/2001003/solarForecast"
        );
    }
}
