use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Url, header::USER_AGENT};
use serde::Deserialize;
use std::fmt::Debug;
use tracing::{debug, instrument, warn};

use crate::{
    error::MeteoError,
    model::WeatherData,
    options::Options,
    request::{self, Endpoints},
};

/// User-Agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = "OpenMeteo-Rust-Client";

/// Anything that can answer a weather query.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self, options: &Options) -> Result<WeatherData, MeteoError>;
}

/// Open-Meteo HTTP client.
///
/// Cloning is cheap; the underlying `reqwest::Client` is reference counted and
/// safe to share between tasks. No timeout is set here; pass a configured
/// `reqwest::Client` via [`Client::with_http_client`] for deadlines.
#[derive(Debug, Clone)]
pub struct Client {
    api_key: Option<String>,
    user_agent: String,
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Client for the free API.
    pub fn new() -> Self {
        Self {
            api_key: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http: reqwest::Client::new(),
            endpoints: Endpoints::default(),
        }
    }

    /// Client for the commercial API. An empty key behaves like [`Client::new`].
    pub fn with_key(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        Self { api_key: (!api_key.is_empty()).then_some(api_key), ..Self::new() }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Swap the transport in place.
    pub fn set_http_client(&mut self, http: reqwest::Client) {
        self.http = http;
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Request URL for `options`, routed as of now.
    pub fn url(&self, options: &Options) -> Result<Url, MeteoError> {
        self.url_at(options, Utc::now())
    }

    pub fn url_at(&self, options: &Options, now: DateTime<Utc>) -> Result<Url, MeteoError> {
        request::build_url(&self.endpoints, options, self.api_key.as_deref(), now)
    }

    /// Same as [`Client::url`] with the API key value masked, for display.
    pub fn redacted_url(&self, options: &Options) -> Result<Url, MeteoError> {
        let masked = self.api_key.as_ref().map(|_| "REDACTED");
        request::build_url(&self.endpoints, options, masked, Utc::now())
    }

    /// Fetch and decode weather data. One GET per call, no retries.
    #[instrument(skip(self, options), fields(product = %options.product))]
    pub async fn get(&self, options: &Options) -> Result<WeatherData, MeteoError> {
        let url = self.url(options)?;

        debug!(
            host = url.host_str().unwrap_or_default(),
            path = url.path(),
            commercial = self.has_api_key(),
            "Fetching weather data"
        );

        let res = self
            .http
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    MeteoError::Request(e.to_string())
                } else {
                    MeteoError::Transport(e)
                }
            })?;

        let status = res.status();
        let body = res.text().await.map_err(MeteoError::Transport)?;

        if !status.is_success() {
            let reason = error_reason(&body);
            warn!(status = status.as_u16(), %reason, "Open-Meteo request failed");
            return Err(MeteoError::Server { status: status.as_u16(), reason });
        }

        let data: WeatherData = serde_json::from_str(&body)?;
        debug!(
            latitude = data.latitude,
            longitude = data.longitude,
            generationtime_ms = data.generationtime_ms,
            "Decoded weather data"
        );

        Ok(data)
    }
}

#[async_trait]
impl WeatherSource for Client {
    async fn fetch(&self, options: &Options) -> Result<WeatherData, MeteoError> {
        self.get(options).await
    }
}

/// Error body the API sends with 4xx responses.
#[derive(Debug, Deserialize)]
struct ApiError {
    reason: String,
}

fn error_reason(body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(err) => err.reason,
        Err(_) => truncate_body(body),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn new_client_has_defaults() {
        let client = Client::new();
        assert!(!client.has_api_key());
        assert_eq!(client.user_agent(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn empty_key_means_free_api() {
        assert!(!Client::with_key("").has_api_key());
        assert!(Client::with_key("abc").has_api_key());
    }

    #[test]
    fn url_at_routes_old_start_to_archive() {
        let client = Client::new();
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();
        let opts = Options::builder()
            .latitude(37.7749)
            .longitude(-122.4194)
            .start(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())
            .end(NaiveDate::from_ymd_opt(2025, 1, 26).unwrap())
            .build();

        let url = client.url_at(&opts, now).unwrap();
        assert_eq!(
            url.as_str(),
            "https://archive-api.open-meteo.com/v1/archive?latitude=37.7749&longitude=-122.4194\
             &start_date=2025-01-15&end_date=2025-01-26"
        );
    }

    #[test]
    fn url_with_key_uses_customer_host() {
        let client = Client::with_key("testkey");
        let opts = Options::builder().seasonal(true).build();

        let url = client.url(&opts).unwrap();
        assert_eq!(url.host_str(), Some("customer-seasonal-api.open-meteo.com"));
        assert_eq!(url.query(), Some("apikey=testkey&latitude=0&longitude=0"));
    }

    #[test]
    fn redacted_url_hides_key() {
        let client = Client::with_key("super-secret");
        let url = client.redacted_url(&Options::default()).unwrap();

        assert!(!url.as_str().contains("super-secret"));
        assert!(url.as_str().contains("apikey=REDACTED"));
    }

    #[test]
    fn error_reason_prefers_api_reason() {
        let body = r#"{"error": true, "reason": "Cannot initialize WeatherVariable from invalid String value foo"}"#;
        assert_eq!(
            error_reason(body),
            "Cannot initialize WeatherVariable from invalid String value foo"
        );
    }

    #[test]
    fn error_reason_falls_back_to_truncated_body() {
        assert_eq!(error_reason("Bad Gateway"), "Bad Gateway");

        let long = "é".repeat(250);
        let reason = error_reason(&long);
        assert!(reason.ends_with("..."));
        assert_eq!(reason.chars().count(), 203);
    }
}
