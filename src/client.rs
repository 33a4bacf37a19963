//! HTTP client for the GDS low-fare shop endpoint

use crate::flatten::flatten_with_report;
use crate::request::ShopRequest;
use crate::{FlatSummary, FlightError, SearchRequest};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

pub const DEFAULT_BASE_URL: &str = "https://api.cert.platform.sabre.com/";
pub const SHOP_PATH: &str = "v5/offers/shop";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const TOKEN_VAR: &str = "GDS_AUTH_TOKEN";
pub const PCC_VAR: &str = "GDS_PCC";
pub const BASE_URL_VAR: &str = "GDS_BASE_URL";
pub const TIMEOUT_VAR: &str = "GDS_TIMEOUT_SECS";

/// Credentials and endpoint settings for [`ShopClient`]
#[derive(Clone)]
pub struct ShopConfig {
    pub bearer_token: String,
    pub pseudo_city_code: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ShopConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopConfig")
            .field("bearer_token", &"<redacted>")
            .field("pseudo_city_code", &self.pseudo_city_code)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ShopConfig {
    pub fn new(bearer_token: impl Into<String>, pseudo_city_code: impl Into<String>) -> Self {
        Self {
            bearer_token: bearer_token.into(),
            pseudo_city_code: pseudo_city_code.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `GDS_AUTH_TOKEN`, `GDS_PCC` and optionally `GDS_BASE_URL` / `GDS_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, FlightError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FlightError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| FlightError::MissingConfig(key.to_string()))
        };

        let mut config = Self::new(required(TOKEN_VAR)?, required(PCC_VAR)?);

        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url;
        }
        if let Some(secs) = lookup(TIMEOUT_VAR) {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                FlightError::InvalidRequest(format!(
                    "{} must be a whole number of seconds, got {}",
                    TIMEOUT_VAR, secs
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Full URL of the shop endpoint
    pub fn shop_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), SHOP_PATH)
    }

    /// `Authorization` header value. A token that already names the bearer
    /// scheme, in any letter case, is not prefixed a second time.
    pub fn authorization(&self) -> String {
        let token = self.bearer_token.trim();
        let credentials = match token.split_once(char::is_whitespace) {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim_start(),
            _ => token,
        };
        format!("Bearer {}", credentials)
    }
}

/// Client for a single low-fare search per call
pub struct ShopClient {
    http_client: Client,
    config: ShopConfig,
}

impl ShopClient {
    pub fn new(config: ShopConfig) -> Result<Self, FlightError> {
        debug!(
            base_url = %config.base_url,
            timeout_secs = config.timeout.as_secs(),
            "Creating shop client"
        );
        let http_client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { http_client, config })
    }

    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    /// Post the shop request and return the raw response document
    #[instrument(
        level = "info",
        skip(self, request),
        fields(origin = %request.origin, destination = %request.destination)
    )]
    pub async fn shop(&self, request: &SearchRequest) -> Result<Value, FlightError> {
        let payload = ShopRequest::new(request, &self.config.pseudo_city_code);
        let url = self.config.shop_url();
        info!(url = %url, date = %request.departure_date, "Sending low-fare search request");

        let start_time = std::time::Instant::now();
        let response = self
            .http_client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, self.config.authorization())
            .json(&payload)
            .send()
            .await?;
        let status = response.status();

        info!(
            status = %status,
            duration_ms = start_time.elapsed().as_millis(),
            "HTTP request completed"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "Shop request failed");
            return Err(FlightError::ApiError {
                status: status.as_u16(),
                body: pretty_body(&body),
            });
        }

        let document = response.json::<Value>().await?;
        Ok(document)
    }

    /// Search and flatten the response into summaries
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<FlatSummary>, FlightError> {
        let document = self.shop(request).await?;

        let start_parse = std::time::Instant::now();
        let report = flatten_with_report(&document);
        info!(
            parse_duration_ms = start_parse.elapsed().as_millis(),
            parsed = report.summaries.len(),
            skipped = report.skipped,
            "Response flattened"
        );

        Ok(report.summaries)
    }
}

/// Re-indent JSON error bodies; anything else is returned unchanged
fn pretty_body(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_config_from_lookup() {
        let env = vars(&[(TOKEN_VAR, "T1"), (PCC_VAR, "ABCD")]);
        let config = ShopConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.bearer_token, "T1");
        assert_eq!(config.pseudo_city_code, "ABCD");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_config_overrides() {
        let env = vars(&[
            (TOKEN_VAR, "T1"),
            (PCC_VAR, "ABCD"),
            (BASE_URL_VAR, "http://localhost:8080"),
            (TIMEOUT_VAR, "5"),
        ]);
        let config = ShopConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.shop_url(), "http://localhost:8080/v5/offers/shop");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_config_missing_credentials() {
        let env = vars(&[(PCC_VAR, "ABCD")]);
        match ShopConfig::from_lookup(|k| env.get(k).cloned()) {
            Err(FlightError::MissingConfig(var)) => assert_eq!(var, TOKEN_VAR),
            other => panic!("unexpected result: {:?}", other),
        }

        let env = vars(&[(TOKEN_VAR, "T1"), (PCC_VAR, "  ")]);
        assert!(matches!(
            ShopConfig::from_lookup(|k| env.get(k).cloned()),
            Err(FlightError::MissingConfig(_))
        ));
    }

    #[test]
    fn test_config_bad_timeout() {
        let env = vars(&[(TOKEN_VAR, "T1"), (PCC_VAR, "ABCD"), (TIMEOUT_VAR, "soon")]);
        assert!(matches!(
            ShopConfig::from_lookup(|k| env.get(k).cloned()),
            Err(FlightError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_shop_url_and_authorization() {
        let config = ShopConfig::new("abc", "PCC1");
        assert_eq!(config.shop_url(), "https://api.cert.platform.sabre.com/v5/offers/shop");
        assert_eq!(config.authorization(), "Bearer abc");

        let config = ShopConfig::new("Bearer xyz", "PCC1");
        assert_eq!(config.authorization(), "Bearer xyz");
    }

    #[test]
    fn test_authorization_scheme_is_case_insensitive() {
        for token in ["bearer abc", "BEARER abc", "  Bearer   abc ", "abc"] {
            assert_eq!(ShopConfig::new(token, "PCC1").authorization(), "Bearer abc");
        }
        assert_eq!(ShopConfig::new("bearerabc", "PCC1").authorization(), "Bearer bearerabc");
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ShopConfig::new("secret-token", "PCC1");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("PCC1"));
    }

    #[test]
    fn test_pretty_body() {
        assert_eq!(pretty_body("plain failure"), "plain failure");
        assert_eq!(pretty_body(r#"{"a":1}"#), "{\n  \"a\": 1\n}");
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = ShopClient::new(ShopConfig::new("abc", "PCC1"));
        assert!(client.is_ok());
    }

    #[test]
    fn test_unreachable_endpoint_is_http_error() {
        let config = ShopConfig::new("abc", "PCC1")
            .with_base_url("http://127.0.0.1:9/")
            .with_timeout(Duration::from_secs(5));
        let client = ShopClient::new(config).unwrap();
        let request = SearchRequest::new("JFK", "LAX", "2025-09-05").unwrap();

        let result = tokio_test::block_on(client.search(&request));
        assert!(matches!(result, Err(FlightError::HttpError(_))));
    }
}
