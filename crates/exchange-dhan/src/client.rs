//! Dhan REST API client.
//!
//! Two endpoints are used: last traded price lookup and order placement.
//! Every request carries the `access-token` and `client-id` headers.
//!
//! # Example
//!
//! ```ignore
//! use nifty_relay_dhan::{DhanClient, DhanClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = DhanClient::new(DhanClientConfig::new("1100223344", "token"))?;
//!     let ltp = client.get_ltp("NSE", "NIFTY").await?;
//!     println!("NIFTY spot {ltp}");
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use nifty_relay_core::{Broker, BrokerConfig, OrderAck, OrderRequest};
use reqwest::Client;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;

use crate::error::{DhanError, Result};
use crate::types::{LtpRequest, PlaceOrderBody, RawLtpResponse, RawOrderResponse};

// =============================================================================
// Constants
// =============================================================================

/// Dhan production API base URL.
pub const DHAN_API_URL: &str = "https://api.dhan.co/v2";

const LTP_PATH: &str = "/marketfeed/ltp";
const ORDERS_PATH: &str = "/orders";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the Dhan client.
pub struct DhanClientConfig {
    /// Base URL for the API.
    pub base_url: String,

    /// Dhan client identifier.
    pub client_id: String,

    /// Access token issued by the Dhan console.
    pub access_token: SecretString,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for DhanClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DhanClientConfig")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl DhanClientConfig {
    /// Creates a production configuration for the given credentials.
    #[must_use]
    pub fn new(client_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: DHAN_API_URL.to_string(),
            client_id: client_id.into(),
            access_token: SecretString::from(access_token.into()),
            timeout_secs: 10,
        }
    }

    /// Builds the client configuration from the relay's broker section.
    #[must_use]
    pub fn from_broker_config(config: &BrokerConfig) -> Self {
        Self::new(config.client_id.clone(), config.access_token.clone())
            .with_base_url(config.base_url.clone())
            .with_timeout_secs(config.timeout_secs)
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

// =============================================================================
// DhanClient
// =============================================================================

/// Dhan REST API client.
pub struct DhanClient {
    config: DhanClientConfig,
    http: Client,
}

impl std::fmt::Debug for DhanClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DhanClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl DhanClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if credentials are empty or the HTTP client cannot be built.
    pub fn new(config: DhanClientConfig) -> Result<Self> {
        if config.client_id.is_empty() {
            return Err(DhanError::Configuration("client id is empty".to_string()));
        }
        if config.access_token.expose_secret().is_empty() {
            return Err(DhanError::Configuration("access token is empty".to_string()));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DhanError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Fetches the last traded price of an instrument.
    ///
    /// # Errors
    /// Returns error if the request fails or the response has no price.
    pub async fn get_ltp(&self, exchange: &str, symbol: &str) -> Result<Decimal> {
        let response: RawLtpResponse = self
            .post(LTP_PATH, &LtpRequest { exchange, symbol })
            .await?;
        response.into_price()
    }

    /// Submits an order.
    ///
    /// # Errors
    /// Returns error if the request fails or the response has no order id.
    pub async fn submit_order(&self, order: &OrderRequest) -> Result<OrderAck> {
        let body = PlaceOrderBody::new(&self.config.client_id, order);
        let response: RawOrderResponse = self.post(ORDERS_PATH, &body).await?;
        OrderAck::try_from(response)
    }

    async fn post<T: serde::de::DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, path);

        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .header("access-token", self.config.access_token.expose_secret())
            .header("client-id", &self.config.client_id)
            .json(body)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(1);
            return Err(DhanError::rate_limit(retry_after));
        }

        if status.as_u16() == 401 || status.as_u16() == 403 {
            let text = response.text().await.unwrap_or_default();
            return Err(DhanError::Authentication(text));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DhanError::api(status.as_u16(), text));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl Broker for DhanClient {
    async fn last_traded_price(&self, exchange: &str, symbol: &str) -> anyhow::Result<Decimal> {
        Ok(self.get_ltp(exchange, symbol).await?)
    }

    async fn place_order(&self, order: &OrderRequest) -> anyhow::Result<OrderAck> {
        Ok(self.submit_order(order).await?)
    }

    fn name(&self) -> &str {
        "dhan"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> DhanClient {
        let config = DhanClientConfig::new("1100223344", "test-token").with_base_url(server.uri());
        DhanClient::new(config).expect("client")
    }

    // ==================== Config Tests ====================

    #[test]
    fn test_config_defaults() {
        let config = DhanClientConfig::new("1100223344", "token");
        assert_eq!(config.base_url, DHAN_API_URL);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_config_builder_trims_trailing_slash() {
        let config = DhanClientConfig::new("1", "t")
            .with_base_url("http://localhost:9000/")
            .with_timeout_secs(3);
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.timeout_secs, 3);
    }

    #[test]
    fn test_config_from_broker_section() {
        let broker = BrokerConfig {
            client_id: "42".to_string(),
            access_token: "tok".to_string(),
            timeout_secs: 7,
            ..BrokerConfig::default()
        };
        let config = DhanClientConfig::from_broker_config(&broker);
        assert_eq!(config.client_id, "42");
        assert_eq!(config.access_token.expose_secret(), "tok");
        assert_eq!(config.timeout_secs, 7);
    }

    #[test]
    fn test_debug_hides_credentials() {
        let config = DhanClientConfig::new("1100223344", "super-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("1100223344"));
    }

    #[test]
    fn test_empty_credentials_rejected() {
        assert!(matches!(
            DhanClient::new(DhanClientConfig::new("", "token")),
            Err(DhanError::Configuration(_))
        ));
        assert!(matches!(
            DhanClient::new(DhanClientConfig::new("1", "")),
            Err(DhanError::Configuration(_))
        ));
    }

    // ==================== Mock Server Tests ====================

    #[tokio::test]
    async fn test_get_ltp_sends_credentials_and_parses_price() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/marketfeed/ltp"))
            .and(header("access-token", "test-token"))
            .and(header("client-id", "1100223344"))
            .and(body_json(serde_json::json!({"exchange": "NSE", "symbol": "NIFTY"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "data": {"ltp": 22512.35}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let price = client_for(&server).get_ltp("NSE", "NIFTY").await.unwrap();
        assert_eq!(price, dec!(22512.35));
    }

    #[tokio::test]
    async fn test_submit_order_returns_ack() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/orders"))
            .and(body_json(serde_json::json!({
                "dhanClientId": "1100223344",
                "exchange": "NFO",
                "symbol": "NIFTY 22500 CE",
                "transactionType": "BUY",
                "quantity": 50,
                "productType": "MIS",
                "orderType": "MARKET",
                "price": 0.0
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "orderId": "112111182198",
                "orderStatus": "PENDING"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let order = OrderRequest::market_buy("NFO", "NIFTY 22500 CE", 50, "MIS");
        let ack = client_for(&server).submit_order(&order).await.unwrap();
        assert_eq!(ack.order_id, "112111182198");
        assert_eq!(ack.status, "PENDING");
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/marketfeed/ltp"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_ltp("NSE", "NIFTY").await.unwrap_err();
        assert!(matches!(err, DhanError::Authentication(ref m) if m.contains("invalid token")));
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/orders"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "5"))
            .mount(&server)
            .await;

        let order = OrderRequest::market_buy("NFO", "NIFTY 22500 PE", 50, "MIS");
        let err = client_for(&server).submit_order(&order).await.unwrap_err();
        assert!(matches!(err, DhanError::RateLimit { retry_after_secs: 5 }));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/orders"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream failure"))
            .mount(&server)
            .await;

        let order = OrderRequest::market_buy("NFO", "NIFTY 22500 PE", 50, "MIS");
        let err = client_for(&server).submit_order(&order).await.unwrap_err();
        assert!(matches!(err, DhanError::Api { status_code: 500, .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_malformed_body_maps_to_serialization_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/marketfeed/ltp"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_ltp("NSE", "NIFTY").await.unwrap_err();
        assert!(matches!(err, DhanError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_broker_trait_wraps_client_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/marketfeed/ltp"))
            .respond_with(ResponseTemplate::new(400).set_body_string("DH-905"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let broker: &dyn Broker = &client;
        let err = broker.last_traded_price("NSE", "NIFTY").await.unwrap_err();
        assert!(err.to_string().contains("DH-905"));
        assert_eq!(broker.name(), "dhan");
    }
}
