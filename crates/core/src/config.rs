use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub broker: BrokerConfig,
    pub strategy: StrategyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// Socket address string for `TcpListener::bind`.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub base_url: String,
    #[serde(deserialize_with = "string_or_number")]
    pub client_id: String,
    pub access_token: String,
    /// Upper bound on every outbound broker call, in seconds.
    pub timeout_secs: u64,
    /// Simulate order placement instead of sending it to the broker.
    pub paper: bool,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.dhan.co/v2".to_string(),
            client_id: String::new(),
            access_token: String::new(),
            timeout_secs: 10,
            paper: false,
        }
    }
}

// Broker client ids are numeric, and env providers hand them over as numbers.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

// Hand-written so the access token never reaches a log line.
impl std::fmt::Debug for BrokerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("access_token", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("paper", &self.paper)
            .finish()
    }
}

/// Fixed trading parameters of the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Token an alert message must contain (case-insensitive) to be actionable.
    pub marker: String,
    /// Index whose spot price drives strike selection, e.g. "NIFTY".
    pub underlying: String,
    /// Exchange used for the spot price lookup.
    pub quote_exchange: String,
    /// Exchange used for the option order.
    pub order_exchange: String,
    pub strike_interval: Decimal,
    pub quantity: u32,
    pub product_type: String,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            marker: "ZIGZAG".to_string(),
            underlying: "NIFTY".to_string(),
            quote_exchange: "NSE".to_string(),
            order_exchange: "NFO".to_string(),
            strike_interval: Decimal::from(50),
            quantity: 50,
            product_type: "MIS".to_string(),
        }
    }
}

impl AppConfig {
    /// Checks values that would otherwise only fail on the first live signal.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid field.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.strategy.marker.trim().is_empty() {
            anyhow::bail!("strategy.marker must not be empty");
        }
        if self.strategy.underlying.trim().is_empty() {
            anyhow::bail!("strategy.underlying must not be empty");
        }
        if self.strategy.strike_interval <= Decimal::ZERO {
            anyhow::bail!("strategy.strike_interval must be positive");
        }
        if self.strategy.quantity == 0 {
            anyhow::bail!("strategy.quantity must be at least 1");
        }
        if self.broker.timeout_secs == 0 {
            anyhow::bail!("broker.timeout_secs must be at least 1");
        }
        // Paper mode still quotes from the live feed.
        if self.broker.client_id.is_empty() || self.broker.access_token.is_empty() {
            anyhow::bail!("broker credentials missing: set DHAN_CLIENT_ID and DHAN_ACCESS_TOKEN");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_credentials() -> AppConfig {
        let mut config = AppConfig::default();
        config.broker.client_id = "1000000001".to_string();
        config.broker.access_token = "token".to_string();
        config
    }

    #[test]
    fn test_defaults_match_source_deployment() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.strategy.marker, "ZIGZAG");
        assert_eq!(config.strategy.underlying, "NIFTY");
        assert_eq!(config.strategy.strike_interval, Decimal::from(50));
        assert_eq!(config.strategy.quantity, 50);
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        assert!(with_credentials().validate().is_ok());
    }

    #[test]
    fn test_validate_requires_credentials_even_in_paper_mode() {
        let config = AppConfig::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("DHAN_CLIENT_ID"));

        let mut paper = AppConfig::default();
        paper.broker.paper = true;
        assert!(paper.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = with_credentials();
        config.strategy.strike_interval = Decimal::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_quantity() {
        let mut config = with_credentials();
        config.strategy.quantity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_numeric_client_id_is_accepted() {
        let broker: BrokerConfig =
            serde_json::from_str(r#"{"client_id": 1100223344}"#).expect("parse");
        assert_eq!(broker.client_id, "1100223344");
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = with_credentials();
        let debug = format!("{:?}", config.broker);
        assert!(!debug.contains("\"token\""));
        assert!(debug.contains("<redacted>"));
    }
}
