use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDirection {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Market,
    Limit,
}

/// Order handed to a [`crate::Broker`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub exchange: String,
    pub symbol: String,
    pub direction: OrderDirection,
    pub quantity: u32,
    pub product_type: String,
    pub order_type: OrderType,
    /// Zero for market orders.
    pub price: Decimal,
}

impl OrderRequest {
    /// Market buy with no price limit.
    #[must_use]
    pub fn market_buy(
        exchange: impl Into<String>,
        symbol: impl Into<String>,
        quantity: u32,
        product_type: impl Into<String>,
    ) -> Self {
        Self {
            exchange: exchange.into(),
            symbol: symbol.into(),
            direction: OrderDirection::Buy,
            quantity,
            product_type: product_type.into(),
            order_type: OrderType::Market,
            price: Decimal::ZERO,
        }
    }
}

/// Broker acknowledgement of a submitted order. Not a fill confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAck {
    pub order_id: String,
    pub status: String,
}

/// Order status notification pushed by the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostbackEvent {
    pub status: String,
    #[serde(default)]
    pub transaction_type: Option<String>,
    /// Remaining payload fields, kept for logging.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PostbackEvent {
    #[must_use]
    pub fn new(status: impl Into<String>, transaction_type: Option<&str>) -> Self {
        Self {
            status: status.into(),
            transaction_type: transaction_type.map(str::to_string),
            extra: serde_json::Map::new(),
        }
    }

    /// `COMPLETE`, `REJECTED` or `CANCELLED`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "COMPLETE" | "REJECTED" | "CANCELLED")
    }

    /// A completed sell, the only event that releases the position lock.
    #[must_use]
    pub fn is_completed_exit(&self) -> bool {
        self.status == "COMPLETE" && self.transaction_type.as_deref() == Some("SELL")
    }
}
