//! Request and response bodies of the Dhan REST endpoints used by the relay.

use nifty_relay_core::{OrderAck, OrderDirection, OrderRequest, OrderType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DhanError, Result};

/// Body of `POST /marketfeed/ltp`.
#[derive(Debug, Clone, Serialize)]
pub struct LtpRequest<'a> {
    pub exchange: &'a str,
    pub symbol: &'a str,
}

/// Response of `POST /marketfeed/ltp`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLtpResponse {
    pub status: Option<String>,
    pub data: Option<RawLtpData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLtpData {
    pub ltp: Option<Decimal>,
}

impl RawLtpResponse {
    /// Extracts `data.ltp`.
    pub fn into_price(self) -> Result<Decimal> {
        if let Some(status) = self.status.as_deref() {
            if !status.eq_ignore_ascii_case("success") {
                return Err(DhanError::api(200, format!("quote status {status}")));
            }
        }
        self.data
            .and_then(|d| d.ltp)
            .ok_or(DhanError::MissingField("data.ltp"))
    }
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderBody<'a> {
    pub dhan_client_id: &'a str,
    pub exchange: &'a str,
    pub symbol: &'a str,
    pub transaction_type: OrderDirection,
    pub quantity: u32,
    pub product_type: &'a str,
    pub order_type: OrderType,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl<'a> PlaceOrderBody<'a> {
    pub fn new(client_id: &'a str, order: &'a OrderRequest) -> Self {
        Self {
            dhan_client_id: client_id,
            exchange: &order.exchange,
            symbol: &order.symbol,
            transaction_type: order.direction,
            quantity: order.quantity,
            product_type: &order.product_type,
            order_type: order.order_type,
            price: order.price,
        }
    }
}

/// Response of `POST /orders`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOrderResponse {
    pub order_id: Option<String>,
    pub order_status: Option<String>,
}

impl TryFrom<RawOrderResponse> for OrderAck {
    type Error = DhanError;

    fn try_from(raw: RawOrderResponse) -> Result<Self> {
        let order_id = raw
            .order_id
            .filter(|id| !id.is_empty())
            .ok_or(DhanError::MissingField("orderId"))?;

        Ok(Self {
            order_id,
            status: raw.order_status.unwrap_or_else(|| "UNKNOWN".to_string()),
        })
    }
}
