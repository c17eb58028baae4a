use crate::events::{OrderAck, OrderRequest};
use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Brokerage operations the relay depends on.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Last traded price of `symbol` on `exchange`.
    async fn last_traded_price(&self, exchange: &str, symbol: &str) -> Result<Decimal>;

    /// Submits an order. Success means the broker accepted it, not that it filled.
    async fn place_order(&self, order: &OrderRequest) -> Result<OrderAck>;

    fn name(&self) -> &str;
}
