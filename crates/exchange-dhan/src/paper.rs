//! Paper trading execution shim.
//!
//! Quotes come from a real broker; orders are acknowledged locally and never
//! leave the process. Useful for running the relay against live alerts
//! before trusting it with money.

use async_trait::async_trait;
use chrono::Utc;
use nifty_relay_core::{Broker, OrderAck, OrderRequest};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

pub struct PaperBroker {
    quotes: Arc<dyn Broker>,
    sequence: AtomicU64,
}

impl PaperBroker {
    #[must_use]
    pub fn new(quotes: Arc<dyn Broker>) -> Self {
        Self {
            quotes,
            sequence: AtomicU64::new(0),
        }
    }

    /// Number of simulated orders so far.
    #[must_use]
    pub fn orders_simulated(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Broker for PaperBroker {
    async fn last_traded_price(&self, exchange: &str, symbol: &str) -> anyhow::Result<Decimal> {
        self.quotes.last_traded_price(exchange, symbol).await
    }

    async fn place_order(&self, order: &OrderRequest) -> anyhow::Result<OrderAck> {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let ack = OrderAck {
            order_id: format!("PAPER-{}-{}", Utc::now().timestamp_millis(), seq),
            status: "PAPER".to_string(),
        };

        info!(
            order_id = %ack.order_id,
            exchange = %order.exchange,
            symbol = %order.symbol,
            direction = ?order.direction,
            quantity = order.quantity,
            "Paper order simulated"
        );

        Ok(ack)
    }

    fn name(&self) -> &str {
        "paper"
    }
}
