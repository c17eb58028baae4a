use crate::config::{AppConfig, StrategyConfig};
use crate::error::{RelayError, Result};
use crate::events::{OrderRequest, PostbackEvent};
use crate::position::{PositionSnapshot, PositionState};
use crate::signal::{atm_strike, choose_side, is_actionable, option_symbol, OptionSide};
use crate::traits::Broker;
use rust_decimal::Decimal;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Result of one alert delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalOutcome {
    Ignored,
    TradeLocked,
    FirstPriceStored {
        price: Decimal,
    },
    OrderPlaced {
        symbol: String,
        order_id: String,
        side: OptionSide,
        strike: Decimal,
        spot: Decimal,
    },
}

/// Result of one postback delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostbackOutcome {
    Acknowledged,
    Released { symbol: String },
}

/// Both webhook handlers around one guarded [`PositionState`].
///
/// The state mutex is held across the whole check, quote, decide, order and
/// commit sequence. Signals are low frequency, so serializing them is cheap
/// and guarantees a single order per flat period.
pub struct RelayEngine {
    broker: Arc<dyn Broker>,
    strategy: StrategyConfig,
    broker_timeout: Duration,
    state: Mutex<PositionState>,
}

impl RelayEngine {
    #[must_use]
    pub fn new(broker: Arc<dyn Broker>, strategy: StrategyConfig, broker_timeout: Duration) -> Self {
        Self {
            broker,
            strategy,
            broker_timeout,
            state: Mutex::new(PositionState::new()),
        }
    }

    #[must_use]
    pub fn from_config(broker: Arc<dyn Broker>, config: &AppConfig) -> Self {
        Self::new(
            broker,
            config.strategy.clone(),
            Duration::from_secs(config.broker.timeout_secs),
        )
    }

    #[must_use]
    pub const fn strategy(&self) -> &StrategyConfig {
        &self.strategy
    }

    pub async fn snapshot(&self) -> PositionSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Processes an alert message.
    ///
    /// # Errors
    ///
    /// Returns an error if a broker call fails or times out, or the quoted
    /// price is not positive. Position state is left untouched in every
    /// error case.
    pub async fn handle_signal(&self, message: &str) -> Result<SignalOutcome> {
        if !is_actionable(message, &self.strategy.marker) {
            debug!(alert = message, "Signal ignored");
            return Ok(SignalOutcome::Ignored);
        }

        let mut state = self.state.lock().await;

        if let Some(open) = state.current_position() {
            info!(symbol = %open.symbol, "Signal skipped, trade locked");
            return Ok(SignalOutcome::TradeLocked);
        }

        let spot = self
            .call(
                "last_traded_price",
                self.broker
                    .last_traded_price(&self.strategy.quote_exchange, &self.strategy.underlying),
            )
            .await?;

        if spot <= Decimal::ZERO {
            warn!(spot = %spot, "Broker returned a non-positive price");
            return Err(RelayError::InvalidPrice(spot.to_string()));
        }

        let Some(last_price) = state.last_price() else {
            state.record_price(spot);
            info!(spot = %spot, "First price stored");
            return Ok(SignalOutcome::FirstPriceStored { price: spot });
        };

        let side = choose_side(spot, last_price);
        let strike = atm_strike(spot, self.strategy.strike_interval);
        let symbol = option_symbol(&self.strategy.underlying, strike, side);

        let order = OrderRequest::market_buy(
            &self.strategy.order_exchange,
            &symbol,
            self.strategy.quantity,
            &self.strategy.product_type,
        );

        info!(
            symbol = %symbol,
            spot = %spot,
            last_price = %last_price,
            quantity = order.quantity,
            broker = self.broker.name(),
            "Placing order"
        );

        let ack = self.call("place_order", self.broker.place_order(&order)).await?;

        // Optimistic: locked on acceptance, not on fill.
        state.open(symbol.clone(), ack.order_id.clone(), spot);

        info!(symbol = %symbol, order_id = %ack.order_id, status = %ack.status, "Order placed, trade locked");

        Ok(SignalOutcome::OrderPlaced {
            symbol,
            order_id: ack.order_id,
            side,
            strike,
            spot,
        })
    }

    /// Processes an order status notification. Never fails.
    pub async fn handle_postback(&self, event: &PostbackEvent) -> PostbackOutcome {
        if event.is_terminal() {
            info!(
                status = %event.status,
                transaction_type = event.transaction_type.as_deref().unwrap_or("-"),
                payload = %serde_json::Value::Object(event.extra.clone()),
                "Postback received"
            );
        } else {
            debug!(status = %event.status, "Postback with non-terminal status");
        }

        if !event.is_completed_exit() {
            return PostbackOutcome::Acknowledged;
        }

        let mut state = self.state.lock().await;
        match state.close() {
            Some(released) => {
                info!(symbol = %released.symbol, order_id = %released.order_id, "Position closed, trade unlocked");
                PostbackOutcome::Released {
                    symbol: released.symbol,
                }
            }
            None => {
                debug!("Exit postback while already flat");
                PostbackOutcome::Acknowledged
            }
        }
    }

    async fn call<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = anyhow::Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.broker_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                error!(operation, broker = self.broker.name(), error = %e, "Broker call failed");
                Err(RelayError::broker(operation, &e))
            }
            Err(_) => {
                error!(operation, broker = self.broker.name(), "Broker call timed out");
                Err(RelayError::BrokerTimeout {
                    operation,
                    secs: self.broker_timeout.as_secs(),
                })
            }
        }
    }
}
