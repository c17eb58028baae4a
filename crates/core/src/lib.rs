//! Core of the NIFTY webhook relay.
//!
//! Holds the single-position lock, the alert decision rules (marker filter,
//! option side, ATM strike), the [`Broker`] interface the relay calls out to,
//! and layered configuration.

pub mod config;
pub mod config_loader;
pub mod engine;
pub mod error;
pub mod events;
pub mod position;
pub mod signal;
pub mod traits;

pub use config::{AppConfig, BrokerConfig, ServerConfig, StrategyConfig};
pub use config_loader::{ConfigLoader, DEFAULT_CONFIG_PATH};
pub use engine::{PostbackOutcome, RelayEngine, SignalOutcome};
pub use error::RelayError;
pub use events::{OrderAck, OrderDirection, OrderRequest, OrderType, PostbackEvent};
pub use position::{OpenPosition, Phase, PositionSnapshot, PositionState};
pub use signal::OptionSide;
pub use traits::Broker;
