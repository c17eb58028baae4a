use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Coarse state of the relay: either waiting for a signal or holding one option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Flat,
    Locked,
}

/// Process-wide record shared by the signal and postback handlers.
///
/// The lock flag is derived from the open position rather than stored next to
/// it, so the two can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionState {
    last_price: Option<Decimal>,
    current_position: Option<OpenPosition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub symbol: String,
    pub order_id: String,
    pub entry_spot: Decimal,
    pub opened_at: DateTime<Utc>,
}

/// Serializable view of [`PositionState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub phase: Phase,
    pub locked: bool,
    pub last_price: Option<Decimal>,
    pub current_position: Option<String>,
    pub order_id: Option<String>,
    pub opened_at: Option<DateTime<Utc>>,
}

impl PositionState {
    /// Fresh state: flat, no reference price.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn last_price(&self) -> Option<Decimal> {
        self.last_price
    }

    #[must_use]
    pub fn locked(&self) -> bool {
        self.current_position.is_some()
    }

    #[must_use]
    pub fn current_position(&self) -> Option<&OpenPosition> {
        self.current_position.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.locked() {
            Phase::Locked
        } else {
            Phase::Flat
        }
    }

    /// Stores the bootstrap reference price without opening anything.
    pub fn record_price(&mut self, price: Decimal) {
        self.last_price = Some(price);
    }

    /// FLAT -> LOCKED. Called only after the broker accepted the order.
    pub fn open(&mut self, symbol: String, order_id: String, spot: Decimal) {
        self.current_position = Some(OpenPosition {
            symbol,
            order_id,
            entry_spot: spot,
            opened_at: Utc::now(),
        });
        self.last_price = Some(spot);
    }

    /// LOCKED -> FLAT. Returns the released position, `None` if already flat.
    /// The reference price is kept for the next signal.
    pub fn close(&mut self) -> Option<OpenPosition> {
        self.current_position.take()
    }

    #[must_use]
    pub fn snapshot(&self) -> PositionSnapshot {
        PositionSnapshot {
            phase: self.phase(),
            locked: self.locked(),
            last_price: self.last_price,
            current_position: self.current_position.as_ref().map(|p| p.symbol.clone()),
            order_id: self.current_position.as_ref().map(|p| p.order_id.clone()),
            opened_at: self.current_position.as_ref().map(|p| p.opened_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_state_is_flat_without_price() {
        let state = PositionState::new();
        assert_eq!(state.phase(), Phase::Flat);
        assert!(!state.locked());
        assert!(state.last_price().is_none());
        assert!(state.current_position().is_none());
    }

    #[test]
    fn test_record_price_does_not_lock() {
        let mut state = PositionState::new();
        state.record_price(dec!(22510.35));
        assert_eq!(state.last_price(), Some(dec!(22510.35)));
        assert!(!state.locked());
    }

    #[test]
    fn test_open_locks_and_replaces_price() {
        let mut state = PositionState::new();
        state.record_price(dec!(100));
        state.open("NIFTY 100 CE".to_string(), "ORD-1".to_string(), dec!(105));

        assert!(state.locked());
        assert_eq!(state.phase(), Phase::Locked);
        assert_eq!(state.last_price(), Some(dec!(105)));
        assert_eq!(state.current_position().map(|p| p.symbol.as_str()), Some("NIFTY 100 CE"));
    }

    #[test]
    fn test_close_unlocks_and_keeps_price() {
        let mut state = PositionState::new();
        state.open("NIFTY 22500 PE".to_string(), "ORD-2".to_string(), dec!(22490));

        let released = state.close().expect("position was open");
        assert_eq!(released.symbol, "NIFTY 22500 PE");
        assert!(!state.locked());
        assert_eq!(state.last_price(), Some(dec!(22490)));
    }

    #[test]
    fn test_close_when_flat_is_noop() {
        let mut state = PositionState::new();
        state.record_price(dec!(100));
        let before = state.clone();

        assert!(state.close().is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn test_snapshot_mirrors_lock_invariant() {
        let mut state = PositionState::new();
        let flat = state.snapshot();
        assert!(!flat.locked);
        assert!(flat.current_position.is_none());

        state.open("NIFTY 100 CE".to_string(), "ORD-3".to_string(), dec!(105));
        let locked = state.snapshot();
        assert!(locked.locked);
        assert_eq!(locked.current_position.as_deref(), Some("NIFTY 100 CE"));
        assert_eq!(locked.order_id.as_deref(), Some("ORD-3"));

        let json = serde_json::to_string(&locked).unwrap();
        assert!(json.contains("\"phase\":\"locked\""));
    }
}
