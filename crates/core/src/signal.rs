//! Pure decision logic for inbound alerts: filtering, side, strike, symbol.
//!
//! Nothing here touches shared state or the network, so every rule can be
//! checked in isolation.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Option side chosen from the price move since the last signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionSide {
    /// Call, bought when the spot moved strictly up.
    #[serde(rename = "CE")]
    Ce,
    /// Put, bought on a flat or downward move.
    #[serde(rename = "PE")]
    Pe,
}

impl OptionSide {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ce => "CE",
            Self::Pe => "PE",
        }
    }
}

impl std::fmt::Display for OptionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true when `message` contains `marker`, ignoring case.
#[must_use]
pub fn is_actionable(message: &str, marker: &str) -> bool {
    message
        .to_uppercase()
        .contains(marker.to_uppercase().as_str())
}

/// Call side only on a strict rise; ties go to the put side.
#[must_use]
pub fn choose_side(price: Decimal, last_price: Decimal) -> OptionSide {
    if price > last_price {
        OptionSide::Ce
    } else {
        OptionSide::Pe
    }
}

/// Nearest multiple of `interval` to `price`.
///
/// Exact midpoints round away from zero, so 125 with an interval of 50
/// selects the 150 strike.
#[must_use]
pub fn atm_strike(price: Decimal, interval: Decimal) -> Decimal {
    let steps = (price / interval).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    (steps * interval).normalize()
}

/// Space-joined contract descriptor, e.g. `NIFTY 22500 CE`.
#[must_use]
pub fn option_symbol(underlying: &str, strike: Decimal, side: OptionSide) -> String {
    format!("{} {} {}", underlying, strike.normalize(), side)
}
