//! Failures of a single relay request. None of them are fatal to the process.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// The broker returned an error or could not be reached.
    #[error("broker {operation} failed: {message}")]
    Broker {
        operation: &'static str,
        message: String,
    },

    /// The broker call did not complete in time.
    #[error("broker {operation} timed out after {secs}s")]
    BrokerTimeout { operation: &'static str, secs: u64 },

    /// The broker quoted a price the strike logic cannot use.
    #[error("invalid price: {0}")]
    InvalidPrice(String),
}

impl RelayError {
    pub fn broker(operation: &'static str, err: &anyhow::Error) -> Self {
        Self::Broker {
            operation,
            message: format!("{err:#}"),
        }
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::BrokerTimeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
