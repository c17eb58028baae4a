//! HTTP surface of the relay: liveness, alert webhook, broker postback, and
//! a read-only status view.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use handlers::StatusResponse;
pub use server::ApiServer;
