//! Dhan brokerage integration for the NIFTY webhook relay.
//!
//! This crate provides:
//! - REST client for last traded price lookup and order placement
//! - Typed request/response bodies for those endpoints
//! - A paper trading shim that simulates orders while quoting live
//!
//! # Authentication
//!
//! Dhan authenticates with a client id and an access token sent as the
//! `client-id` and `access-token` headers. The relay reads them from
//! `DHAN_CLIENT_ID` and `DHAN_ACCESS_TOKEN`.

pub mod client;
pub mod error;
pub mod paper;
pub mod types;

pub use client::{DhanClient, DhanClientConfig, DHAN_API_URL};
pub use error::{DhanError, Result};
pub use paper::PaperBroker;
