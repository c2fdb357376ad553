//! Binance USDⓈ-M Futures integration
//!
//! Authentication, wire types, and the REST client for the `/fapi`
//! endpoints.

pub mod auth;
pub mod rest;
pub mod types;

pub use auth::{Credentials, RequestSigner};
pub use rest::{FuturesConfig, FuturesRestClient, OrderRef, MAINNET_URL, TESTNET_URL};
pub use types::{
    AccountBalance, CancelAllAck, ExchangeInfo, FuturesAccountInfo, OrderAck, OrderQuery,
    PositionRisk, PriceTicker, SymbolInfo,
};
