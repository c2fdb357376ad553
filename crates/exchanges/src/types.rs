//! Shared futures order enumerations and symbol trading rules
//!
//! `Display` renders the exact spelling the exchange's order endpoint
//! expects; `FromStr` accepts case-insensitive input and reports the
//! allowed value set on a mismatch.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::OrderError;

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
}

impl OrderSide {
    pub const ALLOWED: &'static str = "BUY, SELL";
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for OrderSide {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(OrderSide::Buy),
            "SELL" => Ok(OrderSide::Sell),
            _ => Err(OrderError::InvalidEnum {
                field: "side",
                value: s.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// USDⓈ-M Futures order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "MARKET")]
    Market,
    #[serde(rename = "LIMIT")]
    Limit,
    #[serde(rename = "STOP")]
    Stop,
    #[serde(rename = "STOP_MARKET")]
    StopMarket,
    #[serde(rename = "TAKE_PROFIT")]
    TakeProfit,
    #[serde(rename = "TAKE_PROFIT_MARKET")]
    TakeProfitMarket,
    #[serde(rename = "TRAILING_STOP_MARKET")]
    TrailingStopMarket,
}

impl OrderType {
    pub const ALLOWED: &'static str =
        "MARKET, LIMIT, STOP, STOP_MARKET, TAKE_PROFIT, TAKE_PROFIT_MARKET, TRAILING_STOP_MARKET";

    pub const ALL: [OrderType; 7] = [
        OrderType::Market,
        OrderType::Limit,
        OrderType::Stop,
        OrderType::StopMarket,
        OrderType::TakeProfit,
        OrderType::TakeProfitMarket,
        OrderType::TrailingStopMarket,
    ];

    /// True for the conditional types triggered off a stop price
    pub fn is_trigger(&self) -> bool {
        matches!(
            self,
            OrderType::Stop
                | OrderType::StopMarket
                | OrderType::TakeProfit
                | OrderType::TakeProfitMarket
        )
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Limit => write!(f, "LIMIT"),
            OrderType::Stop => write!(f, "STOP"),
            OrderType::StopMarket => write!(f, "STOP_MARKET"),
            OrderType::TakeProfit => write!(f, "TAKE_PROFIT"),
            OrderType::TakeProfitMarket => write!(f, "TAKE_PROFIT_MARKET"),
            OrderType::TrailingStopMarket => write!(f, "TRAILING_STOP_MARKET"),
        }
    }
}

impl FromStr for OrderType {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MARKET" => Ok(OrderType::Market),
            "LIMIT" => Ok(OrderType::Limit),
            "STOP" => Ok(OrderType::Stop),
            "STOP_MARKET" => Ok(OrderType::StopMarket),
            "TAKE_PROFIT" => Ok(OrderType::TakeProfit),
            "TAKE_PROFIT_MARKET" => Ok(OrderType::TakeProfitMarket),
            "TRAILING_STOP_MARKET" => Ok(OrderType::TrailingStopMarket),
            _ => Err(OrderError::InvalidEnum {
                field: "type",
                value: s.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// Time in force for price-bearing orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good Till Cancel
    #[serde(rename = "GTC")]
    Gtc,
    /// Immediate or Cancel
    #[serde(rename = "IOC")]
    Ioc,
    /// Fill or Kill
    #[serde(rename = "FOK")]
    Fok,
    /// Good Till Crossing (post only)
    #[serde(rename = "GTX")]
    Gtx,
}

impl TimeInForce {
    pub const ALLOWED: &'static str = "GTC, IOC, FOK, GTX";
}

impl std::fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeInForce::Gtc => write!(f, "GTC"),
            TimeInForce::Ioc => write!(f, "IOC"),
            TimeInForce::Fok => write!(f, "FOK"),
            TimeInForce::Gtx => write!(f, "GTX"),
        }
    }
}

impl FromStr for TimeInForce {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GTC" => Ok(TimeInForce::Gtc),
            "IOC" => Ok(TimeInForce::Ioc),
            "FOK" => Ok(TimeInForce::Fok),
            "GTX" => Ok(TimeInForce::Gtx),
            _ => Err(OrderError::InvalidEnum {
                field: "timeInForce",
                value: s.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// Position side tag, required in hedge mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionSide {
    /// One-way mode
    #[default]
    #[serde(rename = "BOTH")]
    Both,
    #[serde(rename = "LONG")]
    Long,
    #[serde(rename = "SHORT")]
    Short,
}

impl PositionSide {
    pub const ALLOWED: &'static str = "BOTH, LONG, SHORT";
}

impl std::fmt::Display for PositionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionSide::Both => write!(f, "BOTH"),
            PositionSide::Long => write!(f, "LONG"),
            PositionSide::Short => write!(f, "SHORT"),
        }
    }
}

impl FromStr for PositionSide {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BOTH" => Ok(PositionSide::Both),
            "LONG" => Ok(PositionSide::Long),
            "SHORT" => Ok(PositionSide::Short),
            _ => Err(OrderError::InvalidEnum {
                field: "positionSide",
                value: s.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// Reference price used to trigger conditional orders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkingType {
    #[default]
    #[serde(rename = "CONTRACT_PRICE")]
    ContractPrice,
    #[serde(rename = "MARK_PRICE")]
    MarkPrice,
}

impl WorkingType {
    pub const ALLOWED: &'static str = "CONTRACT_PRICE, MARK_PRICE";
}

impl std::fmt::Display for WorkingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkingType::ContractPrice => write!(f, "CONTRACT_PRICE"),
            WorkingType::MarkPrice => write!(f, "MARK_PRICE"),
        }
    }
}

impl FromStr for WorkingType {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CONTRACT_PRICE" => Ok(WorkingType::ContractPrice),
            "MARK_PRICE" => Ok(WorkingType::MarkPrice),
            _ => Err(OrderError::InvalidEnum {
                field: "workingType",
                value: s.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// Order status as reported by the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "NEW")]
    New,
    #[serde(rename = "PARTIALLY_FILLED")]
    PartiallyFilled,
    #[serde(rename = "FILLED")]
    Filled,
    #[serde(rename = "CANCELED")]
    Canceled,
    #[serde(rename = "REJECTED")]
    Rejected,
    #[serde(rename = "EXPIRED")]
    Expired,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::New => write!(f, "NEW"),
            OrderStatus::PartiallyFilled => write!(f, "PARTIALLY_FILLED"),
            OrderStatus::Filled => write!(f, "FILLED"),
            OrderStatus::Canceled => write!(f, "CANCELED"),
            OrderStatus::Rejected => write!(f, "REJECTED"),
            OrderStatus::Expired => write!(f, "EXPIRED"),
        }
    }
}

/// Symbol trading rules relevant to order placement, extracted from the
/// exchange's `PRICE_FILTER` and `LOT_SIZE` filter rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolFilters {
    /// Price grid: prices must be a multiple of this
    pub tick_size: Decimal,
    /// Quantity grid: quantities must be a multiple of this
    pub step_size: Decimal,
    /// Smallest accepted order quantity
    pub min_qty: Decimal,
}
