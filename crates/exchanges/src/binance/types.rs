//! Wire types for the USDⓈ-M Futures REST API
//!
//! Field names follow the exchange's camelCase spellings; unknown fields
//! are ignored so additions on the exchange side don't break parsing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, Result};
use crate::types::{OrderSide, OrderStatus, OrderType, PositionSide, SymbolFilters, TimeInForce};

/// Error body the exchange returns alongside non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    pub msg: String,
}

/// Acknowledgment returned by `POST /fapi/v1/order`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    pub symbol: String,
    pub order_id: u64,
    pub client_order_id: String,
    pub status: OrderStatus,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub price: Decimal,
    pub avg_price: Decimal,
    pub orig_qty: Decimal,
    pub executed_qty: Decimal,
    pub cum_qty: Option<Decimal>,
    pub cum_quote: Decimal,
    pub time_in_force: TimeInForce,
    pub reduce_only: bool,
    pub close_position: bool,
    pub position_side: PositionSide,
    pub stop_price: Decimal,
    pub update_time: u64,
}

/// Order state from `GET /fapi/v1/order` and `GET /fapi/v1/openOrders`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    pub symbol: String,
    pub order_id: u64,
    pub client_order_id: String,
    pub status: OrderStatus,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub price: Decimal,
    pub avg_price: Decimal,
    pub orig_qty: Decimal,
    pub executed_qty: Decimal,
    pub cum_quote: Decimal,
    pub time_in_force: TimeInForce,
    pub reduce_only: bool,
    pub close_position: bool,
    pub position_side: PositionSide,
    pub stop_price: Decimal,
    /// Absent on cancel responses
    #[serde(default)]
    pub time: u64,
    pub update_time: u64,
}

/// Cancel-all acknowledgment from `DELETE /fapi/v1/allOpenOrders`
#[derive(Debug, Clone, Deserialize)]
pub struct CancelAllAck {
    pub code: i64,
    pub msg: String,
}

/// Per-asset balance row inside the account response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetBalance {
    pub asset: String,
    pub wallet_balance: Decimal,
    pub unrealized_profit: Decimal,
    pub available_balance: Decimal,
}

/// Account state from `GET /fapi/v2/account`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturesAccountInfo {
    pub can_trade: bool,
    pub can_deposit: bool,
    pub can_withdraw: bool,
    pub total_wallet_balance: Decimal,
    pub total_unrealized_profit: Decimal,
    pub available_balance: Decimal,
    pub assets: Vec<AssetBalance>,
    pub update_time: u64,
}

/// Condensed balance view derived from [`FuturesAccountInfo`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    pub total_wallet_balance: Decimal,
    pub total_unrealized_profit: Decimal,
    pub available_balance: Decimal,
    pub assets: Vec<AssetBalance>,
}

impl From<FuturesAccountInfo> for AccountBalance {
    fn from(info: FuturesAccountInfo) -> Self {
        Self {
            total_wallet_balance: info.total_wallet_balance,
            total_unrealized_profit: info.total_unrealized_profit,
            available_balance: info.available_balance,
            assets: info.assets,
        }
    }
}

/// Position row from `GET /fapi/v2/positionRisk`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRisk {
    pub symbol: String,
    pub position_amt: Decimal,
    pub entry_price: Decimal,
    pub mark_price: Decimal,
    #[serde(rename = "unRealizedProfit")]
    pub unrealized_profit: Decimal,
    pub liquidation_price: Decimal,
    pub leverage: Decimal,
    pub position_side: PositionSide,
    pub update_time: u64,
}

impl PositionRisk {
    /// True when the exchange reports a live position on this row
    pub fn is_open(&self) -> bool {
        !self.position_amt.is_zero()
    }
}

/// Exchange trading rules from `GET /fapi/v1/exchangeInfo`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeInfo {
    pub timezone: String,
    pub server_time: u64,
    pub symbols: Vec<SymbolInfo>,
}

/// Per-symbol trading rules, filters kept raw until asked for
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub status: String,
    pub base_asset: String,
    pub quote_asset: String,
    pub price_precision: u32,
    pub quantity_precision: u32,
    pub filters: Vec<serde_json::Value>,
}

impl SymbolInfo {
    /// Extract the tick/step grid from the PRICE_FILTER and LOT_SIZE rows
    pub fn symbol_filters(&self) -> Result<SymbolFilters> {
        let mut tick_size = None;
        let mut step_size = None;
        let mut min_qty = None;

        for filter in &self.filters {
            match filter.get("filterType").and_then(|v| v.as_str()) {
                Some("PRICE_FILTER") => {
                    tick_size = Some(decimal_field(filter, "tickSize")?);
                }
                Some("LOT_SIZE") => {
                    step_size = Some(decimal_field(filter, "stepSize")?);
                    min_qty = Some(decimal_field(filter, "minQty")?);
                }
                _ => {}
            }
        }

        match (tick_size, step_size, min_qty) {
            (Some(tick_size), Some(step_size), Some(min_qty)) => Ok(SymbolFilters {
                tick_size,
                step_size,
                min_qty,
            }),
            _ => Err(ClientError::InvalidResponse(format!(
                "symbol {} is missing PRICE_FILTER or LOT_SIZE",
                self.symbol
            ))),
        }
    }
}

fn decimal_field(filter: &serde_json::Value, key: &str) -> Result<Decimal> {
    filter
        .get(key)
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ClientError::InvalidResponse(format!("bad filter field {key}")))
}

/// Last price from `GET /fapi/v1/ticker/price`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTicker {
    pub symbol: String,
    pub price: Decimal,
    pub time: u64,
}
