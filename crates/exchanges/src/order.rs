//! Order request construction and validation
//!
//! Turns loose trading parameters into a validated, immutable [`OrderIntent`]
//! or fails with a named [`OrderError`] before any network I/O. Every order
//! type has a fixed row of required and forbidden fields; a forbidden field
//! that was supplied is an error, never silently dropped.
//!
//! The builder is a pure function of its inputs: no shared state, no
//! logging side channel, safe to call concurrently.

use rust_decimal::Decimal;

use crate::errors::OrderError;
use crate::types::{
    OrderSide, OrderType, PositionSide, SymbolFilters, TimeInForce, WorkingType,
};

/// Every recognized order parameter and its default.
///
/// The general entry point [`OrderIntent::build`] takes one of these instead
/// of an open-ended map, so a typo'd parameter is a compile error rather
/// than a silently ignored key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFields {
    pub quantity: Option<Decimal>,
    pub price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
    pub time_in_force: Option<TimeInForce>,
    pub reduce_only: bool,
    pub close_position: bool,
    pub position_side: Option<PositionSide>,
    pub working_type: Option<WorkingType>,
    pub callback_rate: Option<Decimal>,
    pub price_protect: bool,
    pub client_order_id: Option<String>,
}

/// Whether a field is part of an order type's request or must be absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Need {
    Required,
    Forbidden,
}

/// One row of the per-type compatibility table
#[derive(Debug, Clone, Copy)]
struct TypeRules {
    /// `closePosition=true` may stand in for `quantity`
    close_position_allowed: bool,
    price: Need,
    stop_price: Need,
    time_in_force: Need,
    callback_rate: Need,
}

const fn rules_for(order_type: OrderType) -> TypeRules {
    use Need::{Forbidden, Required};
    match order_type {
        OrderType::Market => TypeRules {
            close_position_allowed: true,
            price: Forbidden,
            stop_price: Forbidden,
            time_in_force: Forbidden,
            callback_rate: Forbidden,
        },
        OrderType::Limit => TypeRules {
            close_position_allowed: false,
            price: Required,
            stop_price: Forbidden,
            time_in_force: Required,
            callback_rate: Forbidden,
        },
        OrderType::Stop => TypeRules {
            close_position_allowed: false,
            price: Required,
            stop_price: Required,
            time_in_force: Required,
            callback_rate: Forbidden,
        },
        OrderType::StopMarket => TypeRules {
            close_position_allowed: true,
            price: Forbidden,
            stop_price: Required,
            time_in_force: Forbidden,
            callback_rate: Forbidden,
        },
        OrderType::TakeProfit => TypeRules {
            close_position_allowed: false,
            price: Required,
            stop_price: Required,
            time_in_force: Required,
            callback_rate: Forbidden,
        },
        OrderType::TakeProfitMarket => TypeRules {
            close_position_allowed: true,
            price: Forbidden,
            stop_price: Required,
            time_in_force: Forbidden,
            callback_rate: Forbidden,
        },
        OrderType::TrailingStopMarket => TypeRules {
            close_position_allowed: false,
            price: Forbidden,
            stop_price: Forbidden,
            time_in_force: Forbidden,
            callback_rate: Required,
        },
    }
}

/// A validated order instruction, ready to be sent to the exchange.
///
/// Immutable after construction; build one per call via [`OrderIntent::build`]
/// or the [`OrderIntent::market`] / [`OrderIntent::limit`] shortcuts.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderIntent {
    symbol: String,
    side: OrderSide,
    order_type: OrderType,
    quantity: Option<Decimal>,
    price: Option<Decimal>,
    stop_price: Option<Decimal>,
    time_in_force: Option<TimeInForce>,
    reduce_only: bool,
    close_position: bool,
    position_side: PositionSide,
    working_type: Option<WorkingType>,
    callback_rate: Option<Decimal>,
    price_protect: bool,
    client_order_id: Option<String>,
}

impl OrderIntent {
    /// Build a market order
    pub fn market(
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
    ) -> Result<Self, OrderError> {
        Self::build(
            symbol,
            side,
            OrderType::Market,
            OrderFields {
                quantity: Some(quantity),
                ..OrderFields::default()
            },
        )
    }

    /// Build a GTC limit order
    pub fn limit(
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<Self, OrderError> {
        Self::build(
            symbol,
            side,
            OrderType::Limit,
            OrderFields {
                quantity: Some(quantity),
                price: Some(price),
                ..OrderFields::default()
            },
        )
    }

    /// General-purpose entry point: validate `fields` against the
    /// compatibility row for `order_type` and return the canonical intent.
    pub fn build(
        symbol: &str,
        side: OrderSide,
        order_type: OrderType,
        fields: OrderFields,
    ) -> Result<Self, OrderError> {
        let symbol = normalize_symbol(symbol)?;

        // Mutual exclusivity wins over the per-type rules so the caller
        // sees the conflict no matter which order type they picked.
        if fields.reduce_only && fields.close_position {
            return Err(OrderError::ConflictingFields("reduceOnly", "closePosition"));
        }

        let rules = rules_for(order_type);

        let quantity = if fields.close_position {
            if !rules.close_position_allowed {
                return Err(OrderError::UnexpectedField {
                    order_type,
                    field: "closePosition",
                });
            }
            // closePosition replaces quantity entirely; supplying both is
            // ambiguous user intent and rejected rather than resolved.
            if fields.quantity.is_some() {
                return Err(OrderError::UnexpectedField {
                    order_type,
                    field: "quantity",
                });
            }
            None
        } else {
            match fields.quantity {
                Some(q) if q > Decimal::ZERO => Some(q),
                _ => {
                    return Err(OrderError::MissingField {
                        order_type,
                        field: "quantity",
                    })
                }
            }
        };

        let price = check_decimal(order_type, "price", rules.price, fields.price)?;
        let stop_price =
            check_decimal(order_type, "stopPrice", rules.stop_price, fields.stop_price)?;
        let callback_rate = check_decimal(
            order_type,
            "callbackRate",
            rules.callback_rate,
            fields.callback_rate,
        )?;

        let time_in_force = match rules.time_in_force {
            Need::Required => Some(fields.time_in_force.unwrap_or(TimeInForce::Gtc)),
            Need::Forbidden => {
                if fields.time_in_force.is_some() {
                    return Err(OrderError::UnexpectedField {
                        order_type,
                        field: "timeInForce",
                    });
                }
                None
            }
        };

        // Trigger reference price and protection only make sense for
        // conditional orders; anywhere else they are unexpressed intent.
        let (working_type, price_protect) = if order_type.is_trigger() {
            (
                Some(fields.working_type.unwrap_or_default()),
                fields.price_protect,
            )
        } else {
            if fields.working_type.is_some() {
                return Err(OrderError::UnexpectedField {
                    order_type,
                    field: "workingType",
                });
            }
            if fields.price_protect {
                return Err(OrderError::UnexpectedField {
                    order_type,
                    field: "priceProtect",
                });
            }
            (None, false)
        };

        Ok(Self {
            symbol,
            side,
            order_type,
            quantity,
            price,
            stop_price,
            time_in_force,
            reduce_only: fields.reduce_only,
            close_position: fields.close_position,
            position_side: fields.position_side.unwrap_or_default(),
            working_type,
            callback_rate,
            price_protect,
            client_order_id: fields.client_order_id,
        })
    }

    /// Verify price and quantity are representable on the symbol's
    /// tick/step grid and the quantity meets the symbol's minimum,
    /// instead of letting the exchange reject the order with an opaque
    /// precision error.
    pub fn check_filters(&self, filters: &SymbolFilters) -> Result<(), OrderError> {
        if let Some(price) = self.price {
            on_grid("price", price, filters.tick_size)?;
        }
        if let Some(stop_price) = self.stop_price {
            on_grid("stopPrice", stop_price, filters.tick_size)?;
        }
        if let Some(quantity) = self.quantity {
            on_grid("quantity", quantity, filters.step_size)?;
            if quantity < filters.min_qty {
                return Err(OrderError::BelowMinimum {
                    field: "quantity",
                    value: quantity,
                    min: filters.min_qty,
                });
            }
        }
        Ok(())
    }

    /// Request parameters in the exact spellings the order endpoint expects
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("symbol", self.symbol.clone()),
            ("side", self.side.to_string()),
            ("type", self.order_type.to_string()),
        ];
        if let Some(quantity) = self.quantity {
            params.push(("quantity", quantity.to_string()));
        }
        if let Some(price) = self.price {
            params.push(("price", price.to_string()));
        }
        if let Some(stop_price) = self.stop_price {
            params.push(("stopPrice", stop_price.to_string()));
        }
        if let Some(tif) = self.time_in_force {
            params.push(("timeInForce", tif.to_string()));
        }
        if self.reduce_only {
            params.push(("reduceOnly", "true".to_string()));
        }
        if self.close_position {
            params.push(("closePosition", "true".to_string()));
        }
        params.push(("positionSide", self.position_side.to_string()));
        if let Some(working_type) = self.working_type {
            params.push(("workingType", working_type.to_string()));
        }
        if let Some(callback_rate) = self.callback_rate {
            params.push(("callbackRate", callback_rate.to_string()));
        }
        if self.price_protect {
            params.push(("priceProtect", "true".to_string()));
        }
        if let Some(id) = &self.client_order_id {
            params.push(("newClientOrderId", id.clone()));
        }
        params
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn side(&self) -> OrderSide {
        self.side
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn quantity(&self) -> Option<Decimal> {
        self.quantity
    }

    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    pub fn stop_price(&self) -> Option<Decimal> {
        self.stop_price
    }

    pub fn time_in_force(&self) -> Option<TimeInForce> {
        self.time_in_force
    }

    pub fn reduce_only(&self) -> bool {
        self.reduce_only
    }

    pub fn close_position(&self) -> bool {
        self.close_position
    }

    pub fn position_side(&self) -> PositionSide {
        self.position_side
    }

    pub fn working_type(&self) -> Option<WorkingType> {
        self.working_type
    }

    pub fn callback_rate(&self) -> Option<Decimal> {
        self.callback_rate
    }

    pub fn price_protect(&self) -> bool {
        self.price_protect
    }

    pub fn client_order_id(&self) -> Option<&str> {
        self.client_order_id.as_deref()
    }
}

fn normalize_symbol(symbol: &str) -> Result<String, OrderError> {
    let symbol = symbol.trim().to_ascii_uppercase();
    if symbol.is_empty() || !symbol.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(OrderError::InvalidSymbol(symbol));
    }
    Ok(symbol)
}

fn check_decimal(
    order_type: OrderType,
    field: &'static str,
    need: Need,
    value: Option<Decimal>,
) -> Result<Option<Decimal>, OrderError> {
    match need {
        Need::Required => match value {
            Some(v) if v > Decimal::ZERO => Ok(Some(v)),
            _ => Err(OrderError::MissingField { order_type, field }),
        },
        Need::Forbidden => match value {
            Some(_) => Err(OrderError::UnexpectedField { order_type, field }),
            None => Ok(None),
        },
    }
}

fn on_grid(field: &'static str, value: Decimal, step: Decimal) -> Result<(), OrderError> {
    if step > Decimal::ZERO && !(value % step).is_zero() {
        return Err(OrderError::Precision { field, value, step });
    }
    Ok(())
}
