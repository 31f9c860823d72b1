//! Order data model: sides, types, statuses, resting orders, and requests.

use crate::ids::{ClientId, InstrumentId, OrderId, Timestamp};
use crate::money::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the market an order is on.
///
/// Serialized with the exchange-wire spelling ("BUY"/"SELL"), matching the
/// configuration format and the CSV output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side.
    pub fn opposite(self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }

    /// Exchange-wire spelling, as written to CSV output.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution discipline of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    /// Execute at the stated price or better; remainder rests on the book.
    Limit,
    /// Execute against whatever is available; remainder is discarded.
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Limit => write!(f, "LIMIT"),
            OrderType::Market => write!(f, "MARKET"),
        }
    }
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Created but not yet processed by an engine.
    #[default]
    Pending,
    /// Resting on the book, untouched.
    New,
    /// Refused by the exchange (e.g. unknown instrument).
    Rejected,
    /// Some quantity executed, some remains.
    PartiallyFilled,
    /// Fully executed.
    Filled,
    /// Removed before (full) execution.
    Cancelled,
    /// Quantity reduced in place by a modification.
    Modified,
}

/// Outcome of a modification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifyStatus {
    Accepted,
    Invalid,
}

/// An order resting on the book.
///
/// Created when a limit-order remainder is enqueued; mutated only by the
/// engine (quantity decreases on fills, status flips on modify/fill/cancel);
/// removed when fully filled or cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub client_id: ClientId,
    /// Remaining (unexecuted) quantity.
    pub quantity: Quantity,
    pub price: Price,
    pub timestamp: Timestamp,
    pub instrument_id: InstrumentId,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub status: OrderStatus,
}

/// Transport-level input to the matching engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub client_id: ClientId,
    pub quantity: Quantity,
    /// Limit price; zero by convention for market orders.
    pub price: Price,
    pub instrument_id: InstrumentId,
    pub side: OrderSide,
    pub order_type: OrderType,
}
