//! Trade execution records and book-delta classification.

use crate::ids::{ClientId, InstrumentId, OrderId, Timestamp, TradeId};
use crate::money::{Cash, Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single execution produced by the matching engine.
///
/// The engine is time-agnostic; `timestamp` is zero until the driver stamps
/// the trade into a [`crate::events::Trade`] notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub trade_id: TradeId,
    pub buyer_order_id: OrderId,
    pub seller_order_id: OrderId,
    pub buyer_id: ClientId,
    pub seller_id: ClientId,
    pub quantity: Quantity,
    pub price: Price,
    pub timestamp: Timestamp,
    pub instrument_id: InstrumentId,
}

impl TradeEvent {
    /// Notional value of the execution, as signed cash.
    pub fn value(&self) -> Cash {
        self.price * self.quantity
    }
}

/// Classification of an order-book delta row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeltaType {
    Add,
    Fill,
    Cancel,
    Modify,
}

impl DeltaType {
    /// Spelling used in deltas.csv.
    pub fn as_str(self) -> &'static str {
        match self {
            DeltaType::Add => "ADD",
            DeltaType::Fill => "FILL",
            DeltaType::Cancel => "CANCEL",
            DeltaType::Modify => "MODIFY",
        }
    }
}

impl fmt::Display for DeltaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_value() {
        let trade = TradeEvent {
            trade_id: TradeId(1),
            buyer_order_id: OrderId(1),
            seller_order_id: OrderId(2),
            buyer_id: ClientId(10),
            seller_id: ClientId(20),
            quantity: Quantity(50),
            price: Price(1000),
            timestamp: Timestamp(0),
            instrument_id: InstrumentId(1),
        };
        assert_eq!(trade.value(), Cash(50_000));
    }

    #[test]
    fn delta_type_spelling() {
        assert_eq!(DeltaType::Add.as_str(), "ADD");
        assert_eq!(DeltaType::Fill.as_str(), "FILL");
        assert_eq!(DeltaType::Cancel.as_str(), "CANCEL");
        assert_eq!(DeltaType::Modify.as_str(), "MODIFY");
    }
}
