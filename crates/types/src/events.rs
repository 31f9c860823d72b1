//! The simulation event model.
//!
//! Nine event kinds flow through the scheduler. The first four originate from
//! agents (via the context) or from setup; the remaining five are
//! notifications the driver produces and delivers to agents. Every variant
//! carries a timestamp, exposed through [`Event::timestamp`].

use crate::ids::{ClientId, InstrumentId, OrderId, Timestamp, TradeId};
use crate::money::{Price, Quantity};
use crate::order::{OrderSide, OrderStatus, OrderType};
use serde::{Deserialize, Serialize};

/// An agent (or setup) asks the exchange to process a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSubmitted {
    pub timestamp: Timestamp,
    pub agent_id: ClientId,
    pub instrument_id: InstrumentId,
    pub quantity: Quantity,
    pub price: Price,
    pub side: OrderSide,
    pub order_type: OrderType,
}

/// An agent asks the exchange to cancel one of its resting orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationSubmitted {
    pub timestamp: Timestamp,
    pub agent_id: ClientId,
    pub order_id: OrderId,
}

/// An agent asks the exchange to modify one of its resting orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModificationSubmitted {
    pub timestamp: Timestamp,
    pub agent_id: ClientId,
    pub order_id: OrderId,
    pub new_quantity: Quantity,
    pub new_price: Price,
}

/// A self-scheduled agent timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentWakeup {
    pub timestamp: Timestamp,
    pub agent_id: ClientId,
}

/// The exchange accepted a submission and assigned an order id.
///
/// Delivered even when the order executed in full on arrival; the id is still
/// valid for correlation but never names a resting order in that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAccepted {
    pub timestamp: Timestamp,
    pub order_id: OrderId,
    pub agent_id: ClientId,
    pub instrument_id: InstrumentId,
}

/// The exchange refused a submission (e.g. unknown instrument).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRejected {
    pub timestamp: Timestamp,
    pub agent_id: ClientId,
    pub instrument_id: InstrumentId,
    pub reason: OrderStatus,
}

/// A resting order was removed on the owner's request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelled {
    pub timestamp: Timestamp,
    pub order_id: OrderId,
    pub agent_id: ClientId,
    /// Unexecuted quantity at the time of cancellation.
    pub remaining_quantity: Quantity,
}

/// A resting order was modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderModified {
    pub timestamp: Timestamp,
    pub old_order_id: OrderId,
    /// Equals `old_order_id` for in-place modifications.
    pub new_order_id: OrderId,
    pub agent_id: ClientId,
    pub old_price: Price,
    pub new_price: Price,
    pub old_quantity: Quantity,
    pub new_quantity: Quantity,
}

/// An execution, delivered to both counterparties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub timestamp: Timestamp,
    pub trade_id: TradeId,
    pub instrument_id: InstrumentId,
    pub buyer_order_id: OrderId,
    pub seller_order_id: OrderId,
    pub buyer_id: ClientId,
    pub seller_id: ClientId,
    pub quantity: Quantity,
    pub price: Price,
    /// Side of the incoming order that crossed the spread.
    pub aggressor_side: OrderSide,
}

/// Tagged union over the nine event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    OrderSubmitted(OrderSubmitted),
    CancellationSubmitted(CancellationSubmitted),
    ModificationSubmitted(ModificationSubmitted),
    AgentWakeup(AgentWakeup),
    OrderAccepted(OrderAccepted),
    OrderRejected(OrderRejected),
    OrderCancelled(OrderCancelled),
    OrderModified(OrderModified),
    Trade(Trade),
}

impl Event {
    /// Timestamp carried by the variant.
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Event::OrderSubmitted(e) => e.timestamp,
            Event::CancellationSubmitted(e) => e.timestamp,
            Event::ModificationSubmitted(e) => e.timestamp,
            Event::AgentWakeup(e) => e.timestamp,
            Event::OrderAccepted(e) => e.timestamp,
            Event::OrderRejected(e) => e.timestamp,
            Event::OrderCancelled(e) => e.timestamp,
            Event::OrderModified(e) => e.timestamp,
            Event::Trade(e) => e.timestamp,
        }
    }
}
