//! Shared data model for the exchange simulator.
//!
//! This crate provides the strong identifier types, price/quantity/cash
//! scalars, the order and trade data model, and the nine-variant simulation
//! event union used across the workspace.

pub mod events;
pub mod ids;
pub mod money;
pub mod order;
pub mod trade;

pub use events::{
    AgentWakeup, CancellationSubmitted, Event, ModificationSubmitted, OrderAccepted,
    OrderCancelled, OrderModified, OrderRejected, OrderSubmitted, Trade,
};
pub use ids::{ClientId, InstrumentId, OrderId, SequenceNumber, Timestamp, TradeId};
pub use money::{Cash, Price, Quantity};
pub use order::{ModifyStatus, Order, OrderRequest, OrderSide, OrderStatus, OrderType};
pub use trade::{DeltaType, TradeEvent};
