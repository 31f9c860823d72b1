//! Agent and context traits.
//!
//! The simulation driver implements [`AgentContext`] and passes itself to
//! every callback, so agents observe market state and act through one
//! controlled surface. The context tracks which agent is currently executing
//! and attributes every action to it.

use sim_core::OrderBook;
use types::{
    ClientId, InstrumentId, OrderAccepted, OrderCancelled, OrderId, OrderModified, OrderRejected,
    OrderSide, OrderType, Price, Quantity, Timestamp, Trade,
};

/// Capability set the driver exposes to agents during callbacks.
///
/// Submission methods schedule events at `now + latency(current agent)`;
/// wakeups fire at the exact requested time. The book reference is a view of
/// live state, valid only for the duration of the callback.
pub trait AgentContext {
    /// Schedule an order submission on behalf of the current agent.
    fn submit_order(
        &mut self,
        instrument: InstrumentId,
        quantity: Quantity,
        price: Price,
        side: OrderSide,
        order_type: OrderType,
    );

    /// Schedule a cancellation of one of the current agent's orders.
    fn cancel_order(&mut self, order_id: OrderId);

    /// Schedule a modification of one of the current agent's orders.
    fn modify_order(&mut self, order_id: OrderId, new_quantity: Quantity, new_price: Price);

    /// Schedule a wakeup callback for the current agent.
    fn schedule_wakeup(&mut self, at: Timestamp);

    /// The live order book for an instrument (an empty view if unknown).
    fn order_book(&self, instrument: InstrumentId) -> &OrderBook;

    /// The current true price of the fair-price process.
    fn fair_price(&self) -> Price;

    /// Current simulated time.
    fn now(&self) -> Timestamp;
}

/// A trading participant.
///
/// Each agent owns its private state (RNG, tracked orders, positions) and
/// reacts to wakeups and market notifications through the callbacks below.
/// Only `on_wakeup` is mandatory; notification handlers default to no-ops.
pub trait Agent {
    /// This agent's client id.
    fn id(&self) -> ClientId;

    /// Timer callback, scheduled by the agent itself.
    fn on_wakeup(&mut self, ctx: &mut dyn AgentContext);

    /// A trade in which this agent was buyer or seller.
    fn on_trade(&mut self, _ctx: &mut dyn AgentContext, _trade: &Trade) {}

    /// One of this agent's submissions was accepted.
    fn on_order_accepted(&mut self, _ctx: &mut dyn AgentContext, _event: &OrderAccepted) {}

    /// One of this agent's submissions was rejected.
    fn on_order_rejected(&mut self, _ctx: &mut dyn AgentContext, _event: &OrderRejected) {}

    /// One of this agent's orders was cancelled.
    fn on_order_cancelled(&mut self, _ctx: &mut dyn AgentContext, _event: &OrderCancelled) {}

    /// One of this agent's orders was modified.
    fn on_order_modified(&mut self, _ctx: &mut dyn AgentContext, _event: &OrderModified) {}
}
