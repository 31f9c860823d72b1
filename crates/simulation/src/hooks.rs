//! Simulation observers.
//!
//! Hooks watch the driver's lifecycle without being able to mutate it:
//! the driver calls them at fixed points with the data a persistence or
//! metrics layer needs. All methods default to no-ops, so an implementor
//! picks only the events it cares about. The core is single-threaded, so
//! hooks are shared as `Rc<RefCell<…>>` and a caller that registers one may
//! keep a clone to extract results after the run.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use types::{
    ClientId, InstrumentId, Order, OrderAccepted, OrderCancelled, OrderId, OrderModified,
    OrderSide, Price, Quantity, Timestamp, Trade,
};

use crate::pnl::PnL;

/// Shared handle under which hooks are registered on the driver.
pub type SharedHook = Rc<RefCell<dyn SimulationHook>>;

/// Observer of driver lifecycle events.
pub trait SimulationHook {
    /// A submission was accepted; `resting` is the enqueued remainder, if
    /// any part of the order rested on the book.
    fn on_order_accepted(&mut self, _event: &OrderAccepted, _resting: Option<&Order>) {}

    /// A trade occurred. Called once per trade, before the per-side fills.
    fn on_trade(&mut self, _trade: &Trade, _fair_price: Price) {}

    /// One side of a trade: the affected order, its owner, and the quantity
    /// left on it after the fill. Called for the buyer, then the seller.
    fn on_fill(
        &mut self,
        _trade: &Trade,
        _order_id: OrderId,
        _client_id: ClientId,
        _remaining: Quantity,
        _side: OrderSide,
    ) {
    }

    /// A resting order was cancelled; `order` is its state at removal.
    fn on_order_cancelled(&mut self, _event: &OrderCancelled, _order: &Order) {}

    /// A resting order was modified.
    fn on_order_modified(
        &mut self,
        _event: &OrderModified,
        _instrument_id: InstrumentId,
        _side: OrderSide,
    ) {
    }

    /// Top-of-book state after an order submission was processed.
    fn on_market_state(
        &mut self,
        _timestamp: Timestamp,
        _fair_price: Price,
        _best_bid: Option<Price>,
        _best_ask: Option<Price>,
    ) {
    }

    /// End of one `step()`: current time, the P&L table, and the mark price.
    fn on_step(&mut self, _now: Timestamp, _pnl: &BTreeMap<ClientId, PnL>, _fair_price: Price) {}

    /// The run finished; `duration` is the configured end time.
    fn on_simulation_end(&mut self, _duration: Timestamp) {}
}
