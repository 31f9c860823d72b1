//! Order book with price-time priority.
//!
//! Each side is a `BTreeMap` from price to a FIFO queue of resting orders;
//! bids match from the highest key, asks from the lowest. A registry maps
//! order ids to `(side, price)` and the exact position in the queue is
//! resolved by a linear scan on demand — queues at a single price level are
//! short in practice, and the registry never holds references that could
//! dangle across queue mutation.

use std::collections::{BTreeMap, HashMap, VecDeque};

use types::{InstrumentId, Order, OrderId, OrderSide, Price, Quantity};

/// Order book for a single instrument.
///
/// Invariants maintained by every mutation:
/// - every registry entry resolves to exactly one order on the recorded side
///   at the recorded price, and every enqueued order has a registry entry;
/// - every order in a price-level queue carries that exact price;
/// - emptied price levels are removed immediately;
/// - resting quantity is always positive.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    pub(crate) instrument_id: InstrumentId,
    pub(crate) bids: BTreeMap<Price, VecDeque<Order>>,
    pub(crate) asks: BTreeMap<Price, VecDeque<Order>>,
    pub(crate) registry: HashMap<OrderId, (OrderSide, Price)>,
}

impl OrderBook {
    /// Create a new empty book.
    pub fn new(instrument_id: InstrumentId) -> Self {
        Self {
            instrument_id,
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            registry: HashMap::new(),
        }
    }

    /// The instrument this book is for.
    pub fn instrument_id(&self) -> InstrumentId {
        self.instrument_id
    }

    /// Highest resting buy price.
    pub fn best_bid_price(&self) -> Option<Price> {
        self.bids.keys().next_back().copied()
    }

    /// Lowest resting sell price.
    pub fn best_ask_price(&self) -> Option<Price> {
        self.asks.keys().next().copied()
    }

    /// Whether any buy orders rest on the book.
    pub fn has_bids(&self) -> bool {
        !self.bids.is_empty()
    }

    /// Whether any sell orders rest on the book.
    pub fn has_asks(&self) -> bool {
        !self.asks.is_empty()
    }

    /// Whether the book holds no orders at all.
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Number of price levels on the bid side.
    pub fn bid_level_count(&self) -> usize {
        self.bids.len()
    }

    /// Number of price levels on the ask side.
    pub fn ask_level_count(&self) -> usize {
        self.asks.len()
    }

    /// Total number of resting orders.
    pub fn order_count(&self) -> usize {
        self.registry.len()
    }

    /// Look up a resting order by id.
    pub fn get(&self, order_id: OrderId) -> Option<&Order> {
        let &(side, price) = self.registry.get(&order_id)?;
        self.side(side)
            .get(&price)?
            .iter()
            .find(|o| o.order_id == order_id)
    }

    /// Per-side depth: `(price, aggregated quantity)` in price-priority order,
    /// zero aggregates omitted.
    pub fn side_snapshot(&self, side: OrderSide) -> Vec<(Price, Quantity)> {
        let aggregate = |(price, queue): (&Price, &VecDeque<Order>)| {
            let total: Quantity = queue.iter().map(|o| o.quantity).sum();
            (!total.is_zero()).then_some((*price, total))
        };
        match side {
            OrderSide::Buy => self.bids.iter().rev().filter_map(aggregate).collect(),
            OrderSide::Sell => self.asks.iter().filter_map(aggregate).collect(),
        }
    }

    fn side(&self, side: OrderSide) -> &BTreeMap<Price, VecDeque<Order>> {
        match side {
            OrderSide::Buy => &self.bids,
            OrderSide::Sell => &self.asks,
        }
    }

    fn side_mut(&mut self, side: OrderSide) -> &mut BTreeMap<Price, VecDeque<Order>> {
        match side {
            OrderSide::Buy => &mut self.bids,
            OrderSide::Sell => &mut self.asks,
        }
    }

    /// Enqueue an order at the back of its price level and index it.
    pub(crate) fn insert(&mut self, order: Order) {
        self.registry
            .insert(order.order_id, (order.side, order.price));
        self.side_mut(order.side)
            .entry(order.price)
            .or_default()
            .push_back(order);
    }

    /// Remove an order by id, dropping its price level if emptied.
    pub(crate) fn remove(&mut self, order_id: OrderId) -> Option<Order> {
        let (side, price) = self.registry.remove(&order_id)?;
        let levels = self.side_mut(side);
        let queue = levels.get_mut(&price)?;
        let pos = queue.iter().position(|o| o.order_id == order_id)?;
        let order = queue.remove(pos);
        if queue.is_empty() {
            levels.remove(&price);
        }
        order
    }

    /// Mutable access to a resting order (for in-place modification).
    pub(crate) fn get_mut(&mut self, order_id: OrderId) -> Option<&mut Order> {
        let &(side, price) = self.registry.get(&order_id)?;
        self.side_mut(side)
            .get_mut(&price)?
            .iter_mut()
            .find(|o| o.order_id == order_id)
    }
}
