//! Test support: a recording [`AgentContext`] backed by a real matching
//! engine.

use sim_core::{MatchingEngine, OrderBook};
use types::{
    ClientId, InstrumentId, OrderId, OrderRequest, OrderSide, OrderType, Price, Quantity,
    Timestamp,
};

use crate::traits::AgentContext;

/// Client id used for seeded book liquidity.
const SEED_CLIENT: ClientId = ClientId(9_999);

/// Records every action an agent takes and serves a seedable book.
pub(crate) struct MockContext {
    engine: MatchingEngine,
    fair: Price,
    now: Timestamp,
    pub submitted: Vec<(InstrumentId, Quantity, Price, OrderSide, OrderType)>,
    pub cancelled: Vec<OrderId>,
    pub wakeups: Vec<Timestamp>,
}

impl MockContext {
    pub fn new(fair: Price) -> Self {
        Self {
            engine: MatchingEngine::new(InstrumentId(1)),
            fair,
            now: Timestamp::ZERO,
            submitted: Vec::new(),
            cancelled: Vec::new(),
            wakeups: Vec::new(),
        }
    }

    /// Rest an order on the book from a synthetic counterparty.
    pub fn seed_book(&mut self, side: OrderSide, price: Price, quantity: Quantity) {
        self.engine.process_order(&OrderRequest {
            client_id: SEED_CLIENT,
            quantity,
            price,
            instrument_id: InstrumentId(1),
            side,
            order_type: OrderType::Limit,
        });
    }
}

impl AgentContext for MockContext {
    fn submit_order(
        &mut self,
        instrument: InstrumentId,
        quantity: Quantity,
        price: Price,
        side: OrderSide,
        order_type: OrderType,
    ) {
        self.submitted
            .push((instrument, quantity, price, side, order_type));
    }

    fn cancel_order(&mut self, order_id: OrderId) {
        self.cancelled.push(order_id);
    }

    fn modify_order(&mut self, _order_id: OrderId, _new_quantity: Quantity, _new_price: Price) {}

    fn schedule_wakeup(&mut self, at: Timestamp) {
        self.wakeups.push(at);
    }

    fn order_book(&self, _instrument: InstrumentId) -> &OrderBook {
        self.engine.order_book()
    }

    fn fair_price(&self) -> Price {
        self.fair
    }

    fn now(&self) -> Timestamp {
        self.now
    }
}
