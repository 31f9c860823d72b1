//! Informed trader: trades when its fair-price observation shows enough edge
//! against the visible book.
//!
//! Buys at the ask when the observation exceeds it by `min_edge`, sells at
//! the bid when the observation sits below it by `min_edge`. Posting at the
//! touch typically executes immediately.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use types::{
    ClientId, InstrumentId, OrderAccepted, OrderCancelled, OrderSide, OrderType, Price, Quantity,
    Timestamp, Trade,
};

use crate::tracked::{apply_fill, is_order_stale, observe_price, PendingOrder, TrackedOrder};
use crate::traits::{Agent, AgentContext};

/// Configuration for an informed trader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InformedTraderConfig {
    pub instrument: InstrumentId,
    pub min_quantity: Quantity,
    pub max_quantity: Quantity,
    pub min_interval: Timestamp,
    pub max_interval: Timestamp,
    /// Required distance between observation and touch before trading.
    pub min_edge: Price,
    /// Sigma of the Gaussian observation noise; 0 observes exactly.
    pub observation_noise: f64,
    /// Cancel resting orders whose fill would be worse than fair by this
    /// margin; 0 disables.
    pub adverse_fill_threshold: Price,
    /// Cancel resting orders further than this from fair; 0 disables.
    pub stale_order_threshold: Price,
    /// Sigma of the log-normal latency jitter; 0 disables.
    #[serde(default)]
    pub latency_jitter: f64,
}

impl Default for InformedTraderConfig {
    fn default() -> Self {
        Self {
            instrument: InstrumentId(1),
            min_quantity: Quantity(1),
            max_quantity: Quantity(10),
            min_interval: Timestamp(50),
            max_interval: Timestamp(150),
            min_edge: Price(5),
            observation_noise: 0.0,
            adverse_fill_threshold: Price(0),
            stale_order_threshold: Price(0),
            latency_jitter: 0.0,
        }
    }
}

/// Trades against the touch when the observed fair price shows edge.
pub struct InformedTrader {
    id: ClientId,
    config: InformedTraderConfig,
    rng: StdRng,
    pending_submissions: VecDeque<PendingOrder>,
    active_orders: Vec<TrackedOrder>,
}

impl InformedTrader {
    pub fn new(id: ClientId, config: InformedTraderConfig, seed: u64) -> Self {
        Self {
            id,
            config,
            rng: StdRng::seed_from_u64(seed),
            pending_submissions: VecDeque::new(),
            active_orders: Vec::new(),
        }
    }

    /// Orders currently tracked as resting.
    pub fn active_orders(&self) -> &[TrackedOrder] {
        &self.active_orders
    }

    fn cancel_stale_orders(&mut self, ctx: &mut dyn AgentContext) {
        let fair = ctx.fair_price();
        for order in &self.active_orders {
            if is_order_stale(
                order,
                fair,
                self.config.adverse_fill_threshold,
                self.config.stale_order_threshold,
            ) {
                ctx.cancel_order(order.order_id);
            }
        }
    }

    fn random_quantity(&mut self) -> Quantity {
        Quantity(
            self.rng
                .random_range(self.config.min_quantity.raw()..=self.config.max_quantity.raw()),
        )
    }

    fn schedule_next_wakeup(&mut self, ctx: &mut dyn AgentContext) {
        let interval = self
            .rng
            .random_range(self.config.min_interval.raw()..=self.config.max_interval.raw());
        let at = ctx.now() + Timestamp(interval);
        ctx.schedule_wakeup(at);
    }
}

impl Agent for InformedTrader {
    fn id(&self) -> ClientId {
        self.id
    }

    fn on_wakeup(&mut self, ctx: &mut dyn AgentContext) {
        self.cancel_stale_orders(ctx);

        let observed = observe_price(&mut self.rng, ctx.fair_price(), self.config.observation_noise);
        let book = ctx.order_book(self.config.instrument);
        let best_ask = book.best_ask_price();
        let best_bid = book.best_bid_price();

        if let Some(ask) = best_ask
            && observed > ask + self.config.min_edge
        {
            let quantity = self.random_quantity();
            self.pending_submissions.push_back(PendingOrder {
                price: ask,
                side: OrderSide::Buy,
                quantity,
            });
            ctx.submit_order(
                self.config.instrument,
                quantity,
                ask,
                OrderSide::Buy,
                OrderType::Limit,
            );
        }

        if let Some(bid) = best_bid
            && observed + self.config.min_edge < bid
        {
            let quantity = self.random_quantity();
            self.pending_submissions.push_back(PendingOrder {
                price: bid,
                side: OrderSide::Sell,
                quantity,
            });
            ctx.submit_order(
                self.config.instrument,
                quantity,
                bid,
                OrderSide::Sell,
                OrderType::Limit,
            );
        }

        self.schedule_next_wakeup(ctx);
    }

    fn on_order_accepted(&mut self, _ctx: &mut dyn AgentContext, event: &OrderAccepted) {
        if event.agent_id == self.id
            && let Some(pending) = self.pending_submissions.pop_front()
        {
            self.active_orders.push(TrackedOrder {
                order_id: event.order_id,
                price: pending.price,
                side: pending.side,
                remaining_quantity: pending.quantity,
            });
        }
    }

    fn on_order_cancelled(&mut self, _ctx: &mut dyn AgentContext, event: &OrderCancelled) {
        self.active_orders.retain(|o| o.order_id != event.order_id);
    }

    fn on_trade(&mut self, _ctx: &mut dyn AgentContext, trade: &Trade) {
        if trade.buyer_id == self.id {
            apply_fill(&mut self.active_orders, trade.buyer_order_id, trade.quantity);
        }
        if trade.seller_id == self.id {
            apply_fill(&mut self.active_orders, trade.seller_order_id, trade.quantity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockContext;
    use types::OrderId;

    fn config() -> InformedTraderConfig {
        InformedTraderConfig {
            instrument: InstrumentId(1),
            min_quantity: Quantity(5),
            max_quantity: Quantity(5),
            min_interval: Timestamp(10),
            max_interval: Timestamp(10),
            min_edge: Price(5),
            observation_noise: 0.0,
            adverse_fill_threshold: Price(0),
            stale_order_threshold: Price(0),
            latency_jitter: 0.0,
        }
    }

    #[test]
    fn buys_the_ask_when_observation_shows_edge() {
        let mut trader = InformedTrader::new(ClientId(1), config(), 42);
        // Fair 120, ask 100: 120 > 100 + 5.
        let mut ctx = MockContext::new(Price(120));
        ctx.seed_book(OrderSide::Sell, Price(100), Quantity(100));

        trader.on_wakeup(&mut ctx);

        assert_eq!(ctx.submitted.len(), 1);
        let (_, qty, price, side, _) = ctx.submitted[0];
        assert_eq!(side, OrderSide::Buy);
        assert_eq!(price, Price(100));
        assert_eq!(qty, Quantity(5));
    }

    #[test]
    fn sells_the_bid_when_observation_sits_below() {
        let mut trader = InformedTrader::new(ClientId(1), config(), 42);
        // Fair 80, bid 100: 80 + 5 < 100.
        let mut ctx = MockContext::new(Price(80));
        ctx.seed_book(OrderSide::Buy, Price(100), Quantity(100));

        trader.on_wakeup(&mut ctx);

        assert_eq!(ctx.submitted.len(), 1);
        let (_, _, price, side, _) = ctx.submitted[0];
        assert_eq!(side, OrderSide::Sell);
        assert_eq!(price, Price(100));
    }

    #[test]
    fn no_trade_without_edge() {
        let mut trader = InformedTrader::new(ClientId(1), config(), 42);
        // Fair 103, ask 100: 103 is not above 100 + 5.
        let mut ctx = MockContext::new(Price(103));
        ctx.seed_book(OrderSide::Sell, Price(100), Quantity(100));
        ctx.seed_book(OrderSide::Buy, Price(99), Quantity(100));

        trader.on_wakeup(&mut ctx);

        assert!(ctx.submitted.is_empty());
        assert_eq!(ctx.wakeups.len(), 1);
    }

    #[test]
    fn empty_book_never_trades() {
        let mut trader = InformedTrader::new(ClientId(1), config(), 42);
        let mut ctx = MockContext::new(Price(500));

        trader.on_wakeup(&mut ctx);

        assert!(ctx.submitted.is_empty());
    }

    #[test]
    fn adverse_buy_order_is_cancelled() {
        let mut trader = InformedTrader::new(
            ClientId(1),
            InformedTraderConfig {
                adverse_fill_threshold: Price(10),
                ..config()
            },
            42,
        );
        trader.active_orders.push(TrackedOrder {
            order_id: OrderId(4),
            price: Price(1015),
            side: OrderSide::Buy,
            remaining_quantity: Quantity(5),
        });
        // Bidding 1015 against fair 1000 exceeds the 10-tick adverse margin.
        let mut ctx = MockContext::new(Price(1000));

        trader.on_wakeup(&mut ctx);

        assert_eq!(ctx.cancelled, vec![OrderId(4)]);
    }

    #[test]
    fn partial_fill_keeps_tracked_order() {
        let mut trader = InformedTrader::new(ClientId(1), config(), 42);
        trader.active_orders.push(TrackedOrder {
            order_id: OrderId(4),
            price: Price(100),
            side: OrderSide::Buy,
            remaining_quantity: Quantity(5),
        });
        let mut ctx = MockContext::new(Price(100));

        let trade = types::Trade {
            timestamp: Timestamp(1),
            trade_id: types::TradeId(1),
            instrument_id: InstrumentId(1),
            buyer_order_id: OrderId(4),
            seller_order_id: OrderId(9),
            buyer_id: ClientId(1),
            seller_id: ClientId(2),
            quantity: Quantity(2),
            price: Price(100),
            aggressor_side: OrderSide::Sell,
        };
        trader.on_trade(&mut ctx, &trade);

        assert_eq!(trader.active_orders().len(), 1);
        assert_eq!(trader.active_orders()[0].remaining_quantity, Quantity(3));
    }
}
