//! Noise trader: random liquidity around a noisy fair-price observation.
//!
//! On each wakeup the trader cancels orders that have drifted too far from
//! fair, submits one random limit order near its observed price, and
//! schedules its next wakeup at a random interval.

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

/// Configuration for a noise trader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseTraderConfig {
    pub instrument: InstrumentId,
    /// Sigma of the Gaussian observation noise; 0 observes exactly.
    pub observation_noise: f64,
    /// Half-width of the uniform price band around the observation.
    pub spread: Price,
    pub min_quantity: Quantity,
    pub max_quantity: Quantity,
    pub min_interval: Timestamp,
    pub max_interval: Timestamp,
    /// Cancel resting orders whose fill would be worse than fair by this
    /// margin; 0 disables.
    pub adverse_fill_threshold: Price,
    /// Cancel resting orders further than this from fair; 0 disables.
    pub stale_order_threshold: Price,
    /// Sigma of the log-normal latency jitter; 0 disables.
    #[serde(default)]
    pub latency_jitter: f64,
}

impl Default for NoiseTraderConfig {
    fn default() -> Self {
        Self {
            instrument: InstrumentId(1),
            observation_noise: 0.0,
            spread: Price(5),
            min_quantity: Quantity(1),
            max_quantity: Quantity(10),
            min_interval: Timestamp(50),
            max_interval: Timestamp(150),
            adverse_fill_threshold: Price(0),
            stale_order_threshold: Price(0),
            latency_jitter: 0.0,
        }
    }
}

/// Submits random limit orders around an observed fair price.
pub struct NoiseTrader {
    id: ClientId,
    config: NoiseTraderConfig,
    rng: StdRng,
    pending_submissions: VecDeque<PendingOrder>,
    active_orders: Vec<TrackedOrder>,
}

impl NoiseTrader {
    pub fn new(id: ClientId, config: NoiseTraderConfig, seed: u64) -> Self {
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

    fn submit_random_order(&mut self, ctx: &mut dyn AgentContext) {
        let observed = observe_price(&mut self.rng, ctx.fair_price(), self.config.observation_noise);

        let side = if self.rng.random_bool(0.5) {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        };

        let low = observed.raw().saturating_sub(self.config.spread.raw());
        let high = observed.raw() + self.config.spread.raw();
        let price = Price(self.rng.random_range(low..=high));
        let quantity = Quantity(
            self.rng
                .random_range(self.config.min_quantity.raw()..=self.config.max_quantity.raw()),
        );

        self.pending_submissions.push_back(PendingOrder {
            price,
            side,
            quantity,
        });
        ctx.submit_order(
            self.config.instrument,
            quantity,
            price,
            side,
            OrderType::Limit,
        );
    }

    fn schedule_next_wakeup(&mut self, ctx: &mut dyn AgentContext) {
        let interval = self
            .rng
            .random_range(self.config.min_interval.raw()..=self.config.max_interval.raw());
        let at = ctx.now() + Timestamp(interval);
        ctx.schedule_wakeup(at);
    }
}

impl Agent for NoiseTrader {
    fn id(&self) -> ClientId {
        self.id
    }

    fn on_wakeup(&mut self, ctx: &mut dyn AgentContext) {
        self.cancel_stale_orders(ctx);
        self.submit_random_order(ctx);
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
    use types::{OrderId, TradeId};

    fn config() -> NoiseTraderConfig {
        NoiseTraderConfig {
            instrument: InstrumentId(1),
            observation_noise: 0.0,
            spread: Price(5),
            min_quantity: Quantity(1),
            max_quantity: Quantity(10),
            min_interval: Timestamp(10),
            max_interval: Timestamp(20),
            adverse_fill_threshold: Price(0),
            stale_order_threshold: Price(10),
            latency_jitter: 0.0,
        }
    }

    #[test]
    fn wakeup_submits_one_order_and_reschedules() {
        let mut trader = NoiseTrader::new(ClientId(1), config(), 42);
        let mut ctx = MockContext::new(Price(1000));

        trader.on_wakeup(&mut ctx);

        assert_eq!(ctx.submitted.len(), 1);
        let (_, qty, price, _, order_type) = ctx.submitted[0];
        assert!(qty >= Quantity(1) && qty <= Quantity(10));
        assert!(price >= Price(995) && price <= Price(1005));
        assert_eq!(order_type, OrderType::Limit);
        assert_eq!(ctx.wakeups.len(), 1);
        assert!(ctx.wakeups[0] >= Timestamp(10) && ctx.wakeups[0] <= Timestamp(20));
    }

    #[test]
    fn acceptance_pairs_with_pending_submission() {
        let mut trader = NoiseTrader::new(ClientId(1), config(), 42);
        let mut ctx = MockContext::new(Price(1000));

        trader.on_wakeup(&mut ctx);
        let (_, qty, price, side, _) = ctx.submitted[0];

        trader.on_order_accepted(
            &mut ctx,
            &OrderAccepted {
                timestamp: Timestamp(1),
                order_id: OrderId(7),
                agent_id: ClientId(1),
                instrument_id: InstrumentId(1),
            },
        );

        assert_eq!(trader.active_orders().len(), 1);
        let tracked = trader.active_orders()[0];
        assert_eq!(tracked.order_id, OrderId(7));
        assert_eq!(tracked.price, price);
        assert_eq!(tracked.side, side);
        assert_eq!(tracked.remaining_quantity, qty);
    }

    #[test]
    fn stale_buy_order_is_cancelled_on_wakeup() {
        let mut trader = NoiseTrader::new(ClientId(1), config(), 42);
        trader.active_orders.push(TrackedOrder {
            order_id: OrderId(5),
            price: Price(900),
            side: OrderSide::Buy,
            remaining_quantity: Quantity(3),
        });

        // Fair price 1000: a bid at 900 is more than 10 below fair.
        let mut ctx = MockContext::new(Price(1000));
        trader.on_wakeup(&mut ctx);

        assert_eq!(ctx.cancelled, vec![OrderId(5)]);
    }

    #[test]
    fn trade_decrements_then_removes_tracked_order() {
        let mut trader = NoiseTrader::new(ClientId(1), config(), 42);
        trader.active_orders.push(TrackedOrder {
            order_id: OrderId(5),
            price: Price(1000),
            side: OrderSide::Buy,
            remaining_quantity: Quantity(10),
        });
        let mut ctx = MockContext::new(Price(1000));

        let trade = Trade {
            timestamp: Timestamp(1),
            trade_id: TradeId(1),
            instrument_id: InstrumentId(1),
            buyer_order_id: OrderId(5),
            seller_order_id: OrderId(9),
            buyer_id: ClientId(1),
            seller_id: ClientId(2),
            quantity: Quantity(4),
            price: Price(1000),
            aggressor_side: OrderSide::Sell,
        };
        trader.on_trade(&mut ctx, &trade);
        assert_eq!(trader.active_orders()[0].remaining_quantity, Quantity(6));

        let rest = Trade {
            quantity: Quantity(6),
            ..trade
        };
        trader.on_trade(&mut ctx, &rest);
        assert!(trader.active_orders().is_empty());
    }

    #[test]
    fn cancellation_drops_tracked_order() {
        let mut trader = NoiseTrader::new(ClientId(1), config(), 42);
        trader.active_orders.push(TrackedOrder {
            order_id: OrderId(5),
            price: Price(1000),
            side: OrderSide::Buy,
            remaining_quantity: Quantity(10),
        });
        let mut ctx = MockContext::new(Price(1000));

        trader.on_order_cancelled(
            &mut ctx,
            &OrderCancelled {
                timestamp: Timestamp(1),
                order_id: OrderId(5),
                agent_id: ClientId(1),
                remaining_quantity: Quantity(10),
            },
        );
        assert!(trader.active_orders().is_empty());
    }

    #[test]
    fn same_seed_same_behavior() {
        let mut a = NoiseTrader::new(ClientId(1), config(), 7);
        let mut b = NoiseTrader::new(ClientId(1), config(), 7);
        let mut ctx_a = MockContext::new(Price(1000));
        let mut ctx_b = MockContext::new(Price(1000));

        for _ in 0..10 {
            a.on_wakeup(&mut ctx_a);
            b.on_wakeup(&mut ctx_b);
        }
        assert_eq!(ctx_a.submitted, ctx_b.submitted);
        assert_eq!(ctx_a.wakeups, ctx_b.wakeups);
    }
}
