//! Market maker: two-sided quotes around the book midpoint with inventory
//! skew.
//!
//! Every cycle the maker pulls all of its quotes and reposts around the
//! current midpoint, shifting both quotes down when long and up when short,
//! and stops quoting the side that would push inventory past its cap.

use serde::{Deserialize, Serialize};
use types::{
    ClientId, InstrumentId, OrderAccepted, OrderCancelled, OrderId, OrderSide, OrderType, Price,
    Quantity, Timestamp, Trade,
};

use crate::traits::{Agent, AgentContext};

/// Configuration for a market maker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketMakerConfig {
    pub instrument: InstrumentId,
    /// Sigma of the Gaussian observation noise; the quoting logic works from
    /// the book midpoint, so this only feeds the recorded configuration.
    pub observation_noise: f64,
    /// Distance of each quote from the midpoint before skew.
    pub half_spread: Price,
    pub quote_size: Quantity,
    pub update_interval: Timestamp,
    /// Quote shift per unit of net inventory.
    pub inventory_skew_factor: f64,
    /// Net position bound; quoting stops on the side that would exceed it.
    pub max_position: Quantity,
    /// Sigma of the log-normal latency jitter; 0 disables.
    #[serde(default)]
    pub latency_jitter: f64,
}

impl Default for MarketMakerConfig {
    fn default() -> Self {
        Self {
            instrument: InstrumentId(1),
            observation_noise: 0.0,
            half_spread: Price(2),
            quote_size: Quantity(10),
            update_interval: Timestamp(100),
            inventory_skew_factor: 0.0,
            max_position: Quantity(100),
            latency_jitter: 0.0,
        }
    }
}

/// Quotes bid/ask around the midpoint, tracking position from fills.
pub struct MarketMaker {
    id: ClientId,
    config: MarketMakerConfig,
    long_position: Quantity,
    short_position: Quantity,
    active_orders: Vec<OrderId>,
}

impl MarketMaker {
    pub fn new(id: ClientId, config: MarketMakerConfig) -> Self {
        Self {
            id,
            config,
            long_position: Quantity::ZERO,
            short_position: Quantity::ZERO,
            active_orders: Vec::new(),
        }
    }

    pub fn long_position(&self) -> Quantity {
        self.long_position
    }

    pub fn short_position(&self) -> Quantity {
        self.short_position
    }

    /// Net inventory: long minus short.
    pub fn net_position(&self) -> i64 {
        self.long_position.raw() as i64 - self.short_position.raw() as i64
    }

    fn cancel_existing_quotes(&mut self, ctx: &mut dyn AgentContext) {
        for order_id in self.active_orders.drain(..) {
            ctx.cancel_order(order_id);
        }
    }

    fn post_new_quotes(&mut self, ctx: &mut dyn AgentContext) {
        let book = ctx.order_book(self.config.instrument);
        let (Some(best_bid), Some(best_ask)) = (book.best_bid_price(), book.best_ask_price())
        else {
            // One-sided or empty book: no midpoint, skip this cycle.
            return;
        };
        let mid = (best_bid.raw() + best_ask.raw()) / 2;

        let net = self.net_position();
        let skew = net as f64 * self.config.inventory_skew_factor;
        let half = self.config.half_spread.raw() as f64;

        let bid = Price((mid as f64 - half - skew).max(1.0).round() as u64);
        let ask = Price((mid as f64 + half - skew).max(1.0).round() as u64);

        let max = self.config.max_position.raw() as i64;
        if net < max {
            ctx.submit_order(
                self.config.instrument,
                self.config.quote_size,
                bid,
                OrderSide::Buy,
                OrderType::Limit,
            );
        }
        if net > -max {
            ctx.submit_order(
                self.config.instrument,
                self.config.quote_size,
                ask,
                OrderSide::Sell,
                OrderType::Limit,
            );
        }
    }
}

impl Agent for MarketMaker {
    fn id(&self) -> ClientId {
        self.id
    }

    fn on_wakeup(&mut self, ctx: &mut dyn AgentContext) {
        self.cancel_existing_quotes(ctx);
        self.post_new_quotes(ctx);
        let at = ctx.now() + self.config.update_interval;
        ctx.schedule_wakeup(at);
    }

    fn on_trade(&mut self, _ctx: &mut dyn AgentContext, trade: &Trade) {
        if trade.buyer_id == self.id {
            self.long_position += trade.quantity;
        }
        if trade.seller_id == self.id {
            self.short_position += trade.quantity;
        }
    }

    fn on_order_accepted(&mut self, _ctx: &mut dyn AgentContext, event: &OrderAccepted) {
        if event.agent_id == self.id {
            self.active_orders.push(event.order_id);
        }
    }

    fn on_order_cancelled(&mut self, _ctx: &mut dyn AgentContext, event: &OrderCancelled) {
        self.active_orders.retain(|&id| id != event.order_id);
    }
}
