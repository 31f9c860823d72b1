//! The simulation driver.
//!
//! `SimulationEngine` owns the matching engines, the agent roster, the
//! scheduler, the P&L ledger, and the fair-price source. It pops events in
//! strict `(timestamp, sequence)` order, advances the fair price to each
//! event's time, and dispatches. The engine itself implements
//! [`AgentContext`]: before every agent callback it records which agent is
//! running, and every action taken inside the callback is attributed to that
//! agent and scheduled at `now + latency(agent)`.

use std::collections::{BTreeMap, HashMap};

use agents::{Agent, AgentContext};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use sim_core::{MatchingEngine, OrderBook};
use types::{
    AgentWakeup, CancellationSubmitted, ClientId, Event, InstrumentId, ModificationSubmitted,
    ModifyStatus, Order, OrderAccepted, OrderCancelled, OrderId, OrderModified, OrderRejected,
    OrderRequest, OrderSide, OrderStatus, OrderSubmitted, OrderType, Price, Quantity, Timestamp,
    Trade, TradeEvent,
};

use crate::fair_price::FairPriceSource;
use crate::hooks::SharedHook;
use crate::pnl::PnL;
use crate::scheduler::Scheduler;

/// Log-normal per-action latency noise for one agent.
struct LatencyJitter {
    sigma: f64,
    rng: StdRng,
}

/// Owns all simulation state and runs the event loop.
pub struct SimulationEngine {
    scheduler: Scheduler,
    /// Keyed deterministically so the cancel/modify ownership scan and any
    /// cross-instrument iteration has a reproducible order.
    engines: BTreeMap<InstrumentId, MatchingEngine>,
    agents: HashMap<ClientId, Box<dyn Agent>>,
    pnl: BTreeMap<ClientId, PnL>,
    fair_price: Option<Box<dyn FairPriceSource>>,
    default_latency: Timestamp,
    agent_latency: HashMap<ClientId, Timestamp>,
    latency_jitter: HashMap<ClientId, LatencyJitter>,
    current_agent: ClientId,
    /// Returned to agents asking about an unknown instrument.
    empty_book: OrderBook,
    hooks: Vec<SharedHook>,
}

impl SimulationEngine {
    /// Create a driver with the given global default action latency.
    pub fn new(default_latency: Timestamp) -> Self {
        Self {
            scheduler: Scheduler::new(),
            engines: BTreeMap::new(),
            agents: HashMap::new(),
            pnl: BTreeMap::new(),
            fair_price: None,
            default_latency,
            agent_latency: HashMap::new(),
            latency_jitter: HashMap::new(),
            current_agent: ClientId(0),
            empty_book: OrderBook::new(InstrumentId(0)),
            hooks: Vec::new(),
        }
    }

    /// Create a matching engine for an instrument.
    pub fn add_instrument(&mut self, instrument_id: InstrumentId) {
        self.engines
            .insert(instrument_id, MatchingEngine::new(instrument_id));
    }

    /// Register an agent under its own id.
    pub fn add_agent(&mut self, agent: Box<dyn Agent>) {
        self.agents.insert(agent.id(), agent);
    }

    /// Install the fair-price source.
    pub fn set_fair_price_source(&mut self, source: Box<dyn FairPriceSource>) {
        self.fair_price = Some(source);
    }

    /// Per-agent base latency override; zero restores the global default.
    pub fn set_agent_latency(&mut self, agent_id: ClientId, latency: Timestamp) {
        if latency.raw() == 0 {
            self.agent_latency.remove(&agent_id);
        } else {
            self.agent_latency.insert(agent_id, latency);
        }
    }

    /// Per-agent log-normal latency jitter; `sigma <= 0` disables it.
    pub fn set_agent_latency_jitter(&mut self, agent_id: ClientId, sigma: f64, seed: u64) {
        if sigma > 0.0 {
            self.latency_jitter.insert(
                agent_id,
                LatencyJitter {
                    sigma,
                    rng: StdRng::seed_from_u64(seed),
                },
            );
        } else {
            self.latency_jitter.remove(&agent_id);
        }
    }

    /// Register an observer.
    pub fn add_hook(&mut self, hook: SharedHook) {
        self.hooks.push(hook);
    }

    /// Direct scheduler access, used by setup to seed initial events.
    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Current simulated time.
    pub fn now(&self) -> Timestamp {
        self.scheduler.now()
    }

    /// Current true price of the fair-price process (zero when unset).
    pub fn mark_price(&self) -> Price {
        self.fair_price
            .as_ref()
            .map(|source| source.true_price())
            .unwrap_or(Price::ZERO)
    }

    /// A participant's P&L (zeroed if it never traded).
    pub fn pnl(&self, client_id: ClientId) -> PnL {
        self.pnl.get(&client_id).copied().unwrap_or_default()
    }

    /// The full P&L table, keyed in client order.
    pub fn all_pnl(&self) -> &BTreeMap<ClientId, PnL> {
        &self.pnl
    }

    /// The matching engine for an instrument.
    pub fn engine(&self, instrument_id: InstrumentId) -> Option<&MatchingEngine> {
        self.engines.get(&instrument_id)
    }

    /// All configured instrument ids, ascending.
    pub fn instrument_ids(&self) -> Vec<InstrumentId> {
        self.engines.keys().copied().collect()
    }

    /// Process events until the queue is exhausted or the next event is past
    /// `end_time` (inclusive bound).
    pub fn run_until(&mut self, end_time: Timestamp) {
        while self
            .scheduler
            .peek()
            .is_some_and(|event| event.timestamp() <= end_time)
        {
            self.step();
        }
    }

    /// Pop and dispatch a single event; a no-op when the queue is empty.
    pub fn step(&mut self) {
        let Some(event) = self.scheduler.pop() else {
            return;
        };

        if let Some(source) = self.fair_price.as_mut() {
            source.advance_to(self.scheduler.now());
        }

        match event {
            Event::OrderSubmitted(e) => self.handle_order_submitted(e),
            Event::CancellationSubmitted(e) => self.handle_cancellation(e),
            Event::ModificationSubmitted(e) => self.handle_modification(e),
            Event::AgentWakeup(e) => self.handle_wakeup(e),
            // Notification variants are delivered synchronously inside the
            // handlers above and never travel through the queue.
            Event::OrderAccepted(_)
            | Event::OrderRejected(_)
            | Event::OrderCancelled(_)
            | Event::OrderModified(_)
            | Event::Trade(_) => {}
        }

        let now = self.scheduler.now();
        let fair = self.mark_price();
        for hook in &self.hooks {
            hook.borrow_mut().on_step(now, &self.pnl, fair);
        }
    }

    /// Signal observers that the run is over.
    pub fn finish(&mut self, duration: Timestamp) {
        for hook in &self.hooks {
            hook.borrow_mut().on_simulation_end(duration);
        }
    }

    fn handle_wakeup(&mut self, event: AgentWakeup) {
        let Some(mut agent) = self.agents.remove(&event.agent_id) else {
            return;
        };
        self.current_agent = event.agent_id;
        agent.on_wakeup(self);
        self.agents.insert(event.agent_id, agent);
    }

    fn handle_order_submitted(&mut self, event: OrderSubmitted) {
        let now = self.scheduler.now();

        let Some(engine) = self.engines.get_mut(&event.instrument_id) else {
            let rejection = OrderRejected {
                timestamp: now,
                agent_id: event.agent_id,
                instrument_id: event.instrument_id,
                reason: OrderStatus::Rejected,
            };
            self.notify_order_rejected(rejection);
            return;
        };

        let request = OrderRequest {
            client_id: event.agent_id,
            quantity: event.quantity,
            price: event.price,
            instrument_id: event.instrument_id,
            side: event.side,
            order_type: event.order_type,
        };
        let result = engine.process_order(&request);
        let resting = engine.get_order(result.order_id);
        let best_bid = engine.order_book().best_bid_price();
        let best_ask = engine.order_book().best_ask_price();
        let resting_remainders = counterparty_remainders(engine, &result.trades, event.side);

        let accepted = OrderAccepted {
            timestamp: now,
            order_id: result.order_id,
            agent_id: event.agent_id,
            instrument_id: event.instrument_id,
        };
        for hook in &self.hooks {
            hook.borrow_mut().on_order_accepted(&accepted, resting.as_ref());
        }
        self.notify_order_accepted(accepted);

        let mut aggressor_remaining = event.quantity;
        for (trade_event, resting_remaining) in result.trades.iter().zip(resting_remainders) {
            aggressor_remaining -= trade_event.quantity;
            let trade = stamp_trade(trade_event, now, event.side);
            self.record_and_notify_trade(trade, aggressor_remaining, resting_remaining);
        }

        let fair = self.mark_price();
        for hook in &self.hooks {
            hook.borrow_mut()
                .on_market_state(now, fair, best_bid, best_ask);
        }
    }

    fn handle_cancellation(&mut self, event: CancellationSubmitted) {
        let now = self.scheduler.now();

        let mut cancelled: Option<Order> = None;
        for engine in self.engines.values_mut() {
            let Some(order) = engine.get_order(event.order_id) else {
                continue;
            };
            if engine.cancel_order(event.agent_id, event.order_id) {
                cancelled = Some(order);
                break;
            }
        }
        let Some(order) = cancelled else { return };

        let notification = OrderCancelled {
            timestamp: now,
            order_id: event.order_id,
            agent_id: event.agent_id,
            remaining_quantity: order.quantity,
        };
        for hook in &self.hooks {
            hook.borrow_mut().on_order_cancelled(&notification, &order);
        }
        self.notify_order_cancelled(notification);
    }

    fn handle_modification(&mut self, event: ModificationSubmitted) {
        let now = self.scheduler.now();

        // First engine that knows the order handles the request.
        let mut handled = None;
        for (&instrument_id, engine) in self.engines.iter_mut() {
            let Some(order) = engine.get_order(event.order_id) else {
                continue;
            };
            let result = engine.modify_order(
                event.agent_id,
                event.order_id,
                event.new_quantity,
                event.new_price,
            );
            let resting_remainders = result
                .match_result
                .as_ref()
                .map(|inner| counterparty_remainders(engine, &inner.trades, order.side))
                .unwrap_or_default();
            handled = Some((instrument_id, order, result, resting_remainders));
            break;
        }
        let Some((instrument_id, order, result, resting_remainders)) = handled else {
            return;
        };
        if result.status != ModifyStatus::Accepted {
            return;
        }

        let notification = OrderModified {
            timestamp: now,
            old_order_id: event.order_id,
            new_order_id: result.new_order_id,
            agent_id: event.agent_id,
            old_price: order.price,
            new_price: event.new_price,
            old_quantity: order.quantity,
            new_quantity: event.new_quantity,
        };
        for hook in &self.hooks {
            hook.borrow_mut()
                .on_order_modified(&notification, instrument_id, order.side);
        }
        self.notify_order_modified(notification);

        if let Some(inner) = result.match_result {
            let mut aggressor_remaining = event.new_quantity;
            for (trade_event, resting_remaining) in inner.trades.iter().zip(resting_remainders) {
                aggressor_remaining -= trade_event.quantity;
                let trade = stamp_trade(trade_event, now, order.side);
                self.record_and_notify_trade(trade, aggressor_remaining, resting_remaining);
            }
        }
    }

    /// Emit trade/fill records, settle cash and positions, and deliver the
    /// trade to both counterparties, buyer first.
    fn record_and_notify_trade(
        &mut self,
        trade: Trade,
        aggressor_remaining: Quantity,
        resting_remaining: Quantity,
    ) {
        let fair = self.mark_price();
        for hook in &self.hooks {
            hook.borrow_mut().on_trade(&trade, fair);
        }

        let (buyer_remaining, seller_remaining) = match trade.aggressor_side {
            OrderSide::Buy => (aggressor_remaining, resting_remaining),
            OrderSide::Sell => (resting_remaining, aggressor_remaining),
        };
        for hook in &self.hooks {
            hook.borrow_mut().on_fill(
                &trade,
                trade.buyer_order_id,
                trade.buyer_id,
                buyer_remaining,
                OrderSide::Buy,
            );
        }
        for hook in &self.hooks {
            hook.borrow_mut().on_fill(
                &trade,
                trade.seller_order_id,
                trade.seller_id,
                seller_remaining,
                OrderSide::Sell,
            );
        }

        let trade_value = trade.price * trade.quantity;
        {
            let buyer = self.pnl.entry(trade.buyer_id).or_default();
            buyer.long_position += trade.quantity;
            buyer.cash -= trade_value;
        }
        {
            let seller = self.pnl.entry(trade.seller_id).or_default();
            seller.short_position += trade.quantity;
            seller.cash += trade_value;
        }

        if let Some(mut agent) = self.agents.remove(&trade.buyer_id) {
            self.current_agent = trade.buyer_id;
            agent.on_trade(self, &trade);
            self.agents.insert(trade.buyer_id, agent);
        }
        if let Some(mut agent) = self.agents.remove(&trade.seller_id) {
            self.current_agent = trade.seller_id;
            agent.on_trade(self, &trade);
            self.agents.insert(trade.seller_id, agent);
        }
    }

    fn notify_order_accepted(&mut self, event: OrderAccepted) {
        if let Some(mut agent) = self.agents.remove(&event.agent_id) {
            self.current_agent = event.agent_id;
            agent.on_order_accepted(self, &event);
            self.agents.insert(event.agent_id, agent);
        }
    }

    fn notify_order_rejected(&mut self, event: OrderRejected) {
        if let Some(mut agent) = self.agents.remove(&event.agent_id) {
            self.current_agent = event.agent_id;
            agent.on_order_rejected(self, &event);
            self.agents.insert(event.agent_id, agent);
        }
    }

    fn notify_order_cancelled(&mut self, event: OrderCancelled) {
        if let Some(mut agent) = self.agents.remove(&event.agent_id) {
            self.current_agent = event.agent_id;
            agent.on_order_cancelled(self, &event);
            self.agents.insert(event.agent_id, agent);
        }
    }

    fn notify_order_modified(&mut self, event: OrderModified) {
        if let Some(mut agent) = self.agents.remove(&event.agent_id) {
            self.current_agent = event.agent_id;
            agent.on_order_modified(self, &event);
            self.agents.insert(event.agent_id, agent);
        }
    }

    /// Latency applied to the current agent's next action.
    fn action_latency(&mut self, agent_id: ClientId) -> Timestamp {
        let base = self
            .agent_latency
            .get(&agent_id)
            .copied()
            .unwrap_or(self.default_latency);
        if base.raw() == 0 {
            return base;
        }
        let Some(jitter) = self.latency_jitter.get_mut(&agent_id) else {
            return base;
        };
        // Multiplier exp(sigma * z - sigma^2 / 2), so the scale is preserved.
        let z: f64 = StandardNormal.sample(&mut jitter.rng);
        let factor = (jitter.sigma * z - 0.5 * jitter.sigma * jitter.sigma).exp();
        Timestamp((base.raw() as f64 * factor).round().max(0.0) as u64)
    }
}

impl AgentContext for SimulationEngine {
    fn submit_order(
        &mut self,
        instrument: InstrumentId,
        quantity: Quantity,
        price: Price,
        side: OrderSide,
        order_type: OrderType,
    ) {
        let agent_id = self.current_agent;
        let timestamp = self.scheduler.now() + self.action_latency(agent_id);
        self.scheduler.schedule(Event::OrderSubmitted(OrderSubmitted {
            timestamp,
            agent_id,
            instrument_id: instrument,
            quantity,
            price,
            side,
            order_type,
        }));
    }

    fn cancel_order(&mut self, order_id: OrderId) {
        let agent_id = self.current_agent;
        let timestamp = self.scheduler.now() + self.action_latency(agent_id);
        self.scheduler
            .schedule(Event::CancellationSubmitted(CancellationSubmitted {
                timestamp,
                agent_id,
                order_id,
            }));
    }

    fn modify_order(&mut self, order_id: OrderId, new_quantity: Quantity, new_price: Price) {
        let agent_id = self.current_agent;
        let timestamp = self.scheduler.now() + self.action_latency(agent_id);
        self.scheduler
            .schedule(Event::ModificationSubmitted(ModificationSubmitted {
                timestamp,
                agent_id,
                order_id,
                new_quantity,
                new_price,
            }));
    }

    fn schedule_wakeup(&mut self, at: Timestamp) {
        // Self-wakeups are timers, not exchange actions: no latency.
        self.scheduler.schedule(Event::AgentWakeup(AgentWakeup {
            timestamp: at,
            agent_id: self.current_agent,
        }));
    }

    fn order_book(&self, instrument: InstrumentId) -> &OrderBook {
        self.engines
            .get(&instrument)
            .map(|engine| engine.order_book())
            .unwrap_or(&self.empty_book)
    }

    fn fair_price(&self) -> Price {
        self.mark_price()
    }

    fn now(&self) -> Timestamp {
        self.scheduler.now()
    }
}

/// Timestamp an engine-level trade into a driver-level notification.
fn stamp_trade(trade: &TradeEvent, now: Timestamp, aggressor_side: OrderSide) -> Trade {
    Trade {
        timestamp: now,
        trade_id: trade.trade_id,
        instrument_id: trade.instrument_id,
        buyer_order_id: trade.buyer_order_id,
        seller_order_id: trade.seller_order_id,
        buyer_id: trade.buyer_id,
        seller_id: trade.seller_id,
        quantity: trade.quantity,
        price: trade.price,
        aggressor_side,
    }
}

/// Post-match remaining quantity of each trade's resting counterparty.
///
/// A resting order participates in at most one trade per matching pass, so
/// its post-pass remainder equals its post-trade remainder; zero means it
/// was fully consumed and removed.
fn counterparty_remainders(
    engine: &MatchingEngine,
    trades: &[TradeEvent],
    aggressor_side: OrderSide,
) -> Vec<Quantity> {
    trades
        .iter()
        .map(|trade| {
            let resting_order_id = match aggressor_side {
                OrderSide::Buy => trade.seller_order_id,
                OrderSide::Sell => trade.buyer_order_id,
            };
            engine
                .get_order(resting_order_id)
                .map(|order| order.quantity)
                .unwrap_or(Quantity::ZERO)
        })
        .collect()
}
