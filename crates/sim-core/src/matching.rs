//! Matching engine implementing price-time priority with self-trade
//! prevention.
//!
//! One engine exists per instrument. It owns the order book, mints order and
//! trade ids, and reports every outcome through result values; expected
//! business failures (unknown order, ownership mismatch) never panic.

use types::{
    ClientId, InstrumentId, ModifyStatus, Order, OrderId, OrderRequest, OrderSide, OrderStatus,
    OrderType, Price, Quantity, Timestamp, TradeEvent, TradeId,
};

use crate::order_book::OrderBook;

/// Outcome of processing one order request.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// Id assigned to the incoming order (the aggressor id on its trades).
    pub order_id: OrderId,
    /// Zero; the driver stamps times onto notifications.
    pub timestamp: Timestamp,
    /// Unexecuted quantity after matching.
    pub remaining_quantity: Quantity,
    /// Last opposite-side level examined, or the request price when the
    /// opposite side started empty.
    pub accepted_price: Price,
    pub status: OrderStatus,
    pub instrument_id: InstrumentId,
    /// Executions in the order they occurred.
    pub trades: Vec<TradeEvent>,
}

impl MatchResult {
    /// Whether any execution occurred.
    pub fn has_trades(&self) -> bool {
        !self.trades.is_empty()
    }
}

/// Outcome of a modification request.
#[derive(Debug, Clone)]
pub struct ModifyResult {
    pub client_id: ClientId,
    pub old_order_id: OrderId,
    /// Newly assigned id for price/quantity-up changes; the old id for
    /// in-place changes; zero when the request was invalid.
    pub new_order_id: OrderId,
    pub new_quantity: Quantity,
    pub new_price: Price,
    pub status: ModifyStatus,
    pub instrument_id: InstrumentId,
    /// Present when the modification re-entered the matching path.
    pub match_result: Option<MatchResult>,
}

/// Price-time-priority matching engine for a single instrument.
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    instrument_id: InstrumentId,
    book: OrderBook,
    order_counter: u64,
    trade_counter: u64,
}

impl MatchingEngine {
    /// Create an engine with an empty book.
    pub fn new(instrument_id: InstrumentId) -> Self {
        Self {
            instrument_id,
            book: OrderBook::new(instrument_id),
            order_counter: 0,
            trade_counter: 0,
        }
    }

    /// Read access to the book for observation and printing.
    pub fn order_book(&self) -> &OrderBook {
        &self.book
    }

    /// Snapshot a resting order by id.
    pub fn get_order(&self, order_id: OrderId) -> Option<Order> {
        self.book.get(order_id).cloned()
    }

    /// Per-side depth snapshot, delegated to the book.
    pub fn side_snapshot(&self, side: OrderSide) -> Vec<(Price, Quantity)> {
        self.book.side_snapshot(side)
    }

    /// Process a limit or market order.
    ///
    /// Matches against the opposite side under price-time priority, skipping
    /// resting orders of the submitting client. A limit remainder is enqueued
    /// at the back of its level under the pre-assigned incoming id; a market
    /// remainder is discarded.
    pub fn process_order(&mut self, request: &OrderRequest) -> MatchResult {
        self.order_counter += 1;
        let incoming_order_id = OrderId(self.order_counter);

        let is_buyer = request.side == OrderSide::Buy;
        let needs_price_check = request.order_type == OrderType::Limit;
        let mut remaining = request.quantity;
        let mut trades = Vec::new();

        let OrderBook {
            bids,
            asks,
            registry,
            ..
        } = &mut self.book;
        let opposite = if is_buyer { asks } else { bids };

        let mut accepted_price = if opposite.is_empty() {
            request.price
        } else {
            Price::ZERO
        };

        while !remaining.is_zero() {
            let best = if is_buyer {
                opposite.keys().next().copied()
            } else {
                opposite.keys().next_back().copied()
            };
            let Some(best_price) = best else { break };
            accepted_price = best_price;

            if needs_price_check {
                let passes = if is_buyer {
                    request.price >= best_price
                } else {
                    request.price <= best_price
                };
                if !passes {
                    break;
                }
            }

            let Some(queue) = opposite.get_mut(&best_price) else {
                break;
            };

            let mut touched = false;
            let mut idx = 0;
            while idx < queue.len() && !remaining.is_zero() {
                if queue[idx].client_id == request.client_id {
                    idx += 1;
                    continue;
                }
                touched = true;

                let trade_quantity = remaining.min(queue[idx].quantity);
                remaining -= trade_quantity;
                queue[idx].quantity -= trade_quantity;

                let resting_order_id = queue[idx].order_id;
                let resting_client_id = queue[idx].client_id;
                let (buyer_id, seller_id, buyer_order_id, seller_order_id) = if is_buyer {
                    (
                        request.client_id,
                        resting_client_id,
                        incoming_order_id,
                        resting_order_id,
                    )
                } else {
                    (
                        resting_client_id,
                        request.client_id,
                        resting_order_id,
                        incoming_order_id,
                    )
                };

                self.trade_counter += 1;
                trades.push(TradeEvent {
                    trade_id: TradeId(self.trade_counter),
                    buyer_order_id,
                    seller_order_id,
                    buyer_id,
                    seller_id,
                    quantity: trade_quantity,
                    price: best_price,
                    timestamp: Timestamp::ZERO,
                    instrument_id: self.instrument_id,
                });

                if queue[idx].quantity.is_zero() {
                    registry.remove(&resting_order_id);
                    queue.remove(idx);
                } else {
                    idx += 1;
                }
            }

            // Entire level self-skipped: no progress is possible.
            if !touched {
                break;
            }
            if queue.is_empty() {
                opposite.remove(&best_price);
            }
        }

        let status = match request.order_type {
            OrderType::Limit => {
                if remaining.is_zero() {
                    OrderStatus::Filled
                } else {
                    let status = if remaining < request.quantity {
                        OrderStatus::PartiallyFilled
                    } else {
                        OrderStatus::New
                    };
                    self.book.insert(Order {
                        order_id: incoming_order_id,
                        client_id: request.client_id,
                        quantity: remaining,
                        price: request.price,
                        timestamp: Timestamp::ZERO,
                        instrument_id: self.instrument_id,
                        side: request.side,
                        order_type: request.order_type,
                        status,
                    });
                    status
                }
            }
            OrderType::Market => {
                if remaining.is_zero() {
                    OrderStatus::Filled
                } else if remaining < request.quantity {
                    OrderStatus::PartiallyFilled
                } else {
                    OrderStatus::Cancelled
                }
            }
        };

        MatchResult {
            order_id: incoming_order_id,
            timestamp: Timestamp::ZERO,
            remaining_quantity: remaining,
            accepted_price,
            status,
            instrument_id: self.instrument_id,
            trades,
        }
    }

    /// Remove a resting order if it exists and the client owns it.
    pub fn cancel_order(&mut self, client_id: ClientId, order_id: OrderId) -> bool {
        match self.book.get(order_id) {
            Some(order) if order.client_id == client_id => self.book.remove(order_id).is_some(),
            _ => false,
        }
    }

    /// Modify a resting order.
    ///
    /// - Unchanged price and quantity: accepted no-op, same id.
    /// - Same price, lower quantity: in-place decrement, FIFO position and id
    ///   preserved, status set to `Modified`.
    /// - Anything else: cancel then resubmit as a fresh limit order through
    ///   the matching path (may execute or rest under a new id).
    pub fn modify_order(
        &mut self,
        client_id: ClientId,
        order_id: OrderId,
        new_quantity: Quantity,
        new_price: Price,
    ) -> ModifyResult {
        let invalid = ModifyResult {
            client_id,
            old_order_id: order_id,
            new_order_id: OrderId(0),
            new_quantity,
            new_price,
            status: ModifyStatus::Invalid,
            instrument_id: self.instrument_id,
            match_result: None,
        };

        let Some(order) = self.book.get(order_id) else {
            return invalid;
        };
        if order.client_id != client_id {
            return invalid;
        }
        let (current_price, current_quantity, side) = (order.price, order.quantity, order.side);

        if new_price == current_price && new_quantity == current_quantity {
            return ModifyResult {
                new_order_id: order_id,
                status: ModifyStatus::Accepted,
                ..invalid
            };
        }

        if new_price == current_price && new_quantity < current_quantity {
            if let Some(order) = self.book.get_mut(order_id) {
                order.quantity = new_quantity;
                order.status = OrderStatus::Modified;
            }
            return ModifyResult {
                new_order_id: order_id,
                status: ModifyStatus::Accepted,
                ..invalid
            };
        }

        if !self.cancel_order(client_id, order_id) {
            return invalid;
        }

        let request = OrderRequest {
            client_id,
            quantity: new_quantity,
            price: new_price,
            instrument_id: self.instrument_id,
            side,
            order_type: OrderType::Limit,
        };
        let match_result = self.process_order(&request);

        ModifyResult {
            client_id,
            old_order_id: order_id,
            new_order_id: match_result.order_id,
            new_quantity,
            new_price,
            status: ModifyStatus::Accepted,
            instrument_id: self.instrument_id,
            match_result: Some(match_result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> MatchingEngine {
        MatchingEngine::new(InstrumentId(1))
    }

    fn limit(client: u64, side: OrderSide, qty: u64, price: u64) -> OrderRequest {
        OrderRequest {
            client_id: ClientId(client),
            quantity: Quantity(qty),
            price: Price(price),
            instrument_id: InstrumentId(1),
            side,
            order_type: OrderType::Limit,
        }
    }

    fn market(client: u64, side: OrderSide, qty: u64) -> OrderRequest {
        OrderRequest {
            client_id: ClientId(client),
            quantity: Quantity(qty),
            price: Price(0),
            instrument_id: InstrumentId(1),
            side,
            order_type: OrderType::Market,
        }
    }

    #[test]
    fn limit_buy_rests_on_empty_book() {
        let mut eng = engine();
        let result = eng.process_order(&limit(1, OrderSide::Buy, 100, 1000));

        assert_eq!(result.status, OrderStatus::New);
        assert_eq!(result.order_id, OrderId(1));
        assert_eq!(result.remaining_quantity, Quantity(100));
        assert_eq!(result.accepted_price, Price(1000));
        assert!(result.trades.is_empty());
        assert_eq!(eng.order_book().best_bid_price(), Some(Price(1000)));
    }

    #[test]
    fn limit_sell_rests_on_empty_book() {
        let mut eng = engine();
        let result = eng.process_order(&limit(1, OrderSide::Sell, 100, 1000));

        assert_eq!(result.status, OrderStatus::New);
        assert_eq!(eng.order_book().best_ask_price(), Some(Price(1000)));
    }

    #[test]
    fn market_order_on_empty_book_is_cancelled() {
        let mut eng = engine();
        let result = eng.process_order(&market(1, OrderSide::Buy, 50));

        assert_eq!(result.status, OrderStatus::Cancelled);
        assert_eq!(result.remaining_quantity, Quantity(50));
        assert!(eng.order_book().is_empty());
    }

    #[test]
    fn buy_fully_matches_resting_sell() {
        let mut eng = engine();
        eng.process_order(&limit(1, OrderSide::Sell, 100, 1000));
        let result = eng.process_order(&limit(2, OrderSide::Buy, 100, 1000));

        assert_eq!(result.status, OrderStatus::Filled);
        assert_eq!(result.remaining_quantity, Quantity(0));
        assert_eq!(result.trades.len(), 1);
        let trade = &result.trades[0];
        assert_eq!(trade.buyer_id, ClientId(2));
        assert_eq!(trade.seller_id, ClientId(1));
        assert_eq!(trade.buyer_order_id, OrderId(2));
        assert_eq!(trade.seller_order_id, OrderId(1));
        assert_eq!(trade.price, Price(1000));
        assert!(eng.order_book().is_empty());
    }

    #[test]
    fn trade_executes_at_resting_price() {
        let mut eng = engine();
        eng.process_order(&limit(1, OrderSide::Sell, 100, 990));
        let result = eng.process_order(&limit(2, OrderSide::Buy, 100, 1000));

        assert_eq!(result.trades[0].price, Price(990));
        assert_eq!(result.accepted_price, Price(990));
    }

    #[test]
    fn partial_fill_enqueues_remainder() {
        let mut eng = engine();
        eng.process_order(&limit(1, OrderSide::Sell, 30, 1000));
        let result = eng.process_order(&limit(2, OrderSide::Buy, 100, 1000));

        assert_eq!(result.status, OrderStatus::PartiallyFilled);
        assert_eq!(result.remaining_quantity, Quantity(70));

        let rest = eng.get_order(result.order_id).unwrap();
        assert_eq!(rest.quantity, Quantity(70));
        assert_eq!(rest.price, Price(1000));
        assert_eq!(rest.side, OrderSide::Buy);
        assert_eq!(rest.status, OrderStatus::PartiallyFilled);
    }

    #[test]
    fn incoming_fills_multiple_resting_orders() {
        let mut eng = engine();
        eng.process_order(&limit(1, OrderSide::Sell, 50, 1000));
        eng.process_order(&limit(2, OrderSide::Sell, 50, 1000));
        let result = eng.process_order(&limit(3, OrderSide::Buy, 100, 1000));

        assert_eq!(result.status, OrderStatus::Filled);
        assert_eq!(result.trades.len(), 2);
        assert_eq!(result.trades[0].seller_id, ClientId(1));
        assert_eq!(result.trades[1].seller_id, ClientId(2));
    }

    #[test]
    fn buy_sweeps_price_levels_best_first() {
        let mut eng = engine();
        eng.process_order(&limit(1, OrderSide::Sell, 30, 1010));
        eng.process_order(&limit(2, OrderSide::Sell, 20, 1000));
        eng.process_order(&limit(3, OrderSide::Sell, 50, 1020));
        let result = eng.process_order(&limit(4, OrderSide::Buy, 60, 1020));

        assert_eq!(result.trades.len(), 3);
        assert_eq!(result.trades[0].price, Price(1000));
        assert_eq!(result.trades[0].quantity, Quantity(20));
        assert_eq!(result.trades[1].price, Price(1010));
        assert_eq!(result.trades[1].quantity, Quantity(30));
        assert_eq!(result.trades[2].price, Price(1020));
        assert_eq!(result.trades[2].quantity, Quantity(10));
    }

    #[test]
    fn sell_matches_best_bid_first() {
        let mut eng = engine();
        eng.process_order(&limit(1, OrderSide::Buy, 30, 990));
        eng.process_order(&limit(2, OrderSide::Buy, 30, 1000));
        let result = eng.process_order(&limit(3, OrderSide::Sell, 40, 990));

        assert_eq!(result.trades.len(), 2);
        assert_eq!(result.trades[0].price, Price(1000));
        assert_eq!(result.trades[0].quantity, Quantity(30));
        assert_eq!(result.trades[1].price, Price(990));
        assert_eq!(result.trades[1].quantity, Quantity(10));
    }

    #[test]
    fn same_price_level_matches_fifo() {
        let mut eng = engine();
        eng.process_order(&limit(1, OrderSide::Sell, 30, 1000));
        eng.process_order(&limit(2, OrderSide::Sell, 30, 1000));
        let result = eng.process_order(&limit(3, OrderSide::Buy, 40, 1000));

        assert_eq!(result.trades[0].seller_id, ClientId(1));
        assert_eq!(result.trades[0].quantity, Quantity(30));
        assert_eq!(result.trades[1].seller_id, ClientId(2));
        assert_eq!(result.trades[1].quantity, Quantity(10));
    }

    #[test]
    fn self_trade_prevented_at_top_of_book() {
        let mut eng = engine();
        eng.process_order(&limit(1, OrderSide::Sell, 100, 1000));
        let result = eng.process_order(&limit(1, OrderSide::Buy, 100, 1000));

        // Entire level belongs to the same client: the aggressor rests as NEW.
        assert_eq!(result.status, OrderStatus::New);
        assert_eq!(result.remaining_quantity, Quantity(100));
        assert!(result.trades.is_empty());
        assert_eq!(eng.order_book().order_count(), 2);
    }

    #[test]
    fn self_trade_skips_to_next_order_in_level() {
        let mut eng = engine();
        eng.process_order(&limit(1, OrderSide::Sell, 50, 1000));
        eng.process_order(&limit(2, OrderSide::Sell, 50, 1000));
        let result = eng.process_order(&limit(1, OrderSide::Buy, 50, 1000));

        assert_eq!(result.status, OrderStatus::Filled);
        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades[0].seller_id, ClientId(2));

        // Client 1's own ask is untouched.
        let own = eng.get_order(OrderId(1)).unwrap();
        assert_eq!(own.quantity, Quantity(50));
    }

    #[test]
    fn market_buy_fills_and_leaves_no_trace() {
        let mut eng = engine();
        eng.process_order(&limit(1, OrderSide::Sell, 100, 1000));
        let result = eng.process_order(&market(2, OrderSide::Buy, 100));

        assert_eq!(result.status, OrderStatus::Filled);
        assert!(eng.order_book().is_empty());
    }

    #[test]
    fn market_order_partial_fill_discards_remainder() {
        let mut eng = engine();
        eng.process_order(&limit(1, OrderSide::Sell, 30, 1000));
        let result = eng.process_order(&market(2, OrderSide::Buy, 100));

        assert_eq!(result.status, OrderStatus::PartiallyFilled);
        assert_eq!(result.remaining_quantity, Quantity(70));
        assert!(eng.order_book().is_empty());
        assert!(eng.get_order(result.order_id).is_none());
    }

    #[test]
    fn market_order_sweeps_levels_without_price_check() {
        let mut eng = engine();
        eng.process_order(&limit(1, OrderSide::Sell, 30, 1000));
        eng.process_order(&limit(2, OrderSide::Sell, 30, 2000));
        let result = eng.process_order(&market(3, OrderSide::Buy, 60));

        assert_eq!(result.status, OrderStatus::Filled);
        assert_eq!(result.trades.len(), 2);
        assert_eq!(result.trades[1].price, Price(2000));
    }

    #[test]
    fn limit_buy_does_not_cross_higher_ask() {
        let mut eng = engine();
        eng.process_order(&limit(1, OrderSide::Sell, 100, 1010));
        let result = eng.process_order(&limit(2, OrderSide::Buy, 100, 1000));

        assert_eq!(result.status, OrderStatus::New);
        assert!(result.trades.is_empty());
        assert_eq!(result.accepted_price, Price(1010));
        assert_eq!(eng.order_book().order_count(), 2);
    }

    #[test]
    fn limit_sell_does_not_cross_lower_bid() {
        let mut eng = engine();
        eng.process_order(&limit(1, OrderSide::Buy, 100, 990));
        let result = eng.process_order(&limit(2, OrderSide::Sell, 100, 1000));

        assert_eq!(result.status, OrderStatus::New);
        assert!(result.trades.is_empty());
    }

    #[test]
    fn order_ids_strictly_increase() {
        let mut eng = engine();
        let a = eng.process_order(&limit(1, OrderSide::Buy, 10, 990));
        let b = eng.process_order(&limit(2, OrderSide::Buy, 10, 991));
        let c = eng.process_order(&limit(3, OrderSide::Sell, 10, 1010));
        assert!(a.order_id < b.order_id && b.order_id < c.order_id);
    }

    #[test]
    fn trade_ids_strictly_increase() {
        let mut eng = engine();
        eng.process_order(&limit(1, OrderSide::Sell, 100, 1000));
        eng.process_order(&limit(2, OrderSide::Sell, 100, 1010));
        let result = eng.process_order(&limit(3, OrderSide::Buy, 150, 1010));

        assert_eq!(result.trades[0].trade_id, TradeId(1));
        assert_eq!(result.trades[1].trade_id, TradeId(2));
    }

    #[test]
    fn get_order_after_full_fill_returns_none() {
        let mut eng = engine();
        let sell = eng.process_order(&limit(1, OrderSide::Sell, 100, 1000));
        eng.process_order(&limit(2, OrderSide::Buy, 100, 1000));
        assert!(eng.get_order(sell.order_id).is_none());
    }

    #[test]
    fn cancel_existing_order() {
        let mut eng = engine();
        let result = eng.process_order(&limit(1, OrderSide::Buy, 100, 1000));

        assert!(eng.cancel_order(ClientId(1), result.order_id));
        assert!(eng.get_order(result.order_id).is_none());
        assert!(eng.order_book().is_empty());
    }

    #[test]
    fn cancel_then_cancel_again_is_false() {
        let mut eng = engine();
        let result = eng.process_order(&limit(1, OrderSide::Sell, 100, 1000));

        assert!(eng.cancel_order(ClientId(1), result.order_id));
        assert!(!eng.cancel_order(ClientId(1), result.order_id));
    }

    #[test]
    fn cancel_unknown_order_is_false() {
        let mut eng = engine();
        assert!(!eng.cancel_order(ClientId(1), OrderId(999)));
    }

    #[test]
    fn cancel_with_wrong_client_is_false() {
        let mut eng = engine();
        let result = eng.process_order(&limit(1, OrderSide::Buy, 100, 1000));

        assert!(!eng.cancel_order(ClientId(2), result.order_id));
        assert!(eng.get_order(result.order_id).is_some());
    }

    #[test]
    fn modify_noop_keeps_everything() {
        let mut eng = engine();
        let placed = eng.process_order(&limit(1, OrderSide::Buy, 100, 1000));
        let result = eng.modify_order(ClientId(1), placed.order_id, Quantity(100), Price(1000));

        assert_eq!(result.status, ModifyStatus::Accepted);
        assert_eq!(result.new_order_id, placed.order_id);
        assert!(result.match_result.is_none());
        let order = eng.get_order(placed.order_id).unwrap();
        assert_eq!(order.quantity, Quantity(100));
        assert_eq!(order.status, OrderStatus::New);
    }

    #[test]
    fn modify_quantity_down_preserves_fifo_position() {
        let mut eng = engine();
        let first = eng.process_order(&limit(1, OrderSide::Buy, 100, 1000));
        eng.process_order(&limit(2, OrderSide::Buy, 100, 1000));

        let result = eng.modify_order(ClientId(1), first.order_id, Quantity(50), Price(1000));
        assert_eq!(result.status, ModifyStatus::Accepted);
        assert_eq!(result.new_order_id, first.order_id);
        assert!(result.match_result.is_none());

        let order = eng.get_order(first.order_id).unwrap();
        assert_eq!(order.quantity, Quantity(50));
        assert_eq!(order.status, OrderStatus::Modified);

        // Still first in line: a crossing sell hits client 1 first.
        let hit = eng.process_order(&limit(3, OrderSide::Sell, 50, 1000));
        assert_eq!(hit.trades[0].buyer_id, ClientId(1));
    }

    #[test]
    fn modify_price_change_assigns_new_id_and_demotes_priority() {
        let mut eng = engine();
        let placed = eng.process_order(&limit(1, OrderSide::Buy, 50, 1000));
        let result = eng.modify_order(ClientId(1), placed.order_id, Quantity(50), Price(1001));

        assert_eq!(result.status, ModifyStatus::Accepted);
        assert_ne!(result.new_order_id, placed.order_id);
        assert!(eng.get_order(placed.order_id).is_none());

        let moved = eng.get_order(result.new_order_id).unwrap();
        assert_eq!(moved.price, Price(1001));
        assert_eq!(moved.quantity, Quantity(50));
    }

    #[test]
    fn modify_quantity_up_assigns_new_id() {
        let mut eng = engine();
        let placed = eng.process_order(&limit(1, OrderSide::Buy, 50, 1000));
        let result = eng.modify_order(ClientId(1), placed.order_id, Quantity(80), Price(1000));

        assert_eq!(result.status, ModifyStatus::Accepted);
        assert_ne!(result.new_order_id, placed.order_id);
        let moved = eng.get_order(result.new_order_id).unwrap();
        assert_eq!(moved.quantity, Quantity(80));
    }

    #[test]
    fn modify_can_trigger_match() {
        let mut eng = engine();
        eng.process_order(&limit(2, OrderSide::Sell, 50, 1010));
        let placed = eng.process_order(&limit(1, OrderSide::Buy, 50, 1000));

        let result = eng.modify_order(ClientId(1), placed.order_id, Quantity(50), Price(1010));
        assert_eq!(result.status, ModifyStatus::Accepted);
        let inner = result.match_result.unwrap();
        assert_eq!(inner.trades.len(), 1);
        assert_eq!(inner.trades[0].price, Price(1010));
        assert!(eng.order_book().is_empty());
    }

    #[test]
    fn modify_unknown_order_is_invalid() {
        let mut eng = engine();
        let result = eng.modify_order(ClientId(1), OrderId(42), Quantity(10), Price(1000));
        assert_eq!(result.status, ModifyStatus::Invalid);
        assert_eq!(result.new_order_id, OrderId(0));
    }

    #[test]
    fn modify_with_wrong_client_is_invalid() {
        let mut eng = engine();
        let placed = eng.process_order(&limit(1, OrderSide::Buy, 100, 1000));
        let result = eng.modify_order(ClientId(2), placed.order_id, Quantity(50), Price(1000));

        assert_eq!(result.status, ModifyStatus::Invalid);
        let order = eng.get_order(placed.order_id).unwrap();
        assert_eq!(order.quantity, Quantity(100));
    }

    #[test]
    fn registry_consistent_after_mixed_operations() {
        let mut eng = engine();
        let a = eng.process_order(&limit(1, OrderSide::Buy, 100, 990));
        let b = eng.process_order(&limit(2, OrderSide::Buy, 50, 1000));
        eng.process_order(&limit(3, OrderSide::Sell, 60, 1000));

        // The sell consumes b at the better price, stops short of the 990
        // level, and its remainder rests as an ask.
        assert!(eng.get_order(b.order_id).is_none());
        let a_order = eng.get_order(a.order_id).unwrap();
        assert_eq!(a_order.quantity, Quantity(100));

        assert!(eng.cancel_order(ClientId(1), a.order_id));
        assert_eq!(eng.order_book().order_count(), 1);
        assert_eq!(eng.order_book().best_ask_price(), Some(Price(1000)));
    }
}
