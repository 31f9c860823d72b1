//! Row formats for the CSV output files.

use types::{
    Cash, ClientId, DeltaType, InstrumentId, OrderId, OrderSide, Price, Quantity, SequenceNumber,
    Timestamp, TradeId,
};

/// One row of deltas.csv: a single change to an order book.
///
/// The trailing fields apply only to some delta types and are written as 0
/// when inapplicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderDelta {
    pub timestamp: Timestamp,
    pub sequence_num: SequenceNumber,
    pub delta_type: DeltaType,
    pub order_id: OrderId,
    pub client_id: ClientId,
    pub instrument_id: InstrumentId,
    pub side: OrderSide,
    pub price: Price,
    pub quantity: Quantity,
    pub remaining_qty: Quantity,
    /// FILL rows only.
    pub trade_id: TradeId,
    /// MODIFY rows only.
    pub new_order_id: OrderId,
    /// MODIFY rows only.
    pub new_price: Price,
    /// MODIFY rows only.
    pub new_quantity: Quantity,
}

/// One row of trades.csv.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeRecord {
    pub timestamp: Timestamp,
    pub trade_id: TradeId,
    pub instrument_id: InstrumentId,
    pub buyer_id: ClientId,
    pub seller_id: ClientId,
    pub buyer_order_id: OrderId,
    pub seller_order_id: OrderId,
    pub price: Price,
    pub quantity: Quantity,
    pub aggressor_side: OrderSide,
    pub fair_price: Price,
}

/// One row of pnl.csv.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PnLSnapshot {
    pub timestamp: Timestamp,
    pub client_id: ClientId,
    pub long_position: Quantity,
    pub short_position: Quantity,
    pub cash: Cash,
    pub fair_price: Price,
}

/// One row of market_state.csv; prices are 0 when a side is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketStateRecord {
    pub timestamp: Timestamp,
    pub fair_price: Price,
    pub best_bid: Price,
    pub best_ask: Price,
}
