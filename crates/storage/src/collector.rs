//! The persistence observer: turns driver events into CSV rows.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use simulation::{PnL, SimulationHook};
use types::{
    ClientId, DeltaType, InstrumentId, Order, OrderAccepted, OrderCancelled, OrderId,
    OrderModified, OrderSide, Price, Quantity, SequenceNumber, Timestamp, Trade, TradeId,
};

use crate::csv_writer::CsvWriter;
use crate::metadata::MetadataWriter;
use crate::records::{MarketStateRecord, OrderDelta, PnLSnapshot, TradeRecord};
use crate::PersistenceError;

/// Writes the delta/trade/pnl/market-state streams and finalizes metadata.
///
/// Row-level I/O failures are stashed rather than panicking mid-run; they
/// surface through [`DataCollector::take_error`] after the run. Partial CSV
/// output survives by design.
pub struct DataCollector {
    csv: CsvWriter,
    metadata: MetadataWriter,
    output_dir: PathBuf,
    sequence: SequenceNumber,
    pnl_snapshot_interval: Timestamp,
    last_pnl_snapshot: Timestamp,
    error: Option<io::Error>,
}

impl DataCollector {
    /// Open the output files in `output_dir`.
    pub fn new(
        output_dir: &Path,
        pnl_snapshot_interval: Timestamp,
    ) -> Result<Self, PersistenceError> {
        Ok(Self {
            csv: CsvWriter::new(output_dir)?,
            metadata: MetadataWriter::new(),
            output_dir: output_dir.to_path_buf(),
            sequence: SequenceNumber(0),
            pnl_snapshot_interval,
            last_pnl_snapshot: Timestamp::ZERO,
            error: None,
        })
    }

    /// The metadata accumulator, populated during setup.
    pub fn metadata_mut(&mut self) -> &mut MetadataWriter {
        &mut self.metadata
    }

    /// First stashed I/O error, if any row or the finalize failed.
    pub fn take_error(&mut self) -> Option<PersistenceError> {
        self.error.take().map(PersistenceError::from)
    }

    fn next_sequence(&mut self) -> SequenceNumber {
        let sequence = self.sequence;
        self.sequence += SequenceNumber(1);
        sequence
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(error) = result
            && self.error.is_none()
        {
            self.error = Some(error);
        }
    }
}

impl SimulationHook for DataCollector {
    fn on_order_accepted(&mut self, event: &OrderAccepted, resting: Option<&Order>) {
        // Only orders that left a remainder on the book produce an ADD row.
        let Some(order) = resting else { return };
        let delta = OrderDelta {
            timestamp: event.timestamp,
            sequence_num: self.next_sequence(),
            delta_type: DeltaType::Add,
            order_id: event.order_id,
            client_id: event.agent_id,
            instrument_id: event.instrument_id,
            side: order.side,
            price: order.price,
            quantity: order.quantity,
            remaining_qty: order.quantity,
            trade_id: TradeId(0),
            new_order_id: OrderId(0),
            new_price: Price(0),
            new_quantity: Quantity(0),
        };
        let result = self.csv.write_delta(&delta);
        self.record(result);
    }

    fn on_trade(&mut self, trade: &Trade, fair_price: Price) {
        let record = TradeRecord {
            timestamp: trade.timestamp,
            trade_id: trade.trade_id,
            instrument_id: trade.instrument_id,
            buyer_id: trade.buyer_id,
            seller_id: trade.seller_id,
            buyer_order_id: trade.buyer_order_id,
            seller_order_id: trade.seller_order_id,
            price: trade.price,
            quantity: trade.quantity,
            aggressor_side: trade.aggressor_side,
            fair_price,
        };
        let result = self.csv.write_trade(&record);
        self.record(result);
    }

    fn on_fill(
        &mut self,
        trade: &Trade,
        order_id: OrderId,
        client_id: ClientId,
        remaining: Quantity,
        side: OrderSide,
    ) {
        let delta = OrderDelta {
            timestamp: trade.timestamp,
            sequence_num: self.next_sequence(),
            delta_type: DeltaType::Fill,
            order_id,
            client_id,
            instrument_id: trade.instrument_id,
            side,
            price: trade.price,
            quantity: trade.quantity,
            remaining_qty: remaining,
            trade_id: trade.trade_id,
            new_order_id: OrderId(0),
            new_price: Price(0),
            new_quantity: Quantity(0),
        };
        let result = self.csv.write_delta(&delta);
        self.record(result);
    }

    fn on_order_cancelled(&mut self, event: &OrderCancelled, order: &Order) {
        let delta = OrderDelta {
            timestamp: event.timestamp,
            sequence_num: self.next_sequence(),
            delta_type: DeltaType::Cancel,
            order_id: event.order_id,
            client_id: event.agent_id,
            instrument_id: order.instrument_id,
            side: order.side,
            price: order.price,
            quantity: order.quantity,
            remaining_qty: event.remaining_quantity,
            trade_id: TradeId(0),
            new_order_id: OrderId(0),
            new_price: Price(0),
            new_quantity: Quantity(0),
        };
        let result = self.csv.write_delta(&delta);
        self.record(result);
    }

    fn on_order_modified(
        &mut self,
        event: &OrderModified,
        instrument_id: InstrumentId,
        side: OrderSide,
    ) {
        let delta = OrderDelta {
            timestamp: event.timestamp,
            sequence_num: self.next_sequence(),
            delta_type: DeltaType::Modify,
            order_id: event.old_order_id,
            client_id: event.agent_id,
            instrument_id,
            side,
            price: event.old_price,
            quantity: event.old_quantity,
            remaining_qty: event.new_quantity,
            trade_id: TradeId(0),
            new_order_id: event.new_order_id,
            new_price: event.new_price,
            new_quantity: event.new_quantity,
        };
        let result = self.csv.write_delta(&delta);
        self.record(result);
    }

    fn on_market_state(
        &mut self,
        timestamp: Timestamp,
        fair_price: Price,
        best_bid: Option<Price>,
        best_ask: Option<Price>,
    ) {
        let record = MarketStateRecord {
            timestamp,
            fair_price,
            best_bid: best_bid.unwrap_or(Price::ZERO),
            best_ask: best_ask.unwrap_or(Price::ZERO),
        };
        let result = self.csv.write_market_state(&record);
        self.record(result);
    }

    fn on_step(&mut self, now: Timestamp, pnl: &BTreeMap<ClientId, PnL>, fair_price: Price) {
        if now < self.last_pnl_snapshot + self.pnl_snapshot_interval {
            return;
        }
        self.last_pnl_snapshot = now;

        for (&client_id, entry) in pnl {
            let snapshot = PnLSnapshot {
                timestamp: now,
                client_id,
                long_position: entry.long_position,
                short_position: entry.short_position,
                cash: entry.cash,
                fair_price,
            };
            let result = self.csv.write_pnl(&snapshot);
            self.record(result);
        }
    }

    fn on_simulation_end(&mut self, duration: Timestamp) {
        self.metadata.set_duration(duration);
        let result = self.metadata.write(&self.output_dir);
        self.record(result);
        let result = self.csv.flush();
        self.record(result);
    }
}
