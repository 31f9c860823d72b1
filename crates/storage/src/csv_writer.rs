//! Buffered writers for the four CSV output files.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::records::{MarketStateRecord, OrderDelta, PnLSnapshot, TradeRecord};

/// Owns deltas.csv, trades.csv, pnl.csv, and market_state.csv with their
/// headers written at creation.
pub struct CsvWriter {
    deltas: BufWriter<File>,
    trades: BufWriter<File>,
    pnl: BufWriter<File>,
    market_state: BufWriter<File>,
}

impl CsvWriter {
    /// Create the output directory and the four files, writing headers.
    pub fn new(output_dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(output_dir)?;
        let mut writer = Self {
            deltas: BufWriter::new(File::create(output_dir.join("deltas.csv"))?),
            trades: BufWriter::new(File::create(output_dir.join("trades.csv"))?),
            pnl: BufWriter::new(File::create(output_dir.join("pnl.csv"))?),
            market_state: BufWriter::new(File::create(output_dir.join("market_state.csv"))?),
        };
        writer.write_headers()?;
        Ok(writer)
    }

    fn write_headers(&mut self) -> io::Result<()> {
        writeln!(
            self.deltas,
            "timestamp,sequence_num,delta_type,order_id,client_id,instrument_id,\
             side,price,quantity,remaining_qty,trade_id,new_order_id,new_price,new_quantity"
        )?;
        writeln!(
            self.trades,
            "timestamp,trade_id,instrument_id,buyer_id,seller_id,\
             buyer_order_id,seller_order_id,price,quantity,aggressor_side,fair_price"
        )?;
        writeln!(
            self.pnl,
            "timestamp,client_id,long_position,short_position,cash,fair_price"
        )?;
        writeln!(self.market_state, "timestamp,fair_price,best_bid,best_ask")?;
        Ok(())
    }

    pub fn write_delta(&mut self, d: &OrderDelta) -> io::Result<()> {
        writeln!(
            self.deltas,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            d.timestamp.raw(),
            d.sequence_num.raw(),
            d.delta_type.as_str(),
            d.order_id.raw(),
            d.client_id.raw(),
            d.instrument_id.raw(),
            d.side.as_str(),
            d.price.raw(),
            d.quantity.raw(),
            d.remaining_qty.raw(),
            d.trade_id.raw(),
            d.new_order_id.raw(),
            d.new_price.raw(),
            d.new_quantity.raw(),
        )
    }

    pub fn write_trade(&mut self, t: &TradeRecord) -> io::Result<()> {
        writeln!(
            self.trades,
            "{},{},{},{},{},{},{},{},{},{},{}",
            t.timestamp.raw(),
            t.trade_id.raw(),
            t.instrument_id.raw(),
            t.buyer_id.raw(),
            t.seller_id.raw(),
            t.buyer_order_id.raw(),
            t.seller_order_id.raw(),
            t.price.raw(),
            t.quantity.raw(),
            t.aggressor_side.as_str(),
            t.fair_price.raw(),
        )
    }

    pub fn write_pnl(&mut self, p: &PnLSnapshot) -> io::Result<()> {
        writeln!(
            self.pnl,
            "{},{},{},{},{},{}",
            p.timestamp.raw(),
            p.client_id.raw(),
            p.long_position.raw(),
            p.short_position.raw(),
            p.cash.raw(),
            p.fair_price.raw(),
        )
    }

    pub fn write_market_state(&mut self, m: &MarketStateRecord) -> io::Result<()> {
        writeln!(
            self.market_state,
            "{},{},{},{}",
            m.timestamp.raw(),
            m.fair_price.raw(),
            m.best_bid.raw(),
            m.best_ask.raw(),
        )
    }

    /// Flush all four files.
    pub fn flush(&mut self) -> io::Result<()> {
        self.deltas.flush()?;
        self.trades.flush()?;
        self.pnl.flush()?;
        self.market_state.flush()
    }
}
