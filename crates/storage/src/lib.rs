//! Persistence for simulation output.
//!
//! [`DataCollector`] implements the driver's hook interface and streams
//! order-book deltas, trades, P&L snapshots, and market state to CSV files,
//! plus a metadata.json describing the resolved configuration.

pub mod collector;
pub mod csv_writer;
pub mod metadata;
pub mod records;

use std::io;

use thiserror::Error;

pub use collector::DataCollector;
pub use csv_writer::CsvWriter;
pub use metadata::MetadataWriter;
pub use records::{MarketStateRecord, OrderDelta, PnLSnapshot, TradeRecord};

/// Failure to create or write the output files.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("output I/O failed: {0}")]
    Io(#[from] io::Error),
}
