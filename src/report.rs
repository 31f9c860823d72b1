//! End-of-run console reports: book depth and the P&L table.

use simulation::SimulationEngine;
use types::{InstrumentId, OrderSide, Price};

/// Print both sides of an instrument's book, best levels first.
pub fn print_book(sim: &SimulationEngine, instrument_id: InstrumentId, depth: usize) {
    let Some(engine) = sim.engine(instrument_id) else {
        println!("No order book found for instrument {instrument_id}");
        return;
    };
    let bids = engine.side_snapshot(OrderSide::Buy);
    let asks = engine.side_snapshot(OrderSide::Sell);

    println!("=============== ORDER BOOK ===============");
    println!("   BID (Qty @ Price) |   ASK (Qty @ Price)");
    println!("---------------------+---------------------");
    for level in 0..depth {
        let bid = bids
            .get(level)
            .map(|(price, qty)| format!("{qty} @ {price}"))
            .unwrap_or_default();
        let ask = asks
            .get(level)
            .map(|(price, qty)| format!("{qty} @ {price}"))
            .unwrap_or_default();
        if bid.is_empty() && ask.is_empty() {
            break;
        }
        println!("{bid:>20} | {ask}");
    }
}

/// Print every participant's position, cash, and total P&L at the mark.
pub fn print_pnl(sim: &SimulationEngine, mark_price: Price) {
    println!("=============== P&L REPORT ================");
    println!(
        "{:>10} {:>10} {:>12} {:>12}",
        "Client", "Position", "Cash", "Total P&L"
    );
    println!("-------------------------------------------");
    for (client_id, pnl) in sim.all_pnl() {
        println!(
            "{:>10} {:>10} {:>12} {:>12}",
            client_id.raw(),
            pnl.net_position(),
            pnl.cash.raw(),
            pnl.total_pnl(mark_price).raw()
        );
    }
}
