//! Per-participant profit and loss.

use serde::{Deserialize, Serialize};
use types::{Cash, Price, Quantity};

/// Running position and cash of one participant.
///
/// Created lazily on first trade participation. The system is closed: summed
/// over all participants, cash and net position are both zero at every
/// observable point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PnL {
    /// Total quantity bought.
    pub long_position: Quantity,
    /// Total quantity sold.
    pub short_position: Quantity,
    /// Positive = received, negative = spent.
    pub cash: Cash,
}

impl PnL {
    /// Net position: long minus short, signed.
    pub fn net_position(&self) -> i64 {
        self.long_position.raw() as i64 - self.short_position.raw() as i64
    }

    /// Value of the net position at the mark price.
    pub fn unrealized_pnl(&self, mark_price: Price) -> Cash {
        Cash(self.net_position() * mark_price.raw() as i64)
    }

    /// Cash plus unrealized value.
    pub fn total_pnl(&self, mark_price: Price) -> Cash {
        self.cash + self.unrealized_pnl(mark_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_pnl_is_flat() {
        let pnl = PnL::default();
        assert_eq!(pnl.net_position(), 0);
        assert_eq!(pnl.unrealized_pnl(Price(1000)), Cash::ZERO);
        assert_eq!(pnl.total_pnl(Price(1000)), Cash::ZERO);
    }

    #[test]
    fn long_position_marks_to_market() {
        let pnl = PnL {
            long_position: Quantity(100),
            short_position: Quantity::ZERO,
            cash: Cash(-100_000),
        };
        assert_eq!(pnl.net_position(), 100);
        assert_eq!(pnl.unrealized_pnl(Price(1010)), Cash(101_000));
        assert_eq!(pnl.total_pnl(Price(1010)), Cash(1_000));
    }

    #[test]
    fn short_position_is_negative_net() {
        let pnl = PnL {
            long_position: Quantity::ZERO,
            short_position: Quantity(50),
            cash: Cash(50_000),
        };
        assert_eq!(pnl.net_position(), -50);
        assert_eq!(pnl.unrealized_pnl(Price(990)), Cash(-49_500));
        assert_eq!(pnl.total_pnl(Price(990)), Cash(500));
    }

    #[test]
    fn flat_after_round_trip() {
        let pnl = PnL {
            long_position: Quantity(100),
            short_position: Quantity(100),
            cash: Cash(2_000),
        };
        assert_eq!(pnl.net_position(), 0);
        assert_eq!(pnl.total_pnl(Price(12_345)), Cash(2_000));
    }
}
