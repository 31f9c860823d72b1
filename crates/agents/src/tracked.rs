//! Order bookkeeping shared by the trading strategies.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use types::{OrderId, OrderSide, Price, Quantity};

/// A resting order tracked by its owner for stale-order detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedOrder {
    pub order_id: OrderId,
    pub price: Price,
    pub side: OrderSide,
    pub remaining_quantity: Quantity,
}

/// A submission awaiting its acceptance confirmation.
///
/// Acceptances arrive in submission order, so a FIFO of these pairs each
/// `OrderAccepted` with the parameters it was sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingOrder {
    pub price: Price,
    pub side: OrderSide,
    pub quantity: Quantity,
}

/// Stale / adverse-fill predicate.
///
/// A BUY is adverse when bidding more than `adverse_threshold` above fair,
/// stale when bidding more than `stale_threshold` below fair; mirrored for
/// SELL. A zero threshold disables its half of the check.
pub(crate) fn is_order_stale(
    order: &TrackedOrder,
    fair: Price,
    adverse_threshold: Price,
    stale_threshold: Price,
) -> bool {
    match order.side {
        OrderSide::Buy => {
            if !adverse_threshold.is_zero() && order.price > fair + adverse_threshold {
                return true;
            }
            !stale_threshold.is_zero() && order.price + stale_threshold < fair
        }
        OrderSide::Sell => {
            if !adverse_threshold.is_zero() && order.price + adverse_threshold < fair {
                return true;
            }
            !stale_threshold.is_zero() && order.price > fair + stale_threshold
        }
    }
}

/// Observe the fair price through Gaussian noise, clamped to at least 1.
pub(crate) fn observe_price<R: Rng>(rng: &mut R, true_price: Price, noise: f64) -> Price {
    if noise <= 0.0 {
        return true_price;
    }
    // Normal::new only fails on a non-finite or negative sigma.
    let Ok(dist) = Normal::new(0.0, noise) else {
        return true_price;
    };
    let noisy = true_price.raw() as f64 + dist.sample(rng);
    Price(noisy.round().max(1.0) as u64)
}

/// Decrement a tracked order on a fill; drop it when fully filled.
pub(crate) fn apply_fill(orders: &mut Vec<TrackedOrder>, order_id: OrderId, quantity: Quantity) {
    if let Some(pos) = orders.iter().position(|o| o.order_id == order_id) {
        if quantity >= orders[pos].remaining_quantity {
            orders.remove(pos);
        } else {
            orders[pos].remaining_quantity -= quantity;
        }
    }
}
