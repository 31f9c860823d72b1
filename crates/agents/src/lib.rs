//! Trading agents for the exchange simulator.
//!
//! Defines the [`Agent`] and [`AgentContext`] traits plus the three
//! behavioral strategies: a noise trader, a market maker, and an informed
//! trader. Each agent owns a private seeded RNG so runs are reproducible.

pub mod informed_trader;
pub mod market_maker;
pub mod noise_trader;
pub mod tracked;
pub mod traits;

#[cfg(test)]
mod testing;

pub use informed_trader::{InformedTrader, InformedTraderConfig};
pub use market_maker::{MarketMaker, MarketMakerConfig};
pub use noise_trader::{NoiseTrader, NoiseTraderConfig};
pub use tracked::{PendingOrder, TrackedOrder};
pub use traits::{Agent, AgentContext};
