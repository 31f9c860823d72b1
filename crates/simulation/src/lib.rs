//! Simulation core: scheduler, fair-price processes, P&L, and the driver.
//!
//! The [`SimulationEngine`] wires everything together: it owns one matching
//! engine per instrument, the agent roster, the event scheduler, and the
//! fair-price source, and exposes the [`agents::AgentContext`] capability
//! set to agent callbacks. Observers register through [`SimulationHook`] to
//! receive the event stream for persistence.

pub mod engine;
pub mod fair_price;
pub mod hooks;
pub mod pnl;
pub mod scheduler;

pub use engine::SimulationEngine;
pub use fair_price::{
    DummyFairPriceSource, FairPriceModelConfig, FairPriceSource, GbmConfig, GbmFairPrice,
    JumpDiffusionConfig, JumpDiffusionFairPrice,
};
pub use hooks::{SharedHook, SimulationHook};
pub use pnl::PnL;
pub use scheduler::{ScheduledEvent, Scheduler};
