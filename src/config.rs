//! JSON configuration loading and validation.
//!
//! The raw file is deserialized leniently with serde, then validated into
//! strongly-typed configuration. Model/parameter mismatches (jump parameters
//! under GBM, missing jump parameters under jump diffusion) are hard errors,
//! as is an unknown agent type.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use agents::{InformedTraderConfig, MarketMakerConfig, NoiseTraderConfig};
use serde::Deserialize;
use simulation::{FairPriceModelConfig, GbmConfig, JumpDiffusionConfig};
use thiserror::Error;
use types::{ClientId, InstrumentId, OrderSide, Price, Quantity, Timestamp};

/// Configuration failure: unreadable file, bad JSON, or invalid values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// `simulation` section with its defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationSection {
    pub latency: u64,
    pub duration: u64,
    pub output_dir: PathBuf,
    pub pnl_snapshot_interval: u64,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            latency: 0,
            duration: 1_000,
            output_dir: PathBuf::from("./output"),
            pnl_snapshot_interval: 100,
        }
    }
}

fn default_model() -> String {
    "gbm".to_string()
}

#[derive(Debug, Clone, Deserialize)]
struct RawFairPrice {
    #[serde(default = "default_model")]
    model: String,
    initial_price: u64,
    drift: f64,
    volatility: f64,
    tick_size: u64,
    jump_intensity: Option<f64>,
    jump_mean: Option<f64>,
    jump_std: Option<f64>,
    #[serde(default)]
    seed: u64,
}

/// Bulk noise-trader spawn: sequential ids, staggered wakeups, derived seeds.
#[derive(Debug, Clone, Deserialize)]
pub struct NoiseTraderGroupConfig {
    pub count: u64,
    pub start_client_id: u64,
    pub base_seed: u64,
    pub initial_wakeup_start: u64,
    pub initial_wakeup_step: u64,
    pub config: NoiseTraderConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct RawAgentEntry {
    client_id: u64,
    #[serde(rename = "type")]
    agent_type: String,
    seed: u64,
    initial_wakeup: u64,
    #[serde(default)]
    latency: u64,
    config: serde_json::Value,
}

/// Strategy selection plus its typed parameters.
#[derive(Debug, Clone)]
pub enum AgentSpec {
    NoiseTrader(NoiseTraderConfig),
    MarketMaker(MarketMakerConfig),
    InformedTrader(InformedTraderConfig),
}

impl AgentSpec {
    /// The `type` string this spec was declared with.
    pub fn type_name(&self) -> &'static str {
        match self {
            AgentSpec::NoiseTrader(_) => "NoiseTrader",
            AgentSpec::MarketMaker(_) => "MarketMaker",
            AgentSpec::InformedTrader(_) => "InformedTrader",
        }
    }

    /// The agent's latency-jitter sigma.
    pub fn latency_jitter(&self) -> f64 {
        match self {
            AgentSpec::NoiseTrader(config) => config.latency_jitter,
            AgentSpec::MarketMaker(config) => config.latency_jitter,
            AgentSpec::InformedTrader(config) => config.latency_jitter,
        }
    }

    /// The typed config as JSON, for metadata.
    pub fn to_json(&self) -> serde_json::Value {
        let result = match self {
            AgentSpec::NoiseTrader(config) => serde_json::to_value(config),
            AgentSpec::MarketMaker(config) => serde_json::to_value(config),
            AgentSpec::InformedTrader(config) => serde_json::to_value(config),
        };
        result.unwrap_or(serde_json::Value::Null)
    }
}

/// One configured agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub client_id: ClientId,
    pub seed: u64,
    pub initial_wakeup: Timestamp,
    /// Zero means the global default applies.
    pub latency: Timestamp,
    pub spec: AgentSpec,
}

/// An order seeding the book at timestamp zero.
#[derive(Debug, Clone, Deserialize)]
pub struct InitialOrder {
    pub instrument: InstrumentId,
    pub side: OrderSide,
    pub price: Price,
    pub quantity: Quantity,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    simulation: SimulationSection,
    #[serde(default)]
    instruments: Vec<u32>,
    fair_price: Option<RawFairPrice>,
    noise_traders: Option<NoiseTraderGroupConfig>,
    #[serde(default)]
    agents: Vec<RawAgentEntry>,
    #[serde(default)]
    initial_orders: Vec<InitialOrder>,
}

/// Fully validated run configuration.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub latency: Timestamp,
    pub duration: Timestamp,
    pub output_dir: PathBuf,
    pub pnl_snapshot_interval: Timestamp,
    pub instruments: Vec<InstrumentId>,
    /// Model plus its seed.
    pub fair_price: Option<(FairPriceModelConfig, u64)>,
    pub noise_traders: Option<NoiseTraderGroupConfig>,
    pub agents: Vec<AgentConfig>,
    pub initial_orders: Vec<InitialOrder>,
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<SimulationConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: RawConfig = serde_json::from_str(&contents)?;
    validate(raw)
}

fn validate(raw: RawConfig) -> Result<SimulationConfig, ConfigError> {
    let fair_price = raw.fair_price.map(validate_fair_price).transpose()?;

    let agents = raw
        .agents
        .into_iter()
        .map(validate_agent)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SimulationConfig {
        latency: Timestamp(raw.simulation.latency),
        duration: Timestamp(raw.simulation.duration),
        output_dir: raw.simulation.output_dir,
        pnl_snapshot_interval: Timestamp(raw.simulation.pnl_snapshot_interval),
        instruments: raw.instruments.into_iter().map(InstrumentId).collect(),
        fair_price,
        noise_traders: raw.noise_traders,
        agents,
        initial_orders: raw.initial_orders,
    })
}

fn validate_fair_price(raw: RawFairPrice) -> Result<(FairPriceModelConfig, u64), ConfigError> {
    if raw.tick_size == 0 {
        return Err(ConfigError::Invalid(
            "fair_price.tick_size must be positive".to_string(),
        ));
    }

    let has_jump_params =
        raw.jump_intensity.is_some() || raw.jump_mean.is_some() || raw.jump_std.is_some();

    let model = match raw.model.as_str() {
        "gbm" => {
            if has_jump_params {
                return Err(ConfigError::Invalid(
                    "GBM model cannot have jump diffusion parameters \
                     (jump_intensity, jump_mean, jump_std); use model=\"jump_diffusion\""
                        .to_string(),
                ));
            }
            FairPriceModelConfig::Gbm(GbmConfig {
                initial_price: Price(raw.initial_price),
                drift: raw.drift,
                volatility: raw.volatility,
                tick_size: Timestamp(raw.tick_size),
            })
        }
        "jump_diffusion" => {
            let (Some(jump_intensity), Some(jump_mean), Some(jump_std)) =
                (raw.jump_intensity, raw.jump_mean, raw.jump_std)
            else {
                return Err(ConfigError::Invalid(
                    "jump_diffusion model requires jump_intensity, jump_mean, and jump_std"
                        .to_string(),
                ));
            };
            FairPriceModelConfig::JumpDiffusion(JumpDiffusionConfig {
                initial_price: Price(raw.initial_price),
                drift: raw.drift,
                volatility: raw.volatility,
                tick_size: Timestamp(raw.tick_size),
                jump_intensity,
                jump_mean,
                jump_std,
            })
        }
        other => {
            return Err(ConfigError::Invalid(format!(
                "unknown fair_price model: {other}"
            )));
        }
    };

    Ok((model, raw.seed))
}

fn validate_agent(raw: RawAgentEntry) -> Result<AgentConfig, ConfigError> {
    let spec = match raw.agent_type.as_str() {
        "NoiseTrader" => AgentSpec::NoiseTrader(serde_json::from_value(raw.config)?),
        "MarketMaker" => AgentSpec::MarketMaker(serde_json::from_value(raw.config)?),
        "InformedTrader" => AgentSpec::InformedTrader(serde_json::from_value(raw.config)?),
        other => {
            return Err(ConfigError::Invalid(format!("unknown agent type: {other}")));
        }
    };
    Ok(AgentConfig {
        client_id: ClientId(raw.client_id),
        seed: raw.seed,
        initial_wakeup: Timestamp(raw.initial_wakeup),
        latency: Timestamp(raw.latency),
        spec,
    })
}
