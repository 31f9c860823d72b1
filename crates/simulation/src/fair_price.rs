//! Fair-price processes.
//!
//! The latent "true" price of an instrument evolves lazily: `advance_to(t)`
//! moves the process forward only when `t` is past the last update, so
//! repeated advances to the same timestamp are free and the random stream is
//! consumed once per distinct event time. Each generator owns a seeded RNG;
//! the same seed and the same sequence of advance timestamps reproduce the
//! price path bit for bit.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Poisson, StandardNormal};
use serde::{Deserialize, Serialize};
use types::{Price, Timestamp};

/// A source of latent true prices, advanced lazily to event timestamps.
pub trait FairPriceSource {
    /// Advance the process to `t`; a no-op when `t` is not past the last
    /// update.
    fn advance_to(&mut self, t: Timestamp);

    /// Current price, rounded to an integer and clamped to at least 1.
    fn true_price(&self) -> Price;

    /// Timestamp of the last effective advance.
    fn last_update(&self) -> Timestamp;
}

/// Parameters of the Geometric Brownian Motion model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GbmConfig {
    pub initial_price: Price,
    pub drift: f64,
    pub volatility: f64,
    /// Time units per unit of model time (dt divisor).
    pub tick_size: Timestamp,
}

/// Parameters of the Merton jump-diffusion model: GBM plus log-normally
/// distributed jumps arriving at Poisson times.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct JumpDiffusionConfig {
    pub initial_price: Price,
    pub drift: f64,
    pub volatility: f64,
    pub tick_size: Timestamp,
    /// Mean number of jumps per unit of model time (lambda).
    pub jump_intensity: f64,
    /// Mean of log-jump sizes (mu_J).
    pub jump_mean: f64,
    /// Standard deviation of log-jump sizes (sigma_J).
    pub jump_std: f64,
}

/// Resolved fair-price model selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum FairPriceModelConfig {
    Gbm(GbmConfig),
    JumpDiffusion(JumpDiffusionConfig),
}

impl FairPriceModelConfig {
    /// Build the configured source with the given seed.
    pub fn build(&self, seed: u64) -> Box<dyn FairPriceSource> {
        match *self {
            FairPriceModelConfig::Gbm(config) => Box::new(GbmFairPrice::new(config, seed)),
            FairPriceModelConfig::JumpDiffusion(config) => {
                Box::new(JumpDiffusionFairPrice::new(config, seed))
            }
        }
    }
}

fn rounded(price: f64) -> Price {
    Price(price.round().max(1.0) as u64)
}

/// Geometric Brownian Motion generator.
pub struct GbmFairPrice {
    config: GbmConfig,
    current_price: f64,
    last_update: Timestamp,
    rng: StdRng,
}

impl GbmFairPrice {
    pub fn new(config: GbmConfig, seed: u64) -> Self {
        Self {
            current_price: config.initial_price.raw() as f64,
            last_update: Timestamp::ZERO,
            rng: StdRng::seed_from_u64(seed),
            config,
        }
    }

    pub fn config(&self) -> &GbmConfig {
        &self.config
    }
}

impl FairPriceSource for GbmFairPrice {
    fn advance_to(&mut self, t: Timestamp) {
        if t <= self.last_update {
            return;
        }
        let dt = (t - self.last_update).raw() as f64 / self.config.tick_size.raw() as f64;

        let sigma = self.config.volatility;
        if sigma == 0.0 {
            self.current_price *= (self.config.drift * dt).exp();
        } else {
            let z: f64 = StandardNormal.sample(&mut self.rng);
            let drift_term = (self.config.drift - 0.5 * sigma * sigma) * dt;
            let diffusion_term = sigma * dt.sqrt() * z;
            self.current_price *= (drift_term + diffusion_term).exp();
        }
        self.last_update = t;
    }

    fn true_price(&self) -> Price {
        rounded(self.current_price)
    }

    fn last_update(&self) -> Timestamp {
        self.last_update
    }
}

/// Merton jump-diffusion generator.
pub struct JumpDiffusionFairPrice {
    config: JumpDiffusionConfig,
    current_price: f64,
    last_update: Timestamp,
    rng: StdRng,
}

impl JumpDiffusionFairPrice {
    pub fn new(config: JumpDiffusionConfig, seed: u64) -> Self {
        Self {
            current_price: config.initial_price.raw() as f64,
            last_update: Timestamp::ZERO,
            rng: StdRng::seed_from_u64(seed),
            config,
        }
    }

    pub fn config(&self) -> &JumpDiffusionConfig {
        &self.config
    }
}

impl FairPriceSource for JumpDiffusionFairPrice {
    fn advance_to(&mut self, t: Timestamp) {
        if t <= self.last_update {
            return;
        }
        let dt = (t - self.last_update).raw() as f64 / self.config.tick_size.raw() as f64;

        let sigma = self.config.volatility;
        // The zero-volatility short-circuit also avoids a zero-mean Poisson.
        if sigma == 0.0 {
            self.current_price *= (self.config.drift * dt).exp();
            self.last_update = t;
            return;
        }

        let z: f64 = StandardNormal.sample(&mut self.rng);
        let lambda = self.config.jump_intensity;
        let mu_j = self.config.jump_mean;
        let sigma_j = self.config.jump_std;

        // Expected relative jump size, compensated out of the drift.
        let k = (mu_j + 0.5 * sigma_j * sigma_j).exp() - 1.0;
        let drift_term = (self.config.drift - 0.5 * sigma * sigma - lambda * k) * dt;
        let diffusion_term = sigma * dt.sqrt() * z;

        let jump_count = Poisson::new(lambda * dt)
            .map(|poisson| poisson.sample(&mut self.rng) as u64)
            .unwrap_or(0);
        let mut jump_term = 0.0;
        for _ in 0..jump_count {
            let jump_z: f64 = StandardNormal.sample(&mut self.rng);
            jump_term += mu_j + sigma_j * jump_z;
        }

        self.current_price *= (drift_term + diffusion_term + jump_term).exp();
        self.last_update = t;
    }

    fn true_price(&self) -> Price {
        rounded(self.current_price)
    }

    fn last_update(&self) -> Timestamp {
        self.last_update
    }
}

/// Fixed-price source for tests: the price is whatever was last set.
pub struct DummyFairPriceSource {
    price: Price,
    last_update: Timestamp,
}

impl DummyFairPriceSource {
    pub fn new(price: Price) -> Self {
        Self {
            price,
            last_update: Timestamp::ZERO,
        }
    }

    pub fn set_price(&mut self, price: Price) {
        self.price = price;
    }
}

impl FairPriceSource for DummyFairPriceSource {
    fn advance_to(&mut self, t: Timestamp) {
        if t > self.last_update {
            self.last_update = t;
        }
    }

    fn true_price(&self) -> Price {
        self.price
    }

    fn last_update(&self) -> Timestamp {
        self.last_update
    }
}
