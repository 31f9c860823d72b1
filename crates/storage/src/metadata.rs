//! metadata.json: a record of the resolved configuration.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde_json::{json, Map, Value};
use simulation::FairPriceModelConfig;
use types::{ClientId, InstrumentId, Timestamp};

/// Accumulates the resolved run configuration and writes it at finalize.
#[derive(Debug, Default)]
pub struct MetadataWriter {
    simulation: Map<String, Value>,
    instruments: Vec<u32>,
    fair_price: Option<Value>,
    agents: Vec<Value>,
}

impl MetadataWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_simulation_latency(&mut self, latency: Timestamp) {
        self.simulation
            .insert("latency".to_string(), json!(latency.raw()));
    }

    pub fn set_pnl_snapshot_interval(&mut self, interval: Timestamp) {
        self.simulation
            .insert("pnl_snapshot_interval".to_string(), json!(interval.raw()));
    }

    pub fn add_instrument(&mut self, instrument_id: InstrumentId) {
        self.instruments.push(instrument_id.raw());
    }

    pub fn set_fair_price(&mut self, config: &FairPriceModelConfig, seed: u64) {
        let mut value = serde_json::to_value(config).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut value {
            map.insert("seed".to_string(), json!(seed));
        }
        self.fair_price = Some(value);
    }

    pub fn add_agent(
        &mut self,
        client_id: ClientId,
        agent_type: &str,
        config: Value,
        seed: u64,
        latency: Timestamp,
    ) {
        self.agents.push(json!({
            "client_id": client_id.raw(),
            "type": agent_type,
            "config": config,
            "seed": seed,
            "latency": latency.raw(),
        }));
    }

    /// Set at finalize, once the run's end time is known.
    pub fn set_duration(&mut self, duration: Timestamp) {
        self.simulation
            .insert("duration".to_string(), json!(duration.raw()));
    }

    /// Write metadata.json into the output directory.
    pub fn write(&self, output_dir: &Path) -> io::Result<()> {
        let mut metadata = Map::new();
        metadata.insert("simulation".to_string(), Value::Object(self.simulation.clone()));
        metadata.insert("instruments".to_string(), json!(self.instruments));
        if let Some(fair_price) = &self.fair_price {
            metadata.insert("fair_price".to_string(), fair_price.clone());
        }
        metadata.insert("agents".to_string(), Value::Array(self.agents.clone()));

        let mut file = File::create(output_dir.join("metadata.json"))?;
        let rendered = serde_json::to_string_pretty(&Value::Object(metadata))
            .map_err(io::Error::other)?;
        file.write_all(rendered.as_bytes())
    }
}
