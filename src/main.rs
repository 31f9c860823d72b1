//! exchange-sim: deterministic discrete-event simulator of a continuous
//! double auction.
//!
//! Loads a JSON configuration, wires instruments, agents, fair price, and
//! persistence into the simulation driver, runs to the configured duration,
//! and prints the final book and P&L report.

mod config;
mod report;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use agents::{InformedTrader, MarketMaker, NoiseTrader};
use clap::Parser;
use simulation::SimulationEngine;
use storage::DataCollector;
use tracing::info;
use tracing_subscriber::EnvFilter;
use types::{AgentWakeup, ClientId, Event, OrderSubmitted, OrderType, Timestamp};

use crate::config::{load_config, AgentSpec, SimulationConfig};

#[derive(Debug, Parser)]
#[command(name = "exchange-sim", about = "Agent-based exchange simulator")]
struct Cli {
    /// Simulation configuration file (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the output directory from the config.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config_path = resolve_config_path(cli.config)?;
    info!("loading config from {}", config_path.display());
    let mut config = load_config(&config_path).map_err(|e| e.to_string())?;

    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    info!("output directory: {}", config.output_dir.display());

    run_from_config(&config).map_err(|e| e.to_string())
}

fn resolve_config_path(cli_path: Option<PathBuf>) -> Result<PathBuf, String> {
    if let Some(path) = cli_path {
        return Ok(path);
    }
    for fallback in ["config.json", "config_template.json"] {
        let path = Path::new(fallback);
        if path.exists() {
            return Ok(path.to_path_buf());
        }
    }
    Err("no config file found; provide one with --config <path>".to_string())
}

fn run_from_config(config: &SimulationConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut sim = SimulationEngine::new(config.latency);

    let collector = Rc::new(RefCell::new(DataCollector::new(
        &config.output_dir,
        config.pnl_snapshot_interval,
    )?));
    {
        let mut collector = collector.borrow_mut();
        let metadata = collector.metadata_mut();
        metadata.set_simulation_latency(config.latency);
        metadata.set_pnl_snapshot_interval(config.pnl_snapshot_interval);
    }

    for &instrument in &config.instruments {
        sim.add_instrument(instrument);
        collector.borrow_mut().metadata_mut().add_instrument(instrument);
    }

    if let Some((model, seed)) = &config.fair_price {
        sim.set_fair_price_source(model.build(*seed));
        collector.borrow_mut().metadata_mut().set_fair_price(model, *seed);
    }

    if let Some(group) = &config.noise_traders {
        for i in 0..group.count {
            let id = ClientId(group.start_client_id + i);
            let seed = group.base_seed + i;
            let wakeup = Timestamp(group.initial_wakeup_start + i * group.initial_wakeup_step);

            sim.add_agent(Box::new(NoiseTrader::new(id, group.config.clone(), seed)));
            sim.set_agent_latency_jitter(id, group.config.latency_jitter, seed);
            collector.borrow_mut().metadata_mut().add_agent(
                id,
                "NoiseTrader",
                serde_json::to_value(&group.config)?,
                seed,
                Timestamp::ZERO,
            );
            sim.scheduler_mut().schedule(Event::AgentWakeup(AgentWakeup {
                timestamp: wakeup,
                agent_id: id,
            }));
        }
        info!("spawned {} noise traders", group.count);
    }

    for agent in &config.agents {
        match &agent.spec {
            AgentSpec::NoiseTrader(cfg) => {
                sim.add_agent(Box::new(NoiseTrader::new(
                    agent.client_id,
                    cfg.clone(),
                    agent.seed,
                )));
            }
            AgentSpec::MarketMaker(cfg) => {
                sim.add_agent(Box::new(MarketMaker::new(agent.client_id, cfg.clone())));
            }
            AgentSpec::InformedTrader(cfg) => {
                sim.add_agent(Box::new(InformedTrader::new(
                    agent.client_id,
                    cfg.clone(),
                    agent.seed,
                )));
            }
        }
        sim.set_agent_latency(agent.client_id, agent.latency);
        sim.set_agent_latency_jitter(agent.client_id, agent.spec.latency_jitter(), agent.seed);
        collector.borrow_mut().metadata_mut().add_agent(
            agent.client_id,
            agent.spec.type_name(),
            agent.spec.to_json(),
            agent.seed,
            agent.latency,
        );
        sim.scheduler_mut().schedule(Event::AgentWakeup(AgentWakeup {
            timestamp: agent.initial_wakeup,
            agent_id: agent.client_id,
        }));
    }

    for order in &config.initial_orders {
        sim.scheduler_mut().schedule(Event::OrderSubmitted(OrderSubmitted {
            timestamp: Timestamp::ZERO,
            agent_id: ClientId(0),
            instrument_id: order.instrument,
            quantity: order.quantity,
            price: order.price,
            side: order.side,
            order_type: OrderType::Limit,
        }));
    }

    sim.add_hook(collector.clone());

    println!("Initial order book:");
    sim.run_until(Timestamp(1));
    if let Some(&first) = config.instruments.first() {
        report::print_book(&sim, first, 15);
    }

    info!("running simulation to t={}", config.duration);
    sim.run_until(config.duration);
    println!("\nSimulation complete. Time: {}", sim.now());

    println!("\nFinal order book:");
    if let Some(&first) = config.instruments.first() {
        report::print_book(&sim, first, 15);
    }

    let mark_price = sim.mark_price();
    println!("\nMark price (fair value): {mark_price}\n");
    report::print_pnl(&sim, mark_price);

    sim.finish(config.duration);
    if let Some(error) = collector.borrow_mut().take_error() {
        return Err(error.into());
    }
    info!("persistence data written to {}", config.output_dir.display());

    Ok(())
}
