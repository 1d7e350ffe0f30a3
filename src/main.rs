use anyhow::Context;
use env_logger::Builder;
use log::{LevelFilter, info};

use v2v_channel_simulator::scenario::{load_scenario, run};

fn main() -> anyhow::Result<()> {
    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("v2v_channel_simulator"), LevelFilter::Debug)
        .init();

    info!("Starting up");

    let scenario_path = std::env::args()
        .nth(1)
        .context("Usage: v2v-channel-simulator <scenario.json>")?;

    let scenario = load_scenario(&scenario_path)?;
    info!("Loaded scenario file: {scenario_path}");

    let summary = run(&scenario);
    println!(
        "{} cycles: {} transmitted, {} received, delivery ratio {:.3}",
        summary.cycles,
        summary.transmitted,
        summary.received,
        summary.delivery_ratio()
    );
    Ok(())
}
