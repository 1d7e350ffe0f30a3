//! Scenario loading, parsing, and validation.
//!
//! Scenarios are JSON files describing the propagation and reception
//! models of the shared channel, the run parameters, and the vehicles
//! attached to the medium. Validation rejects contract violations
//! (non-positive power or frequency, malformed probabilities, duplicate
//! ids) before the simulation starts; the core assumes well-formed
//! inputs from then on.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;

use crate::geodesy::Position;
use crate::propagation::PropagationModel;
use crate::reception::ReceptionKind;

/// Root structure describing one simulation run.
#[derive(Deserialize)]
pub struct Scenario {
    /// Path-loss law of the shared medium.
    pub propagation: PropagationModel,
    /// Reception decision rule applied per message and receiver.
    pub reception: ReceptionKind,
    /// Seed for the channel RNG; omit for a fresh seed each run.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Number of simulation cycles to run.
    pub cycles: u32,
    /// Simulated seconds per cycle.
    pub time_step_s: f64,
    /// All vehicles attached to the medium.
    pub vehicles: Vec<VehicleConfig>,
}

/// One vehicle: an identity, a fixed position, and its two endpoints.
#[derive(Deserialize)]
pub struct VehicleConfig {
    pub id: String,
    pub position: Position,
    pub transmitter: TransmitterConfig,
    pub receiver: ReceiverConfig,
}

/// Transmitter selection: a preconfigured sensor or explicit parameters.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransmitterConfig {
    Adsb,
    Flarm,
    GroundTruth,
    Custom {
        sensor_label: String,
        frequency_hz: f64,
        transmit_power_w: f64,
        update_interval_s: f64,
    },
}

#[derive(Deserialize)]
pub struct ReceiverConfig {
    /// Detection threshold in watts; 0 accepts any signal.
    pub sensitivity_w: f64,
    /// Seconds between reception and release to the vehicle.
    #[serde(default)]
    pub latency_s: f64,
}

/// Validate a parsed scenario, rejecting configurations that would
/// violate the channel core's caller contract.
pub fn validate_scenario(scenario: &Scenario) -> Result<(), String> {
    if scenario.cycles == 0 {
        return Err("Scenario must run at least one cycle".to_string());
    }
    if !(scenario.time_step_s > 0.0) || !scenario.time_step_s.is_finite() {
        return Err(format!("Invalid time_step_s {}, must be positive", scenario.time_step_s));
    }
    if scenario.vehicles.is_empty() {
        return Err("Scenario must contain at least one vehicle".to_string());
    }

    match scenario.propagation {
        PropagationModel::Lossless => {}
        PropagationModel::FreeSpace { system_loss } | PropagationModel::TwoRayGround { system_loss } => {
            if !(system_loss >= 1.0) {
                return Err(format!("Invalid system_loss {system_loss}, must be >= 1"));
            }
        }
    }

    match scenario.reception {
        ReceptionKind::Constant { probability } => {
            if !(0.0..=1.0).contains(&probability) {
                return Err(format!("Invalid constant reception probability {probability}, must be in [0, 1]"));
            }
        }
        ReceptionKind::Nakagami { shape } => {
            if shape < 1 {
                return Err("Invalid Nakagami shape, must be an integer >= 1".to_string());
            }
        }
        _ => {}
    }

    let mut vehicle_ids = HashSet::new();
    for vehicle in &scenario.vehicles {
        if vehicle.id.is_empty() {
            return Err("Vehicle id must not be empty".to_string());
        }
        if !vehicle_ids.insert(vehicle.id.as_str()) {
            return Err(format!("Duplicate vehicle id found: {}", vehicle.id));
        }

        let p = &vehicle.position;
        if !p.latitude_deg.is_finite() || !p.longitude_deg.is_finite() || !p.altitude_m.is_finite() {
            return Err(format!("Vehicle {} has a non-finite position component", vehicle.id));
        }
        if p.latitude_deg.abs() > 90.0 || p.longitude_deg.abs() > 180.0 {
            return Err(format!(
                "Vehicle {} position ({}, {}) outside geodetic bounds",
                vehicle.id, p.latitude_deg, p.longitude_deg
            ));
        }

        if let TransmitterConfig::Custom {
            frequency_hz,
            transmit_power_w,
            update_interval_s,
            ..
        } = vehicle.transmitter
        {
            if !(frequency_hz > 0.0) || !frequency_hz.is_finite() {
                return Err(format!("Vehicle {} has invalid frequency_hz {frequency_hz}, must be positive", vehicle.id));
            }
            if !(transmit_power_w > 0.0) || !transmit_power_w.is_finite() {
                return Err(format!(
                    "Vehicle {} has invalid transmit_power_w {transmit_power_w}, must be positive",
                    vehicle.id
                ));
            }
            if !(update_interval_s >= 0.0) || !update_interval_s.is_finite() {
                return Err(format!(
                    "Vehicle {} has invalid update_interval_s {update_interval_s}, must be non-negative",
                    vehicle.id
                ));
            }
        }

        if !(vehicle.receiver.sensitivity_w >= 0.0) || !vehicle.receiver.sensitivity_w.is_finite() {
            return Err(format!(
                "Vehicle {} has invalid sensitivity_w {}, must be non-negative",
                vehicle.id, vehicle.receiver.sensitivity_w
            ));
        }
        if !(vehicle.receiver.latency_s >= 0.0) || !vehicle.receiver.latency_s.is_finite() {
            return Err(format!(
                "Vehicle {} has invalid latency_s {}, must be non-negative",
                vehicle.id, vehicle.receiver.latency_s
            ));
        }
    }

    Ok(())
}

/// Load and validate a scenario from a JSON file.
pub fn load_scenario(path: &str) -> anyhow::Result<Scenario> {
    let data = fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    let scenario = serde_json::from_str::<Scenario>(&data).context("Invalid JSON format")?;
    validate_scenario(&scenario).map_err(|message| anyhow::anyhow!("Invalid scenario configuration: {message}"))?;
    Ok(scenario)
}
