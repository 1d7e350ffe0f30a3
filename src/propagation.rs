//! Propagation models mapping geometry to received power.
//!
//! Contains the closed set of path-loss laws used by the simulated
//! V2V channel:
//! - `Lossless`: received power equals transmitted power at any range
//! - `FreeSpace`: Friis (4πd/λ)² law with an optional system loss
//! - `TwoRayGround`: d⁴ law using the antenna heights of both endpoints
//!
//! Each model is a pure function of its inputs and also answers the
//! inverse question: at which separation does received power fall to a
//! given sensitivity. That inverse doubles as the characteristic range
//! of the fading reception models.
//!
//! Units:
//! - Power: watts
//! - Frequency: hertz
//! - Distance and antenna heights: metres

use serde::Deserialize;
use std::f64::consts::PI;

use crate::geodesy::{Position, horizontal_distance};

/// Speed of light in vacuum, m/s.
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Path-loss law applied between a transmitter and a receiver.
///
/// The model set is closed: every variant is a pure function of the
/// transmit power, carrier frequency, and endpoint geometry. `system_loss`
/// is the dimensionless L ≥ 1 factor of the Friis equation; 1.0 means no
/// losses beyond geometry.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropagationModel {
    /// No attenuation; every receiver sees the full transmit power.
    Lossless,
    /// Friis free-space law: Pr = Pt·λ² / ((4π)²·L·d²).
    FreeSpace {
        #[serde(default = "default_system_loss")]
        system_loss: f64,
    },
    /// Two-ray ground reflection: Pr = Pt·λ²·h_t²·h_r² / ((4π)²·L·d⁴).
    ///
    /// Antenna heights h_t and h_r are taken from the altitude components
    /// of the two positions.
    TwoRayGround {
        #[serde(default = "default_system_loss")]
        system_loss: f64,
    },
}

fn default_system_loss() -> f64 {
    1.0
}

/// Carrier wavelength in metres for a frequency in hertz.
pub fn wavelength(frequency_hz: f64) -> f64 {
    SPEED_OF_LIGHT_M_S / frequency_hz
}

impl PropagationModel {
    /// Expected received power at `rx` for a transmission from `tx`, in watts.
    ///
    /// The separation d is the great-circle horizontal distance between
    /// the two positions; altitudes enter only as the antenna heights of
    /// the two-ray model. Below one wavelength of separation the result
    /// is clamped to the transmit power (near-field guard, which also
    /// covers coincident positions); no attempt is made at near-field
    /// physics.
    ///
    /// # Parameters
    ///
    /// - `tx_power_w`: radiated isotropic power, > 0
    /// - `frequency_hz`: carrier frequency, > 0
    /// - `tx`, `rx`: geodetic endpoint positions
    ///
    /// # Returns
    ///
    /// Received power in watts; non-negative for well-formed inputs.
    pub fn received_power(&self, tx_power_w: f64, frequency_hz: f64, tx: &Position, rx: &Position) -> f64 {
        if let PropagationModel::Lossless = self {
            return tx_power_w;
        }

        let lambda = wavelength(frequency_hz);
        let distance = horizontal_distance(tx, rx);
        if distance < lambda {
            return tx_power_w;
        }

        let four_pi_sq = (4.0 * PI).powi(2);
        match *self {
            PropagationModel::Lossless => tx_power_w,
            PropagationModel::FreeSpace { system_loss } => {
                tx_power_w * lambda.powi(2) / (four_pi_sq * system_loss * distance.powi(2))
            }
            PropagationModel::TwoRayGround { system_loss } => {
                let h_t = tx.altitude_m;
                let h_r = rx.altitude_m;
                tx_power_w * lambda.powi(2) * h_t.powi(2) * h_r.powi(2) / (four_pi_sq * system_loss * distance.powi(4))
            }
        }
    }

    /// Separation at which received power falls to `sensitivity_w`, in metres.
    ///
    /// Solves the model's path-loss equation for d. Non-positive
    /// sensitivity means "any signal counts" and yields +∞, as does the
    /// lossless model. The result is the characteristic range consumed by
    /// the fading reception models and is also useful for range rings in
    /// visualisations.
    ///
    /// # Parameters
    ///
    /// - `sensitivity_w`: receiver detection threshold in watts
    /// - `tx_power_w`: radiated isotropic power, > 0
    /// - `frequency_hz`: carrier frequency, > 0
    /// - `tx_height_m`, `rx_height_m`: antenna heights for the two-ray model
    pub fn max_range(&self, sensitivity_w: f64, tx_power_w: f64, frequency_hz: f64, tx_height_m: f64, rx_height_m: f64) -> f64 {
        if sensitivity_w <= 0.0 {
            return f64::INFINITY;
        }

        let lambda = wavelength(frequency_hz);
        let four_pi_sq = (4.0 * PI).powi(2);
        match *self {
            PropagationModel::Lossless => f64::INFINITY,
            PropagationModel::FreeSpace { system_loss } => {
                lambda / (4.0 * PI) * (tx_power_w / (system_loss * sensitivity_w)).sqrt()
            }
            PropagationModel::TwoRayGround { system_loss } => {
                let numerator = tx_power_w * lambda.powi(2) * tx_height_m.powi(2) * rx_height_m.powi(2);
                (numerator / (four_pi_sq * system_loss * sensitivity_w)).powf(0.25)
            }
        }
    }
}
