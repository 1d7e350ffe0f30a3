//! Reception models converting received power into Bernoulli outcomes.
//!
//! A reception model owns a propagation model and a decision rule. The
//! rule maps a transmission's parameters, the receiver geometry, and the
//! receiver sensitivity to a success probability in [0, 1]; a uniform
//! draw then decides whether the individual message is received.
//!
//! Decision rules:
//! - `Perfect`: always received
//! - `Constant`: fixed probability independent of geometry
//! - `Deterministic`: step function at the sensitivity threshold
//! - `Rayleigh`: exp(−(d/CR)²) fading around the characteristic range
//! - `Nakagami`: generalised fading with integer shape m ≥ 1; m = 1 is
//!   Rayleigh, large m approaches the deterministic step
//!
//! CR is the separation at which the propagation model predicts received
//! power equal to the sensitivity (see
//! [`PropagationModel::max_range`]). Reception is memoryless: every
//! (receiver, message) pair draws one independent sample.

use rand::Rng;
use serde::Deserialize;

use crate::geodesy::{Position, horizontal_distance};
use crate::propagation::PropagationModel;

/// Decision rule applied on top of a propagation model.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReceptionKind {
    /// Every message is received.
    Perfect,
    /// Fixed success probability, independent of geometry.
    Constant { probability: f64 },
    /// Received exactly when received power reaches the sensitivity.
    Deterministic,
    /// Rayleigh fading: p = exp(−(d/CR)²).
    Rayleigh,
    /// Nakagami-m fading: with x = m·(d/CR)², p = e^(−x)·Σ_{k<m} xᵏ/k!.
    Nakagami { shape: u32 },
}

/// A propagation model paired with a reception decision rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReceptionModel {
    propagation: PropagationModel,
    kind: ReceptionKind,
}

impl ReceptionModel {
    pub fn new(propagation: PropagationModel, kind: ReceptionKind) -> Self {
        Self { propagation, kind }
    }

    /// Lossless propagation with guaranteed reception; the model used by
    /// omniscient ground-truth channels.
    pub fn perfect() -> Self {
        Self::new(PropagationModel::Lossless, ReceptionKind::Perfect)
    }

    pub fn propagation(&self) -> &PropagationModel {
        &self.propagation
    }

    pub fn kind(&self) -> &ReceptionKind {
        &self.kind
    }

    /// Success probability for one message at one receiver.
    ///
    /// Non-positive sensitivity means "any signal counts": the
    /// deterministic rule always passes and the fading rules see an
    /// infinite characteristic range, so every variant degenerates to
    /// `Perfect`.
    ///
    /// # Parameters
    ///
    /// - `tx_power_w`, `frequency_hz`: the transmission's power and carrier
    /// - `tx`, `rx`: transmitter and receiver positions
    /// - `sensitivity_w`: receiver detection threshold in watts
    ///
    /// # Returns
    ///
    /// A probability in [0, 1].
    pub fn probability(&self, tx_power_w: f64, frequency_hz: f64, tx: &Position, rx: &Position, sensitivity_w: f64) -> f64 {
        let p = match self.kind {
            ReceptionKind::Perfect => 1.0,
            ReceptionKind::Constant { probability } => probability,
            ReceptionKind::Deterministic => {
                let power = self.propagation.received_power(tx_power_w, frequency_hz, tx, rx);
                if power >= sensitivity_w { 1.0 } else { 0.0 }
            }
            ReceptionKind::Rayleigh => self.fading_probability(1, tx_power_w, frequency_hz, tx, rx, sensitivity_w),
            ReceptionKind::Nakagami { shape } => {
                self.fading_probability(shape.max(1), tx_power_w, frequency_hz, tx, rx, sensitivity_w)
            }
        };
        p.clamp(0.0, 1.0)
    }

    /// Draw one uniform sample and decide reception of one message.
    ///
    /// Draws are independent across calls; nothing is memoised.
    pub fn received<R: Rng>(
        &self,
        rng: &mut R,
        tx_power_w: f64,
        frequency_hz: f64,
        tx: &Position,
        rx: &Position,
        sensitivity_w: f64,
    ) -> bool {
        rng.gen_range(0.0..1.0) < self.probability(tx_power_w, frequency_hz, tx, rx, sensitivity_w)
    }

    /// Characteristic communication range, delegated to the propagation
    /// model's inverse.
    pub fn communication_range(&self, sensitivity_w: f64, tx_power_w: f64, frequency_hz: f64, tx_height_m: f64, rx_height_m: f64) -> f64 {
        self.propagation.max_range(sensitivity_w, tx_power_w, frequency_hz, tx_height_m, rx_height_m)
    }

    /// Nakagami-m success probability; m = 1 is the Rayleigh case.
    ///
    /// With x = m·(d/CR)² the success probability is the upper regularised
    /// incomplete gamma Q(m, x), which for integer m reduces to the finite
    /// sum e^(−x)·Σ_{k<m} xᵏ/k!.
    fn fading_probability(&self, shape: u32, tx_power_w: f64, frequency_hz: f64, tx: &Position, rx: &Position, sensitivity_w: f64) -> f64 {
        let range = self
            .propagation
            .max_range(sensitivity_w, tx_power_w, frequency_hz, tx.altitude_m, rx.altitude_m);
        if range.is_infinite() {
            return 1.0;
        }
        let distance = horizontal_distance(tx, rx);
        if range <= 0.0 {
            return if distance <= 0.0 { 1.0 } else { 0.0 };
        }

        let x = shape as f64 * (distance / range).powi(2);
        let mut term = 1.0;
        let mut sum = 1.0;
        for k in 1..shape {
            term *= x / k as f64;
            sum += term;
        }
        (-x).exp() * sum
    }
}
