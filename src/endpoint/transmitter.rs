//! Rate-limited message sources.

use std::rc::Rc;

use crate::channel::{Message, SharedChannel};
use crate::geodesy::Position;

/// ADS-B UAT carrier frequency.
pub const ADSB_FREQUENCY_HZ: f64 = 978.0e6;
/// Nominal ADS-B transmit power.
pub const ADSB_POWER_W: f64 = 10.0;
/// ADS-B position broadcast interval.
pub const ADSB_UPDATE_INTERVAL_S: f64 = 1.0;

/// FLARM carrier frequency.
pub const FLARM_FREQUENCY_HZ: f64 = 928.0e6;
/// Nominal FLARM transmit power.
pub const FLARM_POWER_W: f64 = 1.0;
/// FLARM broadcast interval.
pub const FLARM_UPDATE_INTERVAL_S: f64 = 1.0;

/// Shapes a source's position and payload into [`Message`]s on a shared
/// channel, rate-limited by a minimum update interval.
///
/// An update interval of 0 transmits on every call. The rate limit is
/// per-transmitter, not per sender id; sharing one transmitter between
/// multiple senders is a caller error.
pub struct Transmitter<P> {
    channel: SharedChannel<P>,
    sensor_label: String,
    frequency_hz: f64,
    transmit_power_w: f64,
    update_interval_s: f64,
    last_transmit_time_s: Option<f64>,
}

impl<P> Transmitter<P> {
    pub fn new(
        channel: SharedChannel<P>,
        sensor_label: impl Into<String>,
        frequency_hz: f64,
        transmit_power_w: f64,
        update_interval_s: f64,
    ) -> Self {
        Self {
            channel,
            sensor_label: sensor_label.into(),
            frequency_hz,
            transmit_power_w,
            update_interval_s,
            last_transmit_time_s: None,
        }
    }

    /// ADS-B out: 978 MHz, 10 W, one broadcast per second.
    pub fn adsb(channel: SharedChannel<P>) -> Self {
        Self::new(channel, "ADS-B", ADSB_FREQUENCY_HZ, ADSB_POWER_W, ADSB_UPDATE_INTERVAL_S)
    }

    /// FLARM: 928 MHz, one broadcast per second.
    pub fn flarm(channel: SharedChannel<P>) -> Self {
        Self::new(channel, "FLARM", FLARM_FREQUENCY_HZ, FLARM_POWER_W, FLARM_UPDATE_INTERVAL_S)
    }

    /// Ground-truth broadcast for omniscient observers. The label is what
    /// matters; power and frequency are nominal, since the pairing
    /// lossless channel ignores them. Transmits on every call.
    pub fn ground_truth(channel: SharedChannel<P>) -> Self {
        Self::new(channel, "GroundTruth", ADSB_FREQUENCY_HZ, 1.0, 0.0)
    }

    pub fn sensor_label(&self) -> &str {
        &self.sensor_label
    }

    pub fn frequency_hz(&self) -> f64 {
        self.frequency_hz
    }

    pub fn transmit_power_w(&self) -> f64 {
        self.transmit_power_w
    }

    pub fn update_interval_s(&self) -> f64 {
        self.update_interval_s
    }

    /// Build a message and place it on the channel, unless suppressed by
    /// the update-interval gate.
    ///
    /// Returns the transmitted message, or `None` when less than the
    /// update interval has elapsed since the previous successful
    /// transmission. The very first call always transmits. The gate
    /// advances only on success, so for any two transmitted messages at
    /// times t₁ < t₂, t₂ − t₁ ≥ the update interval.
    pub fn transmit(&mut self, current_time_s: f64, sender_id: &str, position: Position, payload: P) -> Option<Rc<Message<P>>> {
        if let Some(last) = self.last_transmit_time_s {
            if current_time_s - last < self.update_interval_s {
                return None;
            }
        }
        self.last_transmit_time_s = Some(current_time_s);

        let message = Rc::new(Message {
            frequency_hz: self.frequency_hz,
            transmit_power_w: self.transmit_power_w,
            sent_time_s: current_time_s,
            sender_id: sender_id.to_string(),
            transmitter_position: position,
            payload,
        });
        self.channel.borrow_mut().transmit_shared(Rc::clone(&message));
        Some(message)
    }
}
