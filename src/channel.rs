//! The shared broadcast medium.
//!
//! A [`Channel`] is the single wireless medium of one simulation: every
//! transmitter appends to it, every receiver queries it, and the
//! simulation driver flushes it once per cycle. The channel holds no
//! per-receiver state; a reception query draws fresh Bernoulli samples
//! for each pending message, so two queries in the same cycle are
//! independent.
//!
//! Messages are immutable once transmitted and are handed to receivers
//! as shared read-only references. The payload type is generic and never
//! inspected here; callers own its meaning.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::rc::Rc;

use crate::geodesy::Position;
use crate::reception::ReceptionModel;

/// One transmission on the medium.
///
/// A message is a value object: once placed on the channel it is never
/// mutated, and two messages are distinct even when their fields are
/// equal. `sent_time_s` is monotonically non-decreasing per transmitter
/// but carries no ordering across transmitters.
#[derive(Debug, Clone)]
pub struct Message<P> {
    /// Carrier frequency in hertz.
    pub frequency_hz: f64,
    /// Radiated isotropic power in watts.
    pub transmit_power_w: f64,
    /// Simulation time of transmission in seconds.
    pub sent_time_s: f64,
    /// Opaque sender identity; the channel never interprets it.
    pub sender_id: String,
    /// Geodetic position of the transmitter at send time.
    pub transmitter_position: Position,
    /// Opaque payload owned by the caller.
    pub payload: P,
}

/// Single shared broadcast medium for one simulation.
///
/// The channel owns its reception model and its random number generator.
/// Seeding the generator (via [`Channel::with_seed`]) makes a run
/// reproducible; concurrent channels replay independently because no RNG
/// state is shared between them.
pub struct Channel<P> {
    reception: ReceptionModel,
    rng: StdRng,
    pending: Vec<Rc<Message<P>>>,
}

/// Channel handle shared by the endpoints of a single-threaded simulation.
pub type SharedChannel<P> = Rc<RefCell<Channel<P>>>;

impl<P> Channel<P> {
    /// Channel with an OS-seeded generator.
    pub fn new(reception: ReceptionModel) -> Self {
        Self {
            reception,
            rng: StdRng::from_entropy(),
            pending: Vec::new(),
        }
    }

    /// Channel with a fixed seed for reproducible runs.
    pub fn with_seed(reception: ReceptionModel, seed: u64) -> Self {
        Self {
            reception,
            rng: StdRng::seed_from_u64(seed),
            pending: Vec::new(),
        }
    }

    /// Wrap the channel for sharing among transmitters and receivers.
    pub fn into_shared(self) -> SharedChannel<P> {
        Rc::new(RefCell::new(self))
    }

    pub fn reception(&self) -> &ReceptionModel {
        &self.reception
    }

    /// Number of messages pending in the current cycle.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Place a message on the medium.
    pub fn transmit(&mut self, message: Message<P>) {
        self.pending.push(Rc::new(message));
    }

    pub(crate) fn transmit_shared(&mut self, message: Rc<Message<P>>) {
        self.pending.push(message);
    }

    /// Messages successfully received at `position` with the given
    /// sensitivity, in insertion order.
    ///
    /// Does not consume the pending sequence; every receiver in a cycle
    /// sees the same traffic, and repeated queries draw fresh samples.
    /// Self-reception is not filtered here; discarding own-id messages
    /// is the caller's responsibility.
    pub fn receive(&mut self, position: &Position, sensitivity_w: f64) -> Vec<Rc<Message<P>>> {
        let mut accepted = Vec::new();
        for message in &self.pending {
            let received = self.reception.received(
                &mut self.rng,
                message.transmit_power_w,
                message.frequency_hz,
                &message.transmitter_position,
                position,
                sensitivity_w,
            );
            if received {
                accepted.push(Rc::clone(message));
            }
        }
        accepted
    }

    /// Drop all pending messages; called by the driver at end of cycle.
    pub fn flush(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::PropagationModel;
    use crate::reception::ReceptionKind;

    fn message(sender: &str, sent_time_s: f64) -> Message<&'static str> {
        Message {
            frequency_hz: 978.0e6,
            transmit_power_w: 10.0,
            sent_time_s,
            sender_id: sender.to_string(),
            transmitter_position: Position::new(0.0, 0.0, 100.0),
            payload: "state",
        }
    }

    #[test]
    fn receive_preserves_insertion_order() {
        let mut channel = Channel::with_seed(ReceptionModel::perfect(), 1);
        for sender in ["A", "B", "C"] {
            channel.transmit(message(sender, 0.0));
        }

        let here = Position::new(0.0, 0.1, 100.0);
        let received = channel.receive(&here, 1e-10);
        let order: Vec<&str> = received.iter().map(|m| m.sender_id.as_str()).collect();
        assert_eq!(order, ["A", "B", "C"]);
    }

    #[test]
    fn flush_empties_the_medium() {
        let mut channel = Channel::with_seed(ReceptionModel::perfect(), 1);
        channel.transmit(message("A", 0.0));
        assert_eq!(channel.pending_count(), 1);

        channel.flush();
        assert_eq!(channel.pending_count(), 0);
        let here = Position::new(0.0, 0.0, 100.0);
        assert!(channel.receive(&here, 1e-10).is_empty());

        // The medium is usable again after the next transmit.
        channel.transmit(message("B", 1.0));
        assert_eq!(channel.receive(&here, 1e-10).len(), 1);
    }

    #[test]
    fn receive_does_not_consume_pending_messages() {
        let mut channel = Channel::with_seed(ReceptionModel::perfect(), 1);
        channel.transmit(message("A", 0.0));
        let here = Position::new(0.0, 0.0, 100.0);
        assert_eq!(channel.receive(&here, 1e-10).len(), 1);
        assert_eq!(channel.receive(&here, 1e-10).len(), 1);
        assert_eq!(channel.pending_count(), 1);
    }

    #[test]
    fn self_reception_is_allowed_at_channel_level() {
        let mut channel = Channel::with_seed(ReceptionModel::perfect(), 1);
        channel.transmit(message("SELF", 0.0));
        let own_position = Position::new(0.0, 0.0, 100.0);
        let received = channel.receive(&own_position, 1e-10);
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].sender_id, "SELF");
    }

    #[test]
    fn out_of_range_messages_are_dropped_deterministically() {
        let reception = ReceptionModel::new(PropagationModel::FreeSpace { system_loss: 1.0 }, ReceptionKind::Deterministic);
        let mut channel = Channel::with_seed(reception, 1);
        channel.transmit(message("NEAR", 0.0));

        // Far beyond the free-space range for 1e-10 W sensitivity.
        let far = Position::new(0.0, 10.0, 100.0);
        assert!(channel.receive(&far, 1e-10).is_empty());

        let near = Position::new(0.0, 0.001, 100.0);
        assert_eq!(channel.receive(&near, 1e-10).len(), 1);
    }

    #[test]
    fn seeded_channels_replay_identically() {
        let reception = ReceptionModel::new(PropagationModel::FreeSpace { system_loss: 1.0 }, ReceptionKind::Rayleigh);
        let mut first = Channel::with_seed(reception, 99);
        let mut second = Channel::with_seed(reception, 99);

        let rx = Position::new(0.0, 0.05, 100.0);
        for channel in [&mut first, &mut second] {
            for i in 0..20 {
                channel.transmit(message("A", i as f64));
            }
        }
        let outcome_first: Vec<f64> = first.receive(&rx, 1e-10).iter().map(|m| m.sent_time_s).collect();
        let outcome_second: Vec<f64> = second.receive(&rx, 1e-10).iter().map(|m| m.sent_time_s).collect();
        assert_eq!(outcome_first, outcome_second);
    }
}
