//! Latency-buffered message sinks.

use std::rc::Rc;

use crate::channel::{Message, SharedChannel};
use crate::geodesy::Position;

/// Drains a shared channel subject to a sensitivity and releases the
/// accepted messages to the caller after a fixed reception latency.
///
/// The latency buffer is receiver-local: a message accepted in cycle N
/// with latency L stays buffered until the first call whose current time
/// reaches `sent_time + L`, surviving channel flushes in between.
pub struct Receiver<P> {
    channel: Option<SharedChannel<P>>,
    sensor_label: String,
    sensitivity_w: f64,
    latency_s: f64,
    buffer: Vec<Rc<Message<P>>>,
}

impl<P> Receiver<P> {
    pub fn new(channel: SharedChannel<P>, sensor_label: impl Into<String>, sensitivity_w: f64, latency_s: f64) -> Self {
        Self {
            channel: Some(channel),
            sensor_label: sensor_label.into(),
            sensitivity_w,
            latency_s,
            buffer: Vec::new(),
        }
    }

    /// Receiver without a channel; every receive call yields nothing.
    pub fn detached(sensor_label: impl Into<String>) -> Self {
        Self {
            channel: None,
            sensor_label: sensor_label.into(),
            sensitivity_w: 0.0,
            latency_s: 0.0,
            buffer: Vec::new(),
        }
    }

    pub fn sensor_label(&self) -> &str {
        &self.sensor_label
    }

    pub fn sensitivity_w(&self) -> f64 {
        self.sensitivity_w
    }

    pub fn latency_s(&self) -> f64 {
        self.latency_s
    }

    /// Messages buffered but not yet mature.
    pub fn pending_count(&self) -> usize {
        self.buffer.len()
    }

    /// Query the channel at `position` and return the mature messages.
    ///
    /// Newly accepted messages join the internal buffer first; the buffer
    /// is then partitioned, releasing entries with
    /// `current_time ≥ sent_time + latency` in insertion order and
    /// retaining the rest. Never fails; a receiver with no channel just
    /// returns the empty list.
    pub fn receive(&mut self, current_time_s: f64, position: &Position) -> Vec<Rc<Message<P>>> {
        if let Some(channel) = &self.channel {
            let accepted = channel.borrow_mut().receive(position, self.sensitivity_w);
            self.buffer.extend(accepted);
        }

        let mut mature = Vec::new();
        let mut pending = Vec::new();
        for message in self.buffer.drain(..) {
            if current_time_s >= message.sent_time_s + self.latency_s {
                mature.push(message);
            } else {
                pending.push(message);
            }
        }
        self.buffer = pending;
        mature
    }
}
