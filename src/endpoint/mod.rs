//! Simulated radio endpoints attached to a shared channel.
//!
//! - `transmitter`: shapes a source's position and payload into messages
//!   and rate-limits them by a minimum update interval
//! - `receiver`: drains the channel subject to its sensitivity and
//!   releases messages to the caller after a fixed latency
//!
//! Both endpoint types hold a handle to exactly one [`SharedChannel`];
//! one channel is typically shared by many endpoints. Preconfigured
//! sensor defaults (ADS-B, FLARM, ground truth) live with the
//! transmitter.
//!
//! [`SharedChannel`]: crate::channel::SharedChannel

pub mod receiver;
pub mod transmitter;

pub use receiver::Receiver;
pub use transmitter::Transmitter;
