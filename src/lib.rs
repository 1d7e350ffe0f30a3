//! V2V communication substrate for a multi-aircraft fast-time simulator.
//!
//! A shared wireless channel carries messages between simulated
//! transmitters and receivers with physically motivated propagation loss
//! and probabilistic reception, so that sensor models built on top
//! (ADS-B, FLARM, ground-truth broadcast) behave like a real, lossy RF
//! environment rather than a perfect function call.
//!
//! ## Module Organization
//!
//! - `geodesy`: geodetic positions and great-circle distance
//! - `propagation`: path-loss laws and their inverse (max range)
//! - `reception`: per-message Bernoulli reception decisions
//! - `channel`: the shared broadcast medium and message envelope
//! - `endpoint`: rate-limited transmitters and latency-buffered receivers
//! - `scenario`: JSON scenario configuration and the fast-time driver
//!
//! ## Usage
//!
//! ```
//! use std::rc::Rc;
//! use v2v_channel_simulator::channel::Channel;
//! use v2v_channel_simulator::endpoint::{Receiver, Transmitter};
//! use v2v_channel_simulator::geodesy::Position;
//! use v2v_channel_simulator::propagation::PropagationModel;
//! use v2v_channel_simulator::reception::{ReceptionKind, ReceptionModel};
//!
//! let reception = ReceptionModel::new(PropagationModel::FreeSpace { system_loss: 1.0 }, ReceptionKind::Rayleigh);
//! let channel = Channel::with_seed(reception, 42).into_shared();
//!
//! let mut adsb_out = Transmitter::adsb(Rc::clone(&channel));
//! let mut adsb_in = Receiver::new(Rc::clone(&channel), "ADS-B", 1e-10, 0.0);
//!
//! let ownship = Position::new(37.0, -122.0, 120.0);
//! let traffic = Position::new(37.01, -122.0, 110.0);
//! let sent = adsb_out.transmit(0.0, "AC1", ownship, "ownship state");
//! assert!(sent.is_some());
//! let heard = adsb_in.receive(0.0, &traffic);
//! channel.borrow_mut().flush();
//! # let _ = heard;
//! ```
//!
//! The simulation driver walks transmit → receive → flush in lockstep
//! each cycle; everything here is single-threaded, straight-line code
//! with no I/O.

pub mod channel;
pub mod endpoint;
pub mod geodesy;
pub mod propagation;
pub mod reception;
pub mod scenario;

pub use channel::{Channel, Message, SharedChannel};
pub use endpoint::{Receiver, Transmitter};
pub use geodesy::Position;
pub use propagation::PropagationModel;
pub use reception::{ReceptionKind, ReceptionModel};
