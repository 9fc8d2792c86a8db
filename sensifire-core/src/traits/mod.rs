//! Core traits for the node's collaborators
//!
//! The core never touches hardware or sockets directly. Everything outside
//! the decision logic is reached through these traits, so the same loop runs
//! on a microcontroller, on a host with simulated sensors, and in tests.
//!
//! ## Hardware
//! - [`AnalogInput`]: "read raw sample from channel C"
//! - [`DigitalOutput`]: "set actuator pin P to level L"
//! - [`DelayMs`]: the sleep at the end of each cycle
//!
//! ## Session
//! - [`Connector`]: opens a pub/sub session to the broker
//! - [`Session`]: "publish byte payload to topic T over session S"

mod hardware;
mod session;

pub use hardware::{AnalogInput, DelayMs, DigitalOutput};
pub use session::{Connector, Session};
