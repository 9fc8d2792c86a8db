//! Core monitoring engine for SensiFire
//!
//! Turns two raw analog samples (gas bridge and NTC thermistor) into physical
//! readings, decides between SAFE and ALARM, drives the local actuators and
//! publishes telemetry through whatever pub/sub session is available.
//! Designed for single-core microcontrollers.
//!
//! Key constraints:
//! - No heap allocation anywhere in the cycle
//! - Single-threaded, one sleep per cycle
//! - Connectivity problems never stop the actuator updates
//!
//! ```no_run
//! use sensifire_core::{evaluate, AlarmState, PhysicalReading};
//!
//! let reading = PhysicalReading::new(23.5, 4.2);
//! assert_eq!(evaluate(&reading), AlarmState::Safe);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod actuator;
pub mod alarm;
pub mod constants;
pub mod convert;
pub mod errors;
pub mod monitor;
pub mod reading;
pub mod session;
pub mod telemetry;
pub mod traits;

// Public API
pub use actuator::{ActuatorDriver, ActuatorOutputs, ActuatorPins};
pub use alarm::{evaluate, AlarmState, AlarmThresholds};
pub use convert::{Calibration, ThermistorParams, UnitConverter};
pub use errors::{ConnectError, ConversionError, PublishError, SampleError};
pub use monitor::{CycleFault, CycleReport, Monitor, MonitorConfig, MonitorStats};
pub use reading::{PhysicalReading, RawSample};
pub use session::{SessionHandle, SessionManager, SessionState};
pub use telemetry::{PublishOptions, QoS, TelemetryPayload, TelemetryPublisher};
pub use traits::{AnalogInput, Connector, DelayMs, DigitalOutput, Session};

/// Crate version, reported by the node at startup
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
