//! Constants for SensiFire Core
//!
//! Every number the node depends on is defined here, once, with its unit and
//! where it comes from. Nothing in this module is mutable at runtime; a
//! deployment that needs different values rebuilds the firmware.
//!
//! ## Organization
//!
//! - **Calibration**: divider and thermistor parameters for the unit converter
//! - **Alarm**: the two safety thresholds
//! - **Time**: cycle cadence and boundary timeouts
//! - **Network**: broker, topic and payload limits
//! - **Pins**: analog channels and actuator outputs

/// Electrical and thermistor calibration of the sensor front end.
pub mod calibration;

/// Safety thresholds for the alarm decision.
pub mod alarm;

/// Cycle cadence and timeouts.
pub mod time;

/// Broker target and telemetry format limits.
pub mod network;

/// Analog channel and actuator pin assignment.
pub mod pins;

// Re-export commonly used constants for convenience
pub use calibration::{ADC_MAX, SUPPLY_VOLTAGE_V, GAS_LOAD_RESISTANCE_KOHM};
pub use alarm::{CO_THRESHOLD, TEMP_THRESHOLD_C};
pub use time::{ADC_MAX_POLLS, CYCLE_INTERVAL_MS, CONNECT_TIMEOUT_MS, PUBLISH_ACK_TIMEOUT_MS};
pub use network::{BROKER_HOST, BROKER_PORT, TELEMETRY_TOPIC, PAYLOAD_CAPACITY};
