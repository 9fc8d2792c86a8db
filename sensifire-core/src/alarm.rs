//! Alarm Evaluator
//!
//! A pure function from the current reading to a two-state decision. There is
//! no hysteresis and no memory: the previous cycle's state plays no part.
//!
//! ```text
//! ALARM  iff  gas_resistance > CO_THRESHOLD  or  temperature > TEMP_THRESHOLD
//! SAFE   otherwise
//! ```
//!
//! Both comparisons are strict, so a value exactly on a threshold is SAFE.
//! A reading carrying NaN or infinity cannot be shown to be safe and is
//! treated as ALARM.

use crate::{
    constants::alarm::{CO_THRESHOLD, TEMP_THRESHOLD_C},
    reading::PhysicalReading,
};

/// Two-state safety condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmState {
    /// Both values at or below their thresholds
    Safe,
    /// At least one threshold exceeded, or the reading is unusable
    Alarm,
}

impl AlarmState {
    /// Short label used in the per-cycle log line
    pub const fn label(&self) -> &'static str {
        match self {
            AlarmState::Safe => "safe",
            AlarmState::Alarm => "alert",
        }
    }

    /// True for [`AlarmState::Alarm`]
    pub const fn is_alarm(&self) -> bool {
        matches!(self, AlarmState::Alarm)
    }
}

/// The two independent thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlarmThresholds {
    /// Gas resistance limit (kΩ)
    pub co: f64,
    /// Temperature limit (°C)
    pub temperature_celsius: f64,
}

impl Default for AlarmThresholds {
    fn default() -> Self {
        Self {
            co: CO_THRESHOLD,
            temperature_celsius: TEMP_THRESHOLD_C,
        }
    }
}

impl AlarmThresholds {
    /// Decide SAFE or ALARM for one reading
    pub fn evaluate(&self, reading: &PhysicalReading) -> AlarmState {
        if !reading.is_finite() {
            return AlarmState::Alarm;
        }

        if reading.gas_resistance > self.co || reading.temperature_celsius > self.temperature_celsius {
            AlarmState::Alarm
        } else {
            AlarmState::Safe
        }
    }
}

/// Evaluate against the stock thresholds
pub fn evaluate(reading: &PhysicalReading) -> AlarmState {
    AlarmThresholds::default().evaluate(reading)
}
