//! Alarm Thresholds
//!
//! Both comparisons are strict: a reading sitting exactly on a threshold is
//! SAFE.

/// Gas-sensor resistance above which the node raises the alarm (kΩ).
///
/// Raw divider resistance, not ppm. No calibration curve is applied.
pub const CO_THRESHOLD: f64 = 10.0;

/// Temperature above which the node raises the alarm (°C).
pub const TEMP_THRESHOLD_C: f64 = 40.0;
