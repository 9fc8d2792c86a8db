//! Sensor Front-End Calibration
//!
//! Both sensors sit in a voltage divider read by a 12-bit ADC. The gas
//! sensor's resistance is computed against a fixed load resistor; the NTC
//! thermistor's resistance is computed against a fixed series resistor and
//! then run through the Beta equation.
//!
//! Resistances are in kΩ. The CO threshold in [`super::alarm`] uses the same
//! unit.

// ===== ADC =====

/// ADC full-scale value (12-bit converter).
pub const ADC_MAX: u16 = 4095;

/// Divider supply voltage (V).
///
/// Source: RP2040 board 3V3 rail
pub const SUPPLY_VOLTAGE_V: f64 = 3.3;

// ===== GAS SENSOR =====

/// Load resistor in series with the gas sensor (kΩ).
///
/// Source: MQ-series breakout default RL
pub const GAS_LOAD_RESISTANCE_KOHM: f64 = 10.0;

// ===== NTC THERMISTOR =====

/// Series resistor in the thermistor divider (kΩ).
pub const THERMISTOR_SERIES_RESISTANCE_KOHM: f64 = 10.0;

/// Beta coefficient of the thermistor (K).
///
/// Source: common 10k NTC datasheet (B25/50 = 3950 K)
pub const THERMISTOR_BETA_K: f64 = 3950.0;

/// Thermistor resistance at the nominal temperature (kΩ).
pub const THERMISTOR_R0_KOHM: f64 = 10.0;

/// Nominal temperature for R0 (K), i.e. 25 °C.
pub const THERMISTOR_T0_K: f64 = 298.15;

/// Offset between Kelvin and Celsius.
pub const KELVIN_OFFSET: f64 = 273.15;
