//! Channel and Pin Assignment
//!
//! Matches the reference RP2040 board. All outputs are active-high.

/// ADC input for the gas sensor divider (ADC2 / GPIO28).
pub const GAS_ADC_CHANNEL: u8 = 2;

/// ADC input for the thermistor divider (ADC0 / GPIO26).
pub const THERMISTOR_ADC_CHANNEL: u8 = 0;

/// Red alarm LED.
pub const ALARM_LED_PIN: u8 = 4;

/// Green "safe" status LED.
pub const STATUS_LED_PIN: u8 = 5;

/// Piezo buzzer.
pub const BUZZER_PIN: u8 = 14;
