//! Unit Converter: raw ADC samples to physical quantities
//!
//! ## Divider Model
//!
//! Both sensors sit on the low side of a voltage divider fed from the supply
//! rail. For a raw sample `raw` the measured voltage is
//!
//! ```text
//! v = raw / ADC_MAX * VCC
//! ```
//!
//! ### Gas path
//!
//! ```text
//! Rs = (VCC * RL) / v - RL
//! ```
//!
//! `Rs` is used directly as a monotonic proxy for gas concentration. There is
//! no ppm curve; the CO threshold is expressed in the same resistance unit.
//!
//! ### Temperature path
//!
//! ```text
//! R = R_series * (VCC - v) / v
//! T = 1 / (1/T0 + ln(R / R0) / Beta) - 273.15
//! ```
//!
//! the Beta-parameter form of Steinhart-Hart, referenced to `R0` at `T0`.
//!
//! ## Undefined Samples
//!
//! `raw == 0` makes `v` zero and both formulas divide by it. A full-scale
//! thermistor sample makes `R` zero and `ln(0)` diverges. Both are reported as
//! [`ConversionError`] instead of leaking infinities into the alarm decision.

use crate::{
    constants::calibration::{
        ADC_MAX, GAS_LOAD_RESISTANCE_KOHM, KELVIN_OFFSET, SUPPLY_VOLTAGE_V, THERMISTOR_BETA_K,
        THERMISTOR_R0_KOHM, THERMISTOR_SERIES_RESISTANCE_KOHM, THERMISTOR_T0_K,
    },
    errors::{ConversionError, ConversionResult},
    reading::{PhysicalReading, RawSample},
};

/// Beta-model parameters of an NTC thermistor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermistorParams {
    /// Beta coefficient (K)
    pub beta: f64,
    /// Resistance at `t0_kelvin` (kΩ)
    pub r0: f64,
    /// Nominal temperature (K)
    pub t0_kelvin: f64,
    /// Fixed resistor completing the divider (kΩ)
    pub series_resistance: f64,
}

impl Default for ThermistorParams {
    fn default() -> Self {
        Self {
            beta: THERMISTOR_BETA_K,
            r0: THERMISTOR_R0_KOHM,
            t0_kelvin: THERMISTOR_T0_K,
            series_resistance: THERMISTOR_SERIES_RESISTANCE_KOHM,
        }
    }
}

/// Calibration of the analog front end
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Divider supply voltage (V)
    pub supply_voltage: f64,
    /// ADC full-scale value
    pub adc_max: u16,
    /// Gas-sensor load resistor (kΩ)
    pub gas_load_resistance: f64,
    /// Thermistor model
    pub thermistor: ThermistorParams,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            supply_voltage: SUPPLY_VOLTAGE_V,
            adc_max: ADC_MAX,
            gas_load_resistance: GAS_LOAD_RESISTANCE_KOHM,
            thermistor: ThermistorParams::default(),
        }
    }
}

/// Converts raw samples using a fixed calibration
///
/// Pure and deterministic; holds nothing but the calibration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UnitConverter {
    calibration: Calibration,
}

impl UnitConverter {
    /// Converter for a specific calibration
    pub const fn new(calibration: Calibration) -> Self {
        Self { calibration }
    }

    /// Calibration in use
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Gas-sensor resistance (kΩ) for a raw sample
    ///
    /// Decreases as `raw` increases. A full-scale sample gives zero.
    pub fn to_gas_resistance(&self, raw: RawSample) -> ConversionResult<f64> {
        let voltage = self.divider_voltage(raw)?;
        let cal = &self.calibration;

        let rs = (cal.supply_voltage * cal.gas_load_resistance) / voltage - cal.gas_load_resistance;
        finite(rs)
    }

    /// Thermistor temperature (°C) for a raw sample
    ///
    /// Increases with `raw`: a higher divider voltage means a smaller NTC
    /// resistance, i.e. a hotter sensor.
    pub fn to_temperature_celsius(&self, raw: RawSample) -> ConversionResult<f64> {
        let voltage = self.divider_voltage(raw)?;
        if raw == self.calibration.adc_max {
            return Err(ConversionError::SaturatedThermistor);
        }

        let cal = &self.calibration;
        let ntc = &cal.thermistor;

        let resistance = ntc.series_resistance * (cal.supply_voltage - voltage) / voltage;
        if resistance <= 0.0 {
            return Err(ConversionError::SaturatedThermistor);
        }

        let inverse_t = 1.0 / ntc.t0_kelvin + libm::log(resistance / ntc.r0) / ntc.beta;
        finite(1.0 / inverse_t - KELVIN_OFFSET)
    }

    /// Convert a (temperature, gas) sample pair into one reading
    pub fn to_reading(
        &self,
        thermistor_raw: RawSample,
        gas_raw: RawSample,
    ) -> ConversionResult<PhysicalReading> {
        let temperature_celsius = self.to_temperature_celsius(thermistor_raw)?;
        let gas_resistance = self.to_gas_resistance(gas_raw)?;

        Ok(PhysicalReading::new(temperature_celsius, gas_resistance))
    }

    fn divider_voltage(&self, raw: RawSample) -> ConversionResult<f64> {
        let cal = &self.calibration;

        if raw == 0 {
            return Err(ConversionError::ZeroSample);
        }
        if raw > cal.adc_max {
            return Err(ConversionError::OutOfRange {
                raw,
                max: cal.adc_max,
            });
        }

        Ok(f64::from(raw) / f64::from(cal.adc_max) * cal.supply_voltage)
    }
}

fn finite(value: f64) -> ConversionResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConversionError::NonFinite)
    }
}
