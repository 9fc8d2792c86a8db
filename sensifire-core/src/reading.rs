//! Readings produced once per cycle

/// Raw ADC sample, `0..=ADC_MAX`
pub type RawSample = u16;

/// Physical quantities derived from one pair of raw samples
///
/// Built once per cycle and never mutated; nothing carries over to the next
/// cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalReading {
    /// Thermistor temperature in °C
    pub temperature_celsius: f64,
    /// Gas-sensor resistance in load-resistor units (kΩ), the CO proxy
    pub gas_resistance: f64,
}

impl PhysicalReading {
    /// Bundle a temperature and a gas resistance
    pub const fn new(temperature_celsius: f64, gas_resistance: f64) -> Self {
        Self {
            temperature_celsius,
            gas_resistance,
        }
    }

    /// Both values are finite numbers
    pub fn is_finite(&self) -> bool {
        self.temperature_celsius.is_finite() && self.gas_resistance.is_finite()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PhysicalReading {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "T={} C, CO={}",
            self.temperature_celsius,
            self.gas_resistance
        )
    }
}
