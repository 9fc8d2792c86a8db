//! Simulated hardware for running the node on a workstation
//!
//! The ADC follows a repeating 60-step profile (one step per cycle):
//!
//! ```text
//! step   0..20   clean air, room temperature        SAFE
//! step  20..30   gas leak ramps in and out          ALARM around the peak
//! step  30..40   clean air                          SAFE
//! step  40..50   heat spike ramps in and out        ALARM around the peak
//! step  50..60   clean air                          SAFE
//! ```

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use log::info;
use sensifire_core::{
    constants::pins::{GAS_ADC_CHANNEL, THERMISTOR_ADC_CHANNEL},
    ActuatorPins, AnalogInput, DelayMs, DigitalOutput, RawSample, SampleError,
};

/// Steps before the profile repeats
pub const PROFILE_STEPS: u32 = 60;

/// Clean-air gas sample (≈ 3.65 kΩ)
const GAS_BASELINE: RawSample = 3000;
/// Deepest gas sample of the leak (≈ 14.1 kΩ)
const GAS_LEAK_PEAK: RawSample = 1700;
/// Room-temperature thermistor sample (≈ 25 °C)
const TEMP_BASELINE: RawSample = 2048;
/// Hottest thermistor sample of the spike (≈ 52 °C)
const TEMP_SPIKE_PEAK: RawSample = 3100;

/// Triangle from `base` to `peak` and back over `start..start + len`
fn ramp(step: u32, start: u32, len: u32, base: RawSample, peak: RawSample) -> RawSample {
    if step < start || step >= start + len {
        return base;
    }
    let half = len / 2;
    let pos = step - start;
    let dist = if pos <= half { pos } else { len - pos };

    let delta = i64::from(peak) - i64::from(base);
    let value = i64::from(base) + delta * i64::from(dist) / i64::from(half);
    RawSample::try_from(value).unwrap_or(base)
}

/// Thermistor sample at `step` of the profile
pub fn thermistor_profile(step: u32) -> RawSample {
    ramp(step % PROFILE_STEPS, 40, 10, TEMP_BASELINE, TEMP_SPIKE_PEAK)
}

/// Gas sample at `step` of the profile
pub fn gas_profile(step: u32) -> RawSample {
    ramp(step % PROFILE_STEPS, 20, 10, GAS_BASELINE, GAS_LEAK_PEAK)
}

/// ADC replaying the profile; advances one step per gas read
#[derive(Debug)]
pub struct SimulatedAdc {
    gas_channel: u8,
    thermistor_channel: u8,
    step: u32,
}

impl Default for SimulatedAdc {
    fn default() -> Self {
        Self::new(GAS_ADC_CHANNEL, THERMISTOR_ADC_CHANNEL)
    }
}

impl SimulatedAdc {
    pub fn new(gas_channel: u8, thermistor_channel: u8) -> Self {
        Self {
            gas_channel,
            thermistor_channel,
            step: 0,
        }
    }
}

impl AnalogInput for SimulatedAdc {
    fn read(&mut self, channel: u8) -> nb::Result<RawSample, SampleError> {
        if channel == self.thermistor_channel {
            Ok(thermistor_profile(self.step))
        } else if channel == self.gas_channel {
            let raw = gas_profile(self.step);
            self.step = self.step.wrapping_add(1);
            Ok(raw)
        } else {
            Err(nb::Error::Other(SampleError::InvalidChannel { channel }))
        }
    }
}

/// Output pins that log every level change
#[derive(Debug)]
pub struct LoggingGpio {
    pins: ActuatorPins,
    levels: HashMap<u8, bool>,
}

impl LoggingGpio {
    pub fn new(pins: ActuatorPins) -> Self {
        Self {
            pins,
            levels: HashMap::new(),
        }
    }

    fn name(&self, pin: u8) -> &'static str {
        if pin == self.pins.alarm_led {
            "alarm LED"
        } else if pin == self.pins.status_led {
            "status LED"
        } else if pin == self.pins.buzzer {
            "buzzer"
        } else {
            "gpio"
        }
    }
}

impl DigitalOutput for LoggingGpio {
    fn set(&mut self, pin: u8, high: bool) {
        if self.levels.insert(pin, high) != Some(high) {
            info!(
                "{} (GPIO {}) -> {}",
                self.name(pin),
                pin,
                if high { "on" } else { "off" }
            );
        }
    }
}

/// Delay backed by `thread::sleep`
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayMs for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
