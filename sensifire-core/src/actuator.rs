//! Actuator Driver
//!
//! Maps the alarm state onto three active-high outputs:
//!
//! | state | alarm LED | status LED | buzzer |
//! |-------|-----------|------------|--------|
//! | ALARM | on        | off        | on     |
//! | SAFE  | off       | on         | off    |
//!
//! Every pin is written on every call, whether or not the state changed. A
//! glitch that flips an output is therefore corrected within one cycle.

use crate::{
    alarm::AlarmState,
    constants::pins::{ALARM_LED_PIN, BUZZER_PIN, STATUS_LED_PIN},
    traits::DigitalOutput,
};

/// Desired level of each actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorOutputs {
    /// Red alarm LED
    pub alarm_led: bool,
    /// Green "safe" LED
    pub status_led: bool,
    /// Buzzer
    pub buzzer: bool,
}

impl ActuatorOutputs {
    /// Output pattern for a state
    pub const fn for_state(state: AlarmState) -> Self {
        match state {
            AlarmState::Alarm => Self {
                alarm_led: true,
                status_led: false,
                buzzer: true,
            },
            AlarmState::Safe => Self {
                alarm_led: false,
                status_led: true,
                buzzer: false,
            },
        }
    }
}

impl From<AlarmState> for ActuatorOutputs {
    fn from(state: AlarmState) -> Self {
        Self::for_state(state)
    }
}

/// Pin numbers of the three outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorPins {
    /// Alarm LED pin
    pub alarm_led: u8,
    /// Status LED pin
    pub status_led: u8,
    /// Buzzer pin
    pub buzzer: u8,
}

impl Default for ActuatorPins {
    fn default() -> Self {
        Self {
            alarm_led: ALARM_LED_PIN,
            status_led: STATUS_LED_PIN,
            buzzer: BUZZER_PIN,
        }
    }
}

/// Drives the actuator outputs from alarm states
pub struct ActuatorDriver<O: DigitalOutput> {
    output: O,
    pins: ActuatorPins,
    current: ActuatorOutputs,
}

impl<O: DigitalOutput> ActuatorDriver<O> {
    /// Take ownership of the outputs and assert the power-on pattern
    ///
    /// The node starts out showing SAFE: status LED lit, alarm LED and buzzer
    /// off, until a reading proves otherwise.
    pub fn new(output: O, pins: ActuatorPins) -> Self {
        let mut driver = Self {
            output,
            pins,
            current: ActuatorOutputs::for_state(AlarmState::Safe),
        };
        driver.write(driver.current);
        driver
    }

    /// Re-assert all three outputs for `state`
    pub fn apply(&mut self, state: AlarmState) {
        let outputs = ActuatorOutputs::for_state(state);
        self.write(outputs);
        self.current = outputs;
    }

    /// Levels written by the last call
    pub fn outputs(&self) -> ActuatorOutputs {
        self.current
    }

    /// Underlying output collaborator
    pub fn output(&self) -> &O {
        &self.output
    }

    fn write(&mut self, outputs: ActuatorOutputs) {
        self.output.set(self.pins.alarm_led, outputs.alarm_led);
        self.output.set(self.pins.status_led, outputs.status_led);
        self.output.set(self.pins.buzzer, outputs.buzzer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every write and the resulting level per pin
    #[derive(Default)]
    struct PinBank {
        levels: [bool; 32],
        writes: usize,
    }

    impl DigitalOutput for PinBank {
        fn set(&mut self, pin: u8, high: bool) {
            self.levels[pin as usize] = high;
            self.writes += 1;
        }
    }

    fn levels(driver: &ActuatorDriver<PinBank>) -> (bool, bool, bool) {
        let bank = driver.output();
        (
            bank.levels[ALARM_LED_PIN as usize],
            bank.levels[STATUS_LED_PIN as usize],
            bank.levels[BUZZER_PIN as usize],
        )
    }

    #[test]
    fn power_on_shows_safe() {
        let driver = ActuatorDriver::new(PinBank::default(), ActuatorPins::default());

        assert_eq!(levels(&driver), (false, true, false));
        assert_eq!(driver.output().writes, 3);
    }

    #[test]
    fn alarm_pattern() {
        let mut driver = ActuatorDriver::new(PinBank::default(), ActuatorPins::default());
        driver.apply(AlarmState::Alarm);

        assert_eq!(levels(&driver), (true, false, true));
        assert_eq!(
            driver.outputs(),
            ActuatorOutputs {
                alarm_led: true,
                status_led: false,
                buzzer: true
            }
        );
    }

    #[test]
    fn repeated_apply_rewrites_every_pin() {
        let mut driver = ActuatorDriver::new(PinBank::default(), ActuatorPins::default());

        driver.apply(AlarmState::Safe);
        driver.apply(AlarmState::Safe);

        // 3 at power-on + 3 per apply, even without a state change
        assert_eq!(driver.output().writes, 9);
        assert_eq!(levels(&driver), (false, true, false));
    }

    #[test]
    fn corrects_externally_flipped_pin() {
        let mut driver = ActuatorDriver::new(PinBank::default(), ActuatorPins::default());
        driver.apply(AlarmState::Alarm);

        // Simulated fault resets the buzzer behind the driver's back
        driver.output.levels[BUZZER_PIN as usize] = false;

        driver.apply(AlarmState::Alarm);
        assert_eq!(levels(&driver), (true, false, true));
    }
}
