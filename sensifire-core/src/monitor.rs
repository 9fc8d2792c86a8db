//! Monitoring Loop
//!
//! ## Cycle
//!
//! ```text
//! ┌─▶ 1. session alive? ──no──▶ connect (bounded, failure logged)
//! │   2. read thermistor + gas samples
//! │   3. convert to PhysicalReading
//! │   4. evaluate SAFE/ALARM ──▶ apply actuators (every cycle)
//! │   5. publish reading over whatever session is held
//! └── 6. sleep for the fixed cadence
//! ```
//!
//! Steps 1–5 are [`Monitor::run_cycle`]; [`Monitor::run`] adds the sleep and
//! never returns. Nothing in a cycle is fatal.
//!
//! ## Faulted Cycles
//!
//! If a sample cannot be read or converted there is no reading to judge. The
//! cycle then drives the actuators to ALARM and skips the publish: a safety
//! sensor that stops answering is treated as a dangerous condition. An ADC
//! still busy after [`MonitorConfig::adc_max_polls`] polls counts as a failed
//! read, so the sleep at the end of the cycle stays the only wait.
//!
//! ## Context
//!
//! All configuration lives in a [`MonitorConfig`] built once at startup and
//! moved into the [`Monitor`], which owns every collaborator. There is no
//! global state.

use crate::{
    actuator::{ActuatorDriver, ActuatorPins},
    alarm::{AlarmState, AlarmThresholds},
    constants::{
        pins::{GAS_ADC_CHANNEL, THERMISTOR_ADC_CHANNEL},
        time::{ADC_MAX_POLLS, CYCLE_INTERVAL_MS},
    },
    convert::{Calibration, UnitConverter},
    errors::{ConnectError, ConversionError, PublishError, SampleError},
    reading::{PhysicalReading, RawSample},
    session::{SessionHandle, SessionManager},
    telemetry::{PublishOptions, TelemetryPublisher},
    traits::{AnalogInput, Connector, DelayMs, DigitalOutput},
};

/// Everything the loop needs to know, fixed at startup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorConfig {
    /// Analog front-end calibration
    pub calibration: Calibration,
    /// Alarm thresholds
    pub thresholds: AlarmThresholds,
    /// ADC channel of the gas sensor
    pub gas_channel: u8,
    /// ADC channel of the thermistor
    pub thermistor_channel: u8,
    /// `WouldBlock` answers tolerated per ADC read
    pub adc_max_polls: u32,
    /// Actuator pin assignment
    pub pins: ActuatorPins,
    /// Sleep between cycles (ms)
    pub cycle_interval_ms: u32,
    /// Telemetry topic and delivery options
    pub publish: PublishOptions,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            calibration: Calibration::default(),
            thresholds: AlarmThresholds::default(),
            gas_channel: GAS_ADC_CHANNEL,
            thermistor_channel: THERMISTOR_ADC_CHANNEL,
            adc_max_polls: ADC_MAX_POLLS,
            pins: ActuatorPins::default(),
            cycle_interval_ms: CYCLE_INTERVAL_MS,
            publish: PublishOptions::default(),
        }
    }
}

/// Why a cycle produced no reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleFault {
    /// The ADC read failed
    Sample(SampleError),
    /// The raw value had no physical meaning
    Conversion(ConversionError),
}

impl From<SampleError> for CycleFault {
    fn from(e: SampleError) -> Self {
        CycleFault::Sample(e)
    }
}

impl From<ConversionError> for CycleFault {
    fn from(e: ConversionError) -> Self {
        CycleFault::Conversion(e)
    }
}

/// Outcome of one cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    /// Result of the reconnect, if step 1 attempted one
    pub connect: Option<Result<SessionHandle, ConnectError>>,
    /// The reading, or why there is none
    pub reading: Result<PhysicalReading, CycleFault>,
    /// State applied to the actuators
    pub state: AlarmState,
    /// Publish result; `None` when a fault skipped the publish
    pub publish: Option<Result<(), PublishError>>,
}

impl CycleReport {
    /// Whether step 1 tried to connect
    pub fn connect_attempted(&self) -> bool {
        self.connect.is_some()
    }

    /// Whether the reading reached the broker
    pub fn published(&self) -> bool {
        matches!(self.publish, Some(Ok(())))
    }
}

/// Running counters since startup
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MonitorStats {
    /// Cycles completed
    pub cycles: u64,
    /// Cycles that ended in ALARM (faults included)
    pub alarms: u64,
    /// Cycles without a usable reading
    pub faults: u64,
    /// Readings published successfully
    pub publishes_ok: u64,
    /// Readings dropped because the publish failed
    pub publishes_failed: u64,
    /// Failed connect attempts
    pub connect_failures: u64,
    /// Successful connects after the first one
    pub reconnections: u32,
}

/// The node's main loop and owner of all collaborators
pub struct Monitor<A, O, C, D>
where
    A: AnalogInput,
    O: DigitalOutput,
    C: Connector,
    D: DelayMs,
{
    config: MonitorConfig,
    converter: UnitConverter,
    adc: A,
    actuators: ActuatorDriver<O>,
    sessions: SessionManager<C>,
    publisher: TelemetryPublisher,
    delay: D,
    stats: MonitorStats,
}

impl<A, O, C, D> Monitor<A, O, C, D>
where
    A: AnalogInput,
    O: DigitalOutput,
    C: Connector,
    D: DelayMs,
{
    /// Wire the collaborators together
    ///
    /// Asserts the power-on actuator pattern. Does not connect; the first
    /// cycle does.
    pub fn new(config: MonitorConfig, adc: A, output: O, connector: C, delay: D) -> Self {
        Self {
            converter: UnitConverter::new(config.calibration),
            actuators: ActuatorDriver::new(output, config.pins),
            sessions: SessionManager::new(connector),
            publisher: TelemetryPublisher::new(config.publish),
            config,
            adc,
            delay,
            stats: MonitorStats::default(),
        }
    }

    /// Run cycles forever
    pub fn run(&mut self) -> ! {
        log_info!(
            "Monitoring started, cycle every {} ms",
            self.config.cycle_interval_ms
        );

        loop {
            self.run_cycle();
            self.delay.delay_ms(self.config.cycle_interval_ms);
        }
    }

    /// Open a broker session now instead of waiting for the first cycle
    ///
    /// A failure is counted and returned; the caller may ignore it, the next
    /// cycle retries.
    pub fn connect(&mut self) -> Result<SessionHandle, ConnectError> {
        let result = self.sessions.connect();
        match result {
            Ok(_) => self.stats.reconnections = self.sessions.reconnections(),
            Err(_) => self.stats.connect_failures += 1,
        }
        result
    }

    /// One cycle without the trailing sleep
    pub fn run_cycle(&mut self) -> CycleReport {
        // 1. Reconnect if the session dropped
        let connect = if self.sessions.is_alive() {
            None
        } else {
            log_info!("Reconnecting to broker...");
            Some(self.connect())
        };

        // 2-3. Sample and convert
        let reading = self.sample();

        // 4. Decide and drive outputs, always
        let state = match &reading {
            Ok(reading) => self.config.thresholds.evaluate(reading),
            Err(fault) => {
                log_error!("Sensor fault, forcing alarm: {:?}", fault);
                self.stats.faults += 1;
                AlarmState::Alarm
            }
        };
        self.actuators.apply(state);

        if let Ok(r) = &reading {
            match state {
                AlarmState::Alarm => log_warn!(
                    "ALERT! Temperature: {:.2} °C, CO: {:.2}",
                    r.temperature_celsius,
                    r.gas_resistance
                ),
                AlarmState::Safe => log_info!(
                    "Safe. Temperature: {:.2} °C, CO: {:.2}",
                    r.temperature_celsius,
                    r.gas_resistance
                ),
            }
        }

        // 5. Publish over whatever session we have now
        let publish = reading.as_ref().ok().map(|r| {
            let result = self.publisher.publish(&mut self.sessions, r);
            match result {
                Ok(()) => self.stats.publishes_ok += 1,
                Err(_) => self.stats.publishes_failed += 1,
            }
            result
        });

        self.stats.cycles += 1;
        if state.is_alarm() {
            self.stats.alarms += 1;
        }
        log_debug!("Cycle {} complete: {}", self.stats.cycles, state.label());

        CycleReport {
            connect,
            reading,
            state,
            publish,
        }
    }

    fn sample(&mut self) -> Result<PhysicalReading, CycleFault> {
        let thermistor_raw = self.read_channel(self.config.thermistor_channel)?;
        let gas_raw = self.read_channel(self.config.gas_channel)?;

        Ok(self.converter.to_reading(thermistor_raw, gas_raw)?)
    }

    /// Poll one conversion, giving up after `adc_max_polls` busy answers
    fn read_channel(&mut self, channel: u8) -> Result<RawSample, SampleError> {
        let polls = self.config.adc_max_polls;
        for _ in 0..polls {
            match self.adc.read(channel) {
                Ok(raw) => return Ok(raw),
                Err(nb::Error::WouldBlock) => {}
                Err(nb::Error::Other(e)) => return Err(e),
            }
        }
        Err(SampleError::Timeout { channel, polls })
    }

    /// Configuration in use
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Counters since startup
    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    /// Actuator driver (read-only)
    pub fn actuators(&self) -> &ActuatorDriver<O> {
        &self.actuators
    }

    /// Session manager (read-only)
    pub fn sessions(&self) -> &SessionManager<C> {
        &self.sessions
    }

    /// Delay collaborator (read-only)
    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Sampling collaborator (read-only)
    pub fn adc(&self) -> &A {
        &self.adc
    }

    /// Mutable sampling collaborator, for feeding simulated values
    pub fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }
}
