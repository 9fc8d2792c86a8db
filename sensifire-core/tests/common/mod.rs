//! Mock collaborators for integration tests
//!
//! Provides:
//! - A scripted ADC that can stall (`WouldBlock`) or fail per channel
//! - A pin bank recording every write
//! - An in-memory broker with a connector/session pair whose liveness and
//!   acceptance can be flipped from the test
//! - Delays that only record, one of which stops `run()` after N sleeps

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use sensifire_core::{
    constants::pins::{ALARM_LED_PIN, BUZZER_PIN, GAS_ADC_CHANNEL, STATUS_LED_PIN, THERMISTOR_ADC_CHANNEL},
    AnalogInput, ConnectError, Connector, DelayMs, DigitalOutput, PublishError, QoS, RawSample,
    SampleError, Session,
};

/// ADC returning fixed values per channel
#[derive(Default)]
pub struct ScriptedAdc {
    values: HashMap<u8, RawSample>,
    failing: Option<u8>,
    /// `WouldBlock` answers before each successful read
    pub busy_polls: u8,
    /// Never finish a conversion
    pub stuck: bool,
    pending: u8,
    pub reads: u32,
}

impl ScriptedAdc {
    pub fn new(thermistor_raw: RawSample, gas_raw: RawSample) -> Self {
        let mut adc = Self::default();
        adc.set(thermistor_raw, gas_raw);
        adc
    }

    pub fn set(&mut self, thermistor_raw: RawSample, gas_raw: RawSample) {
        self.values.insert(THERMISTOR_ADC_CHANNEL, thermistor_raw);
        self.values.insert(GAS_ADC_CHANNEL, gas_raw);
    }

    pub fn fail_channel(&mut self, channel: Option<u8>) {
        self.failing = channel;
    }
}

impl AnalogInput for ScriptedAdc {
    fn read(&mut self, channel: u8) -> nb::Result<RawSample, SampleError> {
        if self.failing == Some(channel) {
            return Err(nb::Error::Other(SampleError::ReadFailed { channel }));
        }

        if self.stuck {
            return Err(nb::Error::WouldBlock);
        }

        if self.pending < self.busy_polls {
            self.pending += 1;
            return Err(nb::Error::WouldBlock);
        }
        self.pending = 0;
        self.reads += 1;

        self.values
            .get(&channel)
            .copied()
            .ok_or(nb::Error::Other(SampleError::InvalidChannel { channel }))
    }
}

/// Output pins with write history
#[derive(Default)]
pub struct PinBank {
    pub levels: HashMap<u8, bool>,
    pub writes: Vec<(u8, bool)>,
}

impl PinBank {
    pub fn level(&self, pin: u8) -> bool {
        self.levels.get(&pin).copied().unwrap_or(false)
    }

    /// (alarm LED, status LED, buzzer)
    pub fn actuators(&self) -> (bool, bool, bool) {
        (
            self.level(ALARM_LED_PIN),
            self.level(STATUS_LED_PIN),
            self.level(BUZZER_PIN),
        )
    }
}

impl DigitalOutput for PinBank {
    fn set(&mut self, pin: u8, high: bool) {
        self.levels.insert(pin, high);
        self.writes.push((pin, high));
    }
}

/// Message as seen by the in-memory broker
#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    pub topic: String,
    pub payload: String,
    pub qos: QoS,
    pub retain: bool,
}

/// Shared broker state the test can inspect and manipulate
#[derive(Debug)]
pub struct BrokerState {
    pub accept_connects: bool,
    pub reject_publishes: bool,
    pub alive: bool,
    pub connects: u32,
    pub published: Vec<Published>,
}

impl Default for BrokerState {
    fn default() -> Self {
        Self {
            accept_connects: true,
            reject_publishes: false,
            alive: false,
            connects: 0,
            published: Vec::new(),
        }
    }
}

pub type Broker = Rc<RefCell<BrokerState>>;

pub fn broker() -> Broker {
    Rc::new(RefCell::new(BrokerState::default()))
}

pub struct MockConnector {
    broker: Broker,
}

impl MockConnector {
    pub fn new(broker: &Broker) -> Self {
        Self {
            broker: Rc::clone(broker),
        }
    }
}

impl Connector for MockConnector {
    type Session = MockSession;

    fn connect(&mut self) -> Result<Self::Session, ConnectError> {
        let mut state = self.broker.borrow_mut();
        if !state.accept_connects {
            return Err(ConnectError::Transport {
                reason: "connection refused",
            });
        }

        state.connects += 1;
        state.alive = true;
        Ok(MockSession {
            broker: Rc::clone(&self.broker),
        })
    }
}

pub struct MockSession {
    broker: Broker,
}

impl Session for MockSession {
    fn is_alive(&mut self) -> bool {
        self.broker.borrow().alive
    }

    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), PublishError> {
        let mut state = self.broker.borrow_mut();
        if !state.alive {
            return Err(PublishError::Transport {
                reason: "connection closed",
            });
        }
        if state.reject_publishes {
            return Err(PublishError::Rejected {
                reason: "quota exceeded",
            });
        }

        state.published.push(Published {
            topic: topic.to_string(),
            payload: String::from_utf8(payload.to_vec()).expect("payload is UTF-8"),
            qos,
            retain,
        });
        Ok(())
    }
}

/// Delay that records instead of sleeping
#[derive(Default)]
pub struct CountingDelay {
    pub total_ms: u64,
}

impl DelayMs for CountingDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += u64::from(ms);
    }
}

/// Delay that records each sleep and panics on the `limit`-th one
///
/// The only way out of `Monitor::run`, which never returns.
pub struct StoppingDelay {
    pub sleeps: Rc<RefCell<Vec<u32>>>,
    pub limit: usize,
}

impl DelayMs for StoppingDelay {
    fn delay_ms(&mut self, ms: u32) {
        let count = {
            let mut sleeps = self.sleeps.borrow_mut();
            sleeps.push(ms);
            sleeps.len()
        };
        if count >= self.limit {
            panic!("stopping after {} sleeps", count);
        }
    }
}
