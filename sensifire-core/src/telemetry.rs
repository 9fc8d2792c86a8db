//! Telemetry Publisher
//!
//! ## Wire Format
//!
//! One UTF-8 text message per cycle, no trailing newline:
//!
//! ```text
//! {"temperature": 23.46, "co": 5.00}
//! ```
//!
//! Both values are rounded to two decimals. The message is formatted into a
//! fixed 128-byte stack buffer; a reading whose text would not fit is
//! rejected with [`PublishError::PayloadOverflow`] rather than truncated
//! into invalid JSON.
//!
//! ## Delivery
//!
//! QoS 1 (at-least-once), retain off. A failed publish is reported and the
//! reading is dropped. There is no queue: the next cycle publishes a fresh
//! reading.

use core::fmt::Write;

use heapless::String;

use crate::{
    constants::network::{PAYLOAD_CAPACITY, TELEMETRY_TOPIC},
    errors::PublishError,
    reading::PhysicalReading,
    session::SessionManager,
    traits::Connector,
};

/// Fixed-capacity payload buffer
pub type TelemetryPayload = String<PAYLOAD_CAPACITY>;

/// Delivery guarantee tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QoS {
    /// QoS 0, at most once
    AtMostOnce,
    /// QoS 1, at least once
    AtLeastOnce,
    /// QoS 2, exactly once
    ExactlyOnce,
}

impl QoS {
    /// Numeric level as carried on the wire
    pub const fn level(&self) -> u8 {
        match self {
            QoS::AtMostOnce => 0,
            QoS::AtLeastOnce => 1,
            QoS::ExactlyOnce => 2,
        }
    }
}

/// Where and how readings are published
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishOptions {
    /// Destination topic
    pub topic: &'static str,
    /// Delivery tier
    pub qos: QoS,
    /// Broker retains the last message
    pub retain: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            topic: TELEMETRY_TOPIC,
            qos: QoS::AtLeastOnce,
            retain: false,
        }
    }
}

/// Format a reading into the telemetry payload
pub fn encode_payload(reading: &PhysicalReading) -> Result<TelemetryPayload, PublishError> {
    if !reading.is_finite() {
        return Err(PublishError::InvalidReading);
    }

    let mut payload = TelemetryPayload::new();
    write!(
        payload,
        "{{\"temperature\": {:.2}, \"co\": {:.2}}}",
        reading.temperature_celsius, reading.gas_resistance
    )
    .map_err(|_| PublishError::PayloadOverflow {
        capacity: PAYLOAD_CAPACITY,
    })?;

    Ok(payload)
}

/// Serializes readings and pushes them through the session manager
#[derive(Debug, Clone, Copy, Default)]
pub struct TelemetryPublisher {
    options: PublishOptions,
}

impl TelemetryPublisher {
    /// Publisher with explicit options
    pub const fn new(options: PublishOptions) -> Self {
        Self { options }
    }

    /// Options in use
    pub fn options(&self) -> &PublishOptions {
        &self.options
    }

    /// Publish one reading over whatever session the manager currently holds
    pub fn publish<C: Connector>(
        &self,
        sessions: &mut SessionManager<C>,
        reading: &PhysicalReading,
    ) -> Result<(), PublishError> {
        let payload = encode_payload(reading)?;
        let opts = &self.options;

        match sessions.publish(opts.topic, payload.as_bytes(), opts.qos, opts.retain) {
            Ok(()) => {
                log_info!("Published: {}", payload.as_str());
                Ok(())
            }
            Err(e) => {
                log_error!("Publish failed: {}", e);
                Err(e)
            }
        }
    }
}
