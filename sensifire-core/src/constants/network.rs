//! Broker Target and Telemetry Limits
//!
//! The telemetry channel is plain TCP without credentials.

/// Broker host name.
pub const BROKER_HOST: &str = "broker.hivemq.com";

/// Broker TCP port (plain MQTT).
pub const BROKER_PORT: u16 = 1883;

/// Topic every reading is published to.
pub const TELEMETRY_TOPIC: &str = "environment/sensordata";

/// Client identifier announced to the broker.
pub const CLIENT_ID: &str = "sensifire-node";

/// Size of the payload buffer (bytes). Payloads never exceed it.
pub const PAYLOAD_CAPACITY: usize = 128;
