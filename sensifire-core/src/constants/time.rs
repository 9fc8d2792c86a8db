//! Cycle Cadence and Boundary Timeouts

/// Sleep between monitoring cycles (milliseconds).
///
/// 1 Hz is enough for a smoke/gas alarm and keeps the broker load trivial.
pub const CYCLE_INTERVAL_MS: u32 = 1000;

/// Upper bound on a reconnect attempt inside a cycle (milliseconds).
///
/// A stalled handshake delays the actuator update of that cycle by at most
/// this much.
pub const CONNECT_TIMEOUT_MS: u32 = 3000;

/// Upper bound on waiting for a QoS 1 acknowledgement (milliseconds).
pub const PUBLISH_ACK_TIMEOUT_MS: u32 = 2000;

/// Polls of a busy ADC before the read is abandoned.
///
/// A one-shot conversion finishes within a few polls; a converter that is
/// still busy after this many is treated as failed and the cycle alarms.
pub const ADC_MAX_POLLS: u32 = 10_000;

/// MQTT keep-alive interval (seconds).
pub const KEEP_ALIVE_SECS: u16 = 30;
