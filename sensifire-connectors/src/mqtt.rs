//! MQTT connector over `rumqttc`
//!
//! Uses the blocking [`rumqttc::Client`]. The paired [`Connection`] is the
//! event loop: nothing reaches the wire unless it is polled, so every
//! operation here pumps it with a deadline.
//!
//! ```text
//! connect:  Client::new ─▶ poll until CONNACK      (connect_timeout)
//! publish:  try_publish ─▶ poll until PUBACK(pkid) (ack_timeout)
//! is_alive: drain pending events                    (poll_window each)
//! ```
//!
//! A transport error seen on any poll marks the session dead for good; the
//! monitoring loop then replaces it with a fresh one.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rumqttc::{
    Client, ConnectReturnCode, Connection, ConnectionError, Event, MqttOptions, Outgoing, Packet,
};
use sensifire_core::{
    constants::{
        network::{BROKER_HOST, BROKER_PORT, CLIENT_ID},
        time::{CONNECT_TIMEOUT_MS, KEEP_ALIVE_SECS, PUBLISH_ACK_TIMEOUT_MS},
    },
    ConnectError, Connector, PublishError, QoS, Session,
};

use crate::ConnectorError;

/// Longest client identifier every MQTT 3.1.1 broker must accept
const MAX_CLIENT_ID_LEN: usize = 23;

/// Outstanding requests buffered between `Client` and `Connection`
const REQUEST_CAPACITY: usize = 10;

/// How long `is_alive` waits for each pending event
const POLL_WINDOW_MS: u64 = 5;

/// Upper bound on events drained by one liveness check
const MAX_DRAINED_EVENTS: usize = 32;

/// Broker endpoint and session timing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttConfig {
    /// Broker host name or IP address
    pub host: String,
    /// Broker TCP port
    pub port: u16,
    /// MQTT client identifier
    pub client_id: String,
    /// Keep-alive interval
    pub keep_alive: Duration,
    /// Bound on the CONNACK wait
    pub connect_timeout: Duration,
    /// Bound on the PUBACK wait
    pub ack_timeout: Duration,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self::new(BROKER_HOST, BROKER_PORT)
    }
}

impl MqttConfig {
    /// Config for `host:port` with default identity and timings
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            client_id: CLIENT_ID.to_string(),
            keep_alive: Duration::from_secs(u64::from(KEEP_ALIVE_SECS)),
            connect_timeout: Duration::from_millis(u64::from(CONNECT_TIMEOUT_MS)),
            ack_timeout: Duration::from_millis(u64::from(PUBLISH_ACK_TIMEOUT_MS)),
        }
    }

    /// Set client identifier
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = id.into();
        self
    }

    /// Set keep-alive interval
    pub fn keep_alive_secs(mut self, secs: u16) -> Self {
        self.keep_alive = Duration::from_secs(u64::from(secs));
        self
    }

    /// Set CONNACK timeout
    pub fn connect_timeout_ms(mut self, ms: u32) -> Self {
        self.connect_timeout = Duration::from_millis(u64::from(ms));
        self
    }

    /// Set PUBACK timeout
    pub fn ack_timeout_ms(mut self, ms: u32) -> Self {
        self.ack_timeout = Duration::from_millis(u64::from(ms));
        self
    }

    /// Reject values `rumqttc` or the broker would refuse
    pub fn validate(&self) -> Result<(), ConnectorError> {
        if self.host.trim().is_empty() {
            return Err(ConnectorError::ConfigError("broker host is empty".into()));
        }
        if self.port == 0 {
            return Err(ConnectorError::ConfigError("broker port is 0".into()));
        }
        if self.client_id.is_empty() || self.client_id.len() > MAX_CLIENT_ID_LEN {
            return Err(ConnectorError::ConfigError(format!(
                "client id must be 1-{} bytes, got {}",
                MAX_CLIENT_ID_LEN,
                self.client_id.len()
            )));
        }
        if !self.keep_alive.is_zero() && self.keep_alive < Duration::from_secs(1) {
            return Err(ConnectorError::ConfigError(
                "keep-alive must be 0 or at least 1 s".into(),
            ));
        }
        if self.connect_timeout.is_zero() || self.ack_timeout.is_zero() {
            return Err(ConnectorError::ConfigError("timeouts must be non-zero".into()));
        }
        Ok(())
    }

    fn options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(self.client_id.as_str(), self.host.as_str(), self.port);
        options.set_keep_alive(self.keep_alive);
        options.set_clean_session(true);
        options
    }
}

/// Opens [`MqttSession`]s against one broker
#[derive(Debug, Clone)]
pub struct MqttConnector {
    config: MqttConfig,
}

impl MqttConnector {
    /// Connector for the given broker
    pub fn new(config: MqttConfig) -> Self {
        Self { config }
    }

    /// Broker configuration
    pub fn config(&self) -> &MqttConfig {
        &self.config
    }
}

impl Connector for MqttConnector {
    type Session = MqttSession;

    fn connect(&mut self) -> Result<MqttSession, ConnectError> {
        if self.config.validate().is_err() {
            return Err(ConnectError::InvalidBroker);
        }

        debug!(
            "Connecting to {}:{} as {}",
            self.config.host, self.config.port, self.config.client_id
        );

        let (client, mut connection) = Client::new(self.config.options(), REQUEST_CAPACITY);
        let timeout_ms = millis(self.config.connect_timeout);
        let deadline = Instant::now() + self.config.connect_timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(ConnectError::Timeout { timeout_ms });
            }

            match connection.recv_timeout(remaining) {
                Ok(Ok(Event::Incoming(Packet::ConnAck(ack)))) => {
                    if ack.code != ConnectReturnCode::Success {
                        return Err(ConnectError::Refused {
                            code: return_code(ack.code),
                        });
                    }
                    info!("Connected to {}:{}", self.config.host, self.config.port);
                    return Ok(MqttSession {
                        client,
                        connection,
                        ack_timeout: self.config.ack_timeout,
                        alive: true,
                    });
                }
                Ok(Ok(_)) => {}
                Ok(Err(ConnectionError::ConnectionRefused(code))) => {
                    return Err(ConnectError::Refused {
                        code: return_code(code),
                    });
                }
                Ok(Err(e)) => {
                    debug!("Connect failed: {}", e);
                    return Err(ConnectError::Transport {
                        reason: describe(&e),
                    });
                }
                Err(_) => return Err(ConnectError::Timeout { timeout_ms }),
            }
        }
    }
}

/// One live broker session
pub struct MqttSession {
    client: Client,
    connection: Connection,
    ack_timeout: Duration,
    alive: bool,
}

impl MqttSession {
    fn mark_dead(&mut self, reason: &'static str) {
        if self.alive {
            warn!("MQTT session lost: {}", reason);
        }
        self.alive = false;
    }

    /// Handle one polled event; `false` if it ended the session
    fn observe(&mut self, event: &Event) -> bool {
        if let Event::Incoming(Packet::Disconnect) = event {
            self.mark_dead("broker sent DISCONNECT");
            return false;
        }
        true
    }
}

impl Session for MqttSession {
    fn is_alive(&mut self) -> bool {
        for _ in 0..MAX_DRAINED_EVENTS {
            if !self.alive {
                break;
            }
            match self
                .connection
                .recv_timeout(Duration::from_millis(POLL_WINDOW_MS))
            {
                Ok(Ok(event)) => {
                    self.observe(&event);
                }
                Ok(Err(e)) => self.mark_dead(describe(&e)),
                // Nothing pending
                Err(_) => break,
            }
        }
        self.alive
    }

    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), PublishError> {
        if !self.alive {
            return Err(PublishError::NotConnected);
        }

        self.client
            .try_publish(topic, to_mqtt_qos(qos), retain, payload.to_vec())
            .map_err(|e| {
                debug!("Publish request refused: {}", e);
                PublishError::Rejected {
                    reason: "request not accepted by client",
                }
            })?;

        let timeout_ms = millis(self.ack_timeout);
        let deadline = Instant::now() + self.ack_timeout;
        let mut pkid = None;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(PublishError::AckTimeout { timeout_ms });
            }

            match self.connection.recv_timeout(remaining) {
                Ok(Ok(Event::Outgoing(Outgoing::Publish(id)))) => {
                    if qos == QoS::AtMostOnce {
                        return Ok(());
                    }
                    pkid = Some(id);
                }
                Ok(Ok(Event::Incoming(Packet::PubAck(ack))))
                    if qos == QoS::AtLeastOnce && Some(ack.pkid) == pkid =>
                {
                    return Ok(());
                }
                Ok(Ok(Event::Incoming(Packet::PubComp(comp))))
                    if qos == QoS::ExactlyOnce && Some(comp.pkid) == pkid =>
                {
                    return Ok(());
                }
                Ok(Ok(event)) => {
                    if !self.observe(&event) {
                        return Err(PublishError::Transport {
                            reason: "broker sent DISCONNECT",
                        });
                    }
                }
                Ok(Err(e)) => {
                    let reason = describe(&e);
                    self.mark_dead(reason);
                    return Err(PublishError::Transport { reason });
                }
                Err(_) => return Err(PublishError::AckTimeout { timeout_ms }),
            }
        }
    }
}

fn to_mqtt_qos(qos: QoS) -> rumqttc::QoS {
    match qos {
        QoS::AtMostOnce => rumqttc::QoS::AtMostOnce,
        QoS::AtLeastOnce => rumqttc::QoS::AtLeastOnce,
        QoS::ExactlyOnce => rumqttc::QoS::ExactlyOnce,
    }
}

/// CONNACK return code as sent on the wire
fn return_code(code: ConnectReturnCode) -> u8 {
    match code {
        ConnectReturnCode::Success => 0,
        ConnectReturnCode::RefusedProtocolVersion => 1,
        ConnectReturnCode::BadClientId => 2,
        ConnectReturnCode::ServiceUnavailable => 3,
        ConnectReturnCode::BadUserNamePassword => 4,
        ConnectReturnCode::NotAuthorized => 5,
        #[allow(unreachable_patterns)]
        _ => u8::MAX,
    }
}

fn describe(e: &ConnectionError) -> &'static str {
    match e {
        ConnectionError::Io(_) => "network I/O error",
        ConnectionError::NetworkTimeout => "network timeout",
        ConnectionError::FlushTimeout => "flush timeout",
        ConnectionError::MqttState(_) => "protocol state error",
        ConnectionError::ConnectionRefused(_) => "connection refused",
        ConnectionError::NotConnAck(_) => "expected CONNACK",
        ConnectionError::RequestsDone => "request channel closed",
        #[allow(unreachable_patterns)]
        _ => "transport error",
    }
}

fn millis(d: Duration) -> u32 {
    u32::try_from(d.as_millis()).unwrap_or(u32::MAX)
}
