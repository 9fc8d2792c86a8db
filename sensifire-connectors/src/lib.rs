//! Broker Connectors for SensiFire Nodes
//!
//! ## Overview
//!
//! `sensifire-core` talks to the network only through its
//! [`Connector`](sensifire_core::Connector) and
//! [`Session`](sensifire_core::Session) traits. This crate provides the
//! implementation a deployed node uses: a plain-TCP MQTT 3.1.1 client.
//!
//! ### MQTT
//!
//! **Characteristics:**
//! - One persistent session, re-established by the monitoring loop when it drops
//! - QoS 1 telemetry: a publish succeeds only once the broker acknowledges it
//! - Every blocking step is bounded (CONNACK wait, PUBACK wait, liveness poll)
//!
//! **Not provided:**
//! - TLS, authentication, subscriptions
//! - Buffering: a reading that cannot be published is dropped
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use sensifire_connectors::{MqttConfig, MqttConnector};
//! use sensifire_core::SessionManager;
//!
//! let config = MqttConfig::new("broker.hivemq.com", 1883)
//!     .client_id("sensifire-kitchen")
//!     .connect_timeout_ms(3_000);
//! config.validate()?;
//!
//! let mut sessions = SessionManager::new(MqttConnector::new(config));
//! if let Err(e) = sessions.connect() {
//!     eprintln!("broker unreachable: {e}");
//! }
//! # Ok::<(), sensifire_connectors::ConnectorError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "mqtt")]
pub mod mqtt;

// Re-export common types
#[cfg(feature = "mqtt")]
pub use mqtt::{MqttConfig, MqttConnector, MqttSession};

use thiserror::Error;

/// Connector setup errors
///
/// Runtime failures surface as the core's `ConnectError`/`PublishError`; this
/// type only covers configuration rejected before any connection is tried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    /// A configuration value is unusable
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
