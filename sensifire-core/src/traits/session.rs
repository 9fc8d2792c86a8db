//! Pub/Sub Session Traits
//!
//! A [`Connector`] knows how to reach the broker; each successful
//! [`Connector::connect`] yields a fresh [`Session`]. Sessions are never
//! repaired in place: once one reports itself dead it is dropped and the
//! session manager asks the connector for a new one.

use crate::{
    errors::{ConnectError, PublishError},
    telemetry::QoS,
};

/// One live connection to the broker
pub trait Session {
    /// Whether the transport still looks healthy
    ///
    /// Must not block beyond servicing already-pending network events.
    /// Once this returns `false` it keeps returning `false`.
    fn is_alive(&mut self) -> bool;

    /// Publish `payload` to `topic`
    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), PublishError>;
}

/// Factory for sessions to a fixed broker
pub trait Connector {
    /// Session type produced on success
    type Session: Session;

    /// Open a session, blocking for at most the connector's own timeout
    fn connect(&mut self) -> Result<Self::Session, ConnectError>;
}
