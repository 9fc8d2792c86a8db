//! Session Manager
//!
//! Owns the one pub/sub session of the node and nothing else may hold it.
//! The rest of the system can ask whether the session is alive, ask for a
//! (re)connect, and ask for a publish.
//!
//! ## State Machine
//!
//! ```text
//!                connect() ok
//!   ┌──────────────┐ ───────────▶ ┌───────────┐
//!   │ Disconnected │              │ Connected │
//!   └──────────────┘ ◀─────────── └───────────┘
//!     ▲        │      is_alive() == false
//!     └────────┘
//!   connect() err
//! ```
//!
//! There is no terminal state. A failed connect is logged and left alone:
//! the manager never schedules its own retry, the monitoring loop simply
//! calls `connect()` again on its next cycle.

use crate::{
    errors::{ConnectError, PublishError},
    telemetry::QoS,
    traits::{Connector, Session},
};

/// Connection state of the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// No usable session
    Disconnected,
    /// A session is held and was alive when last checked
    Connected,
}

/// Opaque identity of one established session
///
/// Each successful connect mints a new id, so a reconnect is visible as a
/// changed handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionHandle {
    id: u32,
}

impl SessionHandle {
    /// Sequence number of the session, starting at 1
    pub const fn id(&self) -> u32 {
        self.id
    }
}

/// Lifecycle owner of the broker session
pub struct SessionManager<C: Connector> {
    connector: C,
    session: Option<C::Session>,
    handle: Option<SessionHandle>,
    next_id: u32,
    reconnections: u32,
}

impl<C: Connector> SessionManager<C> {
    /// Manager in the `Disconnected` state
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            session: None,
            handle: None,
            next_id: 1,
            reconnections: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        if self.session.is_some() {
            SessionState::Connected
        } else {
            SessionState::Disconnected
        }
    }

    /// Handle of the held session, if any
    pub fn handle(&self) -> Option<SessionHandle> {
        self.handle
    }

    /// Successful connects after the first one
    pub fn reconnections(&self) -> u32 {
        self.reconnections
    }

    /// Whether a live session is held
    ///
    /// A session that reports itself dead is dropped here and the manager
    /// falls back to `Disconnected`.
    pub fn is_alive(&mut self) -> bool {
        let alive = match self.session.as_mut() {
            Some(session) => session.is_alive(),
            None => return false,
        };

        if !alive {
            if let Some(handle) = self.handle {
                log_warn!("Session {} dropped", handle.id());
            }
            self.invalidate();
        }
        alive
    }

    /// Open a new session, replacing any held one
    ///
    /// On failure the state stays `Disconnected` and the error is returned
    /// after being logged.
    pub fn connect(&mut self) -> Result<SessionHandle, ConnectError> {
        self.invalidate();

        match self.connector.connect() {
            Ok(session) => {
                let handle = SessionHandle { id: self.next_id };
                if handle.id > 1 {
                    self.reconnections = self.reconnections.saturating_add(1);
                }
                self.next_id = self.next_id.wrapping_add(1).max(1);
                self.session = Some(session);
                self.handle = Some(handle);

                log_info!("Connected to broker (session {})", handle.id());
                Ok(handle)
            }
            Err(e) => {
                log_error!("Error connecting to broker: {}", e);
                Err(e)
            }
        }
    }

    /// Publish over the held session
    pub fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), PublishError> {
        match self.session.as_mut() {
            Some(session) => session.publish(topic, payload, qos, retain),
            None => Err(PublishError::NotConnected),
        }
    }

    /// Connector used to open sessions
    pub fn connector(&self) -> &C {
        &self.connector
    }

    fn invalidate(&mut self) {
        self.session = None;
        self.handle = None;
    }
}
