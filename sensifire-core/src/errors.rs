//! Error Types for the Monitoring Cycle
//!
//! ## Design Philosophy
//!
//! Errors travel through the hot loop of a microcontroller, so they follow
//! the same rules as the rest of the core:
//!
//! 1. **Small and Copy**: every variant is a few bytes of inline data.
//! 2. **No Heap Allocation**: messages are `&'static str`, never `String`.
//! 3. **Never Fatal**: no error stops the loop. Each category has a fixed
//!    local recovery described below.
//!
//! ## Error Categories
//!
//! | error | raised by | recovery |
//! |---|---|---|
//! | `SampleError` | ADC collaborator | cycle forced to ALARM, publish skipped |
//! | `ConversionError` | unit converter | cycle forced to ALARM, publish skipped |
//! | `ConnectError` | session manager | logged, retried next cycle |
//! | `PublishError` | telemetry publisher | logged, reading dropped |
//!
//! ```rust
//! use sensifire_core::{ConversionError, UnitConverter};
//!
//! let converter = UnitConverter::default();
//! match converter.to_gas_resistance(0) {
//!     Ok(_) => unreachable!(),
//!     Err(ConversionError::ZeroSample) => {
//!         // Open circuit or dead ADC: treat as dangerous
//!     }
//!     Err(_) => {}
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for unit conversion
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Raw sample could not be turned into a physical value
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionError {
    /// A zero sample puts a zero in the divider's denominator
    #[error("Raw sample is zero, divider voltage undefined")]
    ZeroSample,

    /// Sample larger than the ADC full-scale value
    #[error("Raw sample {raw} exceeds ADC full scale {max}")]
    OutOfRange {
        /// The offending sample
        raw: u16,
        /// ADC full-scale value
        max: u16,
    },

    /// Full-scale thermistor sample means zero resistance; ln(0) is undefined
    #[error("Thermistor saturated at full scale")]
    SaturatedThermistor,

    /// Arithmetic produced NaN or infinity
    #[error("Conversion produced a non-finite value")]
    NonFinite,
}

/// The sampling collaborator failed to deliver a raw value
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleError {
    /// ADC conversion did not complete
    #[error("ADC read failed on channel {channel}")]
    ReadFailed {
        /// Analog input channel
        channel: u8,
    },

    /// Channel is not wired to an analog input
    #[error("Channel {channel} is not an analog input")]
    InvalidChannel {
        /// Requested channel
        channel: u8,
    },

    /// Conversion still busy after the poll limit
    #[error("ADC channel {channel} still busy after {polls} polls")]
    Timeout {
        /// Analog input channel
        channel: u8,
        /// Polls attempted
        polls: u32,
    },
}

/// Session establishment failed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectError {
    /// Broker address could not be resolved or parsed
    #[error("Invalid broker address")]
    InvalidBroker,

    /// Broker answered the handshake with a refusal code
    #[error("Broker refused connection (code {code})")]
    Refused {
        /// Protocol return code
        code: u8,
    },

    /// Network-level failure before the handshake completed
    #[error("Transport error: {reason}")]
    Transport {
        /// Short description of the failure
        reason: &'static str,
    },

    /// No acknowledgement within the connect timeout
    #[error("Connect timed out after {timeout_ms} ms")]
    Timeout {
        /// Timeout that expired
        timeout_ms: u32,
    },
}

/// A telemetry publish did not go through
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishError {
    /// No live session to publish on
    #[error("Not connected")]
    NotConnected,

    /// Formatted payload would not fit the fixed buffer
    #[error("Payload exceeds {capacity} byte buffer")]
    PayloadOverflow {
        /// Buffer capacity in bytes
        capacity: usize,
    },

    /// Reading holds NaN or infinity and cannot be serialized
    #[error("Reading is not finite")]
    InvalidReading,

    /// Client or broker refused the message
    #[error("Publish rejected: {reason}")]
    Rejected {
        /// Short description of the refusal
        reason: &'static str,
    },

    /// Connection failed while the message was in flight
    #[error("Transport error: {reason}")]
    Transport {
        /// Short description of the failure
        reason: &'static str,
    },

    /// QoS 1 acknowledgement did not arrive in time
    #[error("No acknowledgement within {timeout_ms} ms")]
    AckTimeout {
        /// Timeout that expired
        timeout_ms: u32,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConversionError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ZeroSample => defmt::write!(fmt, "Zero sample"),
            Self::OutOfRange { raw, max } => defmt::write!(fmt, "Sample {} > {}", raw, max),
            Self::SaturatedThermistor => defmt::write!(fmt, "Thermistor saturated"),
            Self::NonFinite => defmt::write!(fmt, "Non-finite value"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SampleError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ReadFailed { channel } => defmt::write!(fmt, "ADC read failed ch{}", channel),
            Self::InvalidChannel { channel } => defmt::write!(fmt, "Invalid channel {}", channel),
            Self::Timeout { channel, polls } => {
                defmt::write!(fmt, "ADC ch{} busy after {} polls", channel, polls)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConnectError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidBroker => defmt::write!(fmt, "Invalid broker"),
            Self::Refused { code } => defmt::write!(fmt, "Refused ({})", code),
            Self::Transport { reason } => defmt::write!(fmt, "Transport: {}", reason),
            Self::Timeout { timeout_ms } => defmt::write!(fmt, "Timeout {} ms", timeout_ms),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PublishError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NotConnected => defmt::write!(fmt, "Not connected"),
            Self::PayloadOverflow { capacity } => defmt::write!(fmt, "Payload > {} bytes", capacity),
            Self::InvalidReading => defmt::write!(fmt, "Invalid reading"),
            Self::Rejected { reason } => defmt::write!(fmt, "Rejected: {}", reason),
            Self::Transport { reason } => defmt::write!(fmt, "Transport: {}", reason),
            Self::AckTimeout { timeout_ms } => defmt::write!(fmt, "No ack in {} ms", timeout_ms),
        }
    }
}
