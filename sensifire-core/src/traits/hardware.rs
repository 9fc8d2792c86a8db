//! Hardware Collaborator Traits
//!
//! ADC reads use `nb::Result` like the embedded-hal one-shot ADC API: a
//! conversion in progress answers `WouldBlock` and the caller decides how to
//! wait.
//!
//! ```rust
//! use sensifire_core::traits::AnalogInput;
//! use sensifire_core::{RawSample, SampleError};
//!
//! struct FixedAdc(RawSample);
//!
//! impl AnalogInput for FixedAdc {
//!     fn read(&mut self, _channel: u8) -> nb::Result<RawSample, SampleError> {
//!         Ok(self.0)
//!     }
//! }
//!
//! let mut adc = FixedAdc(2048);
//! assert_eq!(nb::block!(adc.read(0)), Ok(2048));
//! ```

use crate::{errors::SampleError, reading::RawSample};

/// Source of raw analog samples
pub trait AnalogInput {
    /// Start or poll a conversion on `channel`
    ///
    /// Returns:
    /// - `Ok(raw)` - conversion finished, `raw` in `0..=ADC_MAX`
    /// - `Err(nb::Error::WouldBlock)` - conversion still running
    /// - `Err(nb::Error::Other(e))` - the read failed
    fn read(&mut self, channel: u8) -> nb::Result<RawSample, SampleError>;
}

/// Binary output pins, active-high
///
/// Writes cannot fail at this layer. An implementation that can detect a
/// fault logs it and carries on; the next cycle re-asserts every pin anyway.
pub trait DigitalOutput {
    /// Drive `pin` high (`true`) or low (`false`)
    fn set(&mut self, pin: u8, high: bool);
}

/// Blocking millisecond delay
pub trait DelayMs {
    /// Sleep for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}
