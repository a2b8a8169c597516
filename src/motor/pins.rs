//! Placeholder for optional driver lines.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};

/// An output line that is not wired.
///
/// Used as the type of an absent direction or enable line. Writes are no-ops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
