//! Errors raised by the bundled I2C accelerometer sources.
//!
//! The numeric pipeline itself cannot fail; only talking to hardware can.
//! The same types serve both the blocking and the async driver, since
//! both bus flavours share `embedded_hal::i2c::ErrorType`.

use core::fmt::{Debug, Formatter};
use embedded_hal::i2c::ErrorType;

/// Error during initialization of an accelerometer. Hands the bus back so
/// the caller can retry or reuse it.
pub struct InitError<I>
where
    I: ErrorType,
{
    pub i2c: I,
    pub error: Error<I::Error>,
}

impl<I> Debug for InitError<I>
where
    I: ErrorType,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        self.error.fmt(f)
    }
}

/// Bus error while reading or configuring the accelerometer.
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Error<E> {
    /// A register write failed
    WriteError(E),
    /// A register read (write-then-read) failed
    WriteReadError(E),
}

impl<E> Debug for Error<E>
where
    E: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::WriteReadError(e) => f.debug_tuple("WriteReadError").field(e).finish(),
            Self::WriteError(e) => f.debug_tuple("WriteError").field(e).finish(),
        }
    }
}
