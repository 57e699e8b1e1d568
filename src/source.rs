//! Where raw readings come from.
//!
//! The pipeline only needs "give me the current 3-axis reading in g". Any
//! type can provide that by implementing [`AccelerationSource`]; an I2C
//! driver for MPU-style accelerometers and a closure adapter are included.

use core::convert::Infallible;

use embedded_hal::i2c::I2c;

use crate::{
    accel::RawAccel,
    error::{Error, InitError},
    vector::Vector3,
};

/// Default 7-bit bus address (AD0 pin low).
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// Power management register, bit 6 puts the part to sleep.
pub(crate) const REG_PWR_MGMT_1: u8 = 0x6B;
pub(crate) const SLEEP_BIT: u8 = 1 << 6;
/// First of six acceleration output registers (X high byte).
pub(crate) const REG_ACCEL_XOUT_H: u8 = 0x3B;

/// Supplier of raw 3-axis readings, components in g.
pub trait AccelerationSource {
    type Error;

    fn read(&mut self) -> Result<Vector3, Self::Error>;
}

/// Closure-backed source, handy for replaying recorded data or for tests.
pub struct FnSource<F>(pub F);

impl<F> AccelerationSource for FnSource<F>
where
    F: FnMut() -> Vector3,
{
    type Error = Infallible;

    fn read(&mut self) -> Result<Vector3, Infallible> {
        Ok((self.0)())
    }
}

/// Wrap a closure as an [`AccelerationSource`].
pub fn from_fn<F>(f: F) -> FnSource<F>
where
    F: FnMut() -> Vector3,
{
    FnSource(f)
}

/// Blocking driver for an MPU-style accelerometer on I2C.
pub struct I2cAccelerometer<I>
where
    I: I2c,
{
    i2c: I,
    address: u8,
}

impl<I> I2cAccelerometer<I>
where
    I: I2c,
{
    /// Take ownership of the bus and wake the device up.
    pub fn new(i2c: I, address: u8) -> Result<Self, InitError<I>> {
        let mut sensor = Self { i2c, address };

        if let Err(error) = sensor.disable_sleep() {
            Err(InitError {
                error,
                i2c: sensor.i2c,
            })
        } else {
            Ok(sensor)
        }
    }

    /// Returns the underlying I2C peripheral, consuming this driver.
    pub fn release(self) -> I {
        self.i2c
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Error<I::Error>> {
        self.i2c
            .write_read(self.address, &[reg], buf)
            .map_err(Error::WriteReadError)
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error<I::Error>> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(Error::WriteError)
    }

    pub fn disable_sleep(&mut self) -> Result<(), Error<I::Error>> {
        let mut value = [0; 1];
        self.read_registers(REG_PWR_MGMT_1, &mut value)?;
        self.write_register(REG_PWR_MGMT_1, value[0] & !SLEEP_BIT)
    }

    /// Raw signed 16-bit sample.
    pub fn raw(&mut self) -> Result<RawAccel, Error<I::Error>> {
        let mut data = [0; 6];
        self.read_registers(REG_ACCEL_XOUT_H, &mut data)?;
        Ok(RawAccel::from_bytes(data))
    }
}

impl<I> AccelerationSource for I2cAccelerometer<I>
where
    I: I2c,
{
    type Error = Error<I::Error>;

    fn read(&mut self) -> Result<Vector3, Self::Error> {
        Ok(self.raw()?.normalized())
    }
}
