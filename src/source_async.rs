//! Asynchronous counterpart of [`source`](crate::source).
//!
//! Mirrors the blocking trait and I2C driver on top of `embedded-hal-async`,
//! for applications running under an async executor.

use embedded_hal_async::i2c::I2c;

use crate::{
    accel::RawAccel,
    error::{Error, InitError},
    source::{REG_ACCEL_XOUT_H, REG_PWR_MGMT_1, SLEEP_BIT},
    vector::Vector3,
};

/// Supplier of raw 3-axis readings, components in g.
#[allow(async_fn_in_trait)]
pub trait AsyncAccelerationSource {
    type Error;

    async fn read(&mut self) -> Result<Vector3, Self::Error>;
}

/// Async driver for an MPU-style accelerometer on I2C.
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
    pub async fn new(i2c: I, address: u8) -> Result<Self, InitError<I>> {
        let mut sensor = Self { i2c, address };

        if let Err(error) = sensor.disable_sleep().await {
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

    async fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Error<I::Error>> {
        self.i2c
            .write_read(self.address, &[reg], buf)
            .await
            .map_err(Error::WriteReadError)
    }

    async fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error<I::Error>> {
        self.i2c
            .write(self.address, &[reg, value])
            .await
            .map_err(Error::WriteError)
    }

    pub async fn disable_sleep(&mut self) -> Result<(), Error<I::Error>> {
        let mut value = [0; 1];
        self.read_registers(REG_PWR_MGMT_1, &mut value).await?;
        self.write_register(REG_PWR_MGMT_1, value[0] & !SLEEP_BIT)
            .await
    }

    /// Raw signed 16-bit sample.
    pub async fn raw(&mut self) -> Result<RawAccel, Error<I::Error>> {
        let mut data = [0; 6];
        self.read_registers(REG_ACCEL_XOUT_H, &mut data).await?;
        Ok(RawAccel::from_bytes(data))
    }
}

impl<I> AsyncAccelerationSource for I2cAccelerometer<I>
where
    I: I2c,
{
    type Error = Error<I::Error>;

    async fn read(&mut self) -> Result<Vector3, Self::Error> {
        Ok(self.raw().await?.normalized())
    }
}
