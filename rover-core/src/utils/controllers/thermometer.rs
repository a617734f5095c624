//! Temperature sensing.
//!
//! The rover carries an ADT7410 on the shared I2C bus. The main loop only
//! depends on [`Thermometer`], so other sensors can be swapped in.

use embedded_hal::i2c::I2c;

/// Default I2C address of the ADT7410 (A0 and A1 low).
pub const ADT7410_ADDRESS: u8 = 0x48;

const REG_TEMP_MSB: u8 = 0x00;
const REG_CONFIG: u8 = 0x03;
const REG_ID: u8 = 0x0B;

/// Manufacturer bits of the ID register.
const ID_MASK: u8 = 0xF8;
const ID_ADT7410: u8 = 0xC8;

/// Config register value for continuous 16-bit conversions.
const CONFIG_16_BIT: u8 = 0x80;

/// LSB weight of a 16-bit reading is 1/128 °C.
const COUNTS_PER_DEGREE: f32 = 128.0;

/// A temperature sensor reporting degrees Celsius.
pub trait Thermometer {
    type Error: core::fmt::Debug;

    /// Probe and configure the sensor. Called once at start-up.
    fn begin(&mut self) -> Result<(), Self::Error>;

    fn read_celsius(&mut self) -> Result<f32, Self::Error>;
}

/// Errors that can occur when talking to the ADT7410.
#[derive(Debug)]
pub enum Adt7410Error<E: core::fmt::Debug> {
    I2c(E),
    /// The ID register did not identify an ADT7410.
    NotFound { id: u8 },
}

/// ADT7410 driver over a blocking I2C device.
pub struct Adt7410<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C, E> Adt7410<I2C>
where
    I2C: I2c<Error = E>,
    E: core::fmt::Debug,
{
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, ADT7410_ADDRESS)
    }

    pub fn with_address(
        i2c: I2C,
        address: u8,
    ) -> Self {
        Self { i2c, address }
    }

    fn read_register(
        &mut self,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), Adt7410Error<E>> {
        self.i2c
            .write_read(self.address, &[register], buf)
            .map_err(Adt7410Error::I2c)
    }
}

impl<I2C, E> Thermometer for Adt7410<I2C>
where
    I2C: I2c<Error = E>,
    E: core::fmt::Debug,
{
    type Error = Adt7410Error<E>;

    fn begin(&mut self) -> Result<(), Self::Error> {
        let mut id = [0u8; 1];
        self.read_register(REG_ID, &mut id)?;
        if id[0] & ID_MASK != ID_ADT7410 {
            return Err(Adt7410Error::NotFound { id: id[0] });
        }

        self.i2c
            .write(self.address, &[REG_CONFIG, CONFIG_16_BIT])
            .map_err(Adt7410Error::I2c)?;
        tracing::info!("ADT7410 found at 0x{:02X}", self.address);
        Ok(())
    }

    fn read_celsius(&mut self) -> Result<f32, Self::Error> {
        let mut raw = [0u8; 2];
        self.read_register(REG_TEMP_MSB, &mut raw)?;
        Ok(i16::from_be_bytes(raw) as f32 / COUNTS_PER_DEGREE)
    }
}
