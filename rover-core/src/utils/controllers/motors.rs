//! DC motor control for the rover's four wheels.
//!
//! The wheels hang off an Adafruit Motor Shield V2: a PCA9685 PWM controller
//! whose outputs feed two TB6612 H-bridges. Each motor port uses three PCA9685
//! channels, one PWM line for speed and two inputs for direction.

use embassy_time::Duration;
use embedded_hal::{delay::DelayNs, i2c::I2c};
use pwm_pca9685::{Address as PwmAddress, Channel, Error as PwmError, Pca9685};

use crate::utils::math::kinematics::{Maneuver, Wheel, WheelDirections};

/// Default I2C address of the motor shield.
pub const SHIELD_ADDRESS: u8 = 0x60;

/// PCA9685 prescale for a ~1.6 kHz PWM frequency.
pub const SHIELD_PRESCALE: u8 = 3;

/// Full-scale duty of a PCA9685 channel.
const MAX_DUTY: u16 = 4095;

/// Speed (0-255) to PCA9685 duty scaling.
const SPEED_TO_DUTY: u16 = 16;

/// Run state of one DC motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    /// Both bridge inputs low; the motor coasts.
    Release,
}

impl Direction {
    /// Forward and backward swapped, release unchanged.
    pub const fn reversed(self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
            Direction::Release => Direction::Release,
        }
    }
}

/// Motor terminals on the shield, M1 through M4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorPort {
    M1,
    M2,
    M3,
    M4,
}

impl MotorPort {
    /// `(pwm, in1, in2)` channels wired to this port on the shield.
    const fn channels(self) -> (Channel, Channel, Channel) {
        match self {
            MotorPort::M1 => (Channel::C8, Channel::C10, Channel::C9),
            MotorPort::M2 => (Channel::C13, Channel::C11, Channel::C12),
            MotorPort::M3 => (Channel::C2, Channel::C4, Channel::C3),
            MotorPort::M4 => (Channel::C7, Channel::C5, Channel::C6),
        }
    }
}

/// A driver for four independently driven DC motors.
pub trait MotorDriver {
    type Error: core::fmt::Debug;

    /// Probe and configure the driver. Called once at start-up.
    fn begin(&mut self) -> Result<(), Self::Error>;

    /// Set the speed used by the next `run` on this port (0-255).
    fn set_speed(
        &mut self,
        port: MotorPort,
        speed: u8,
    ) -> Result<(), Self::Error>;

    fn run(
        &mut self,
        port: MotorPort,
        direction: Direction,
    ) -> Result<(), Self::Error>;
}

/// Errors raised by the motor shield.
#[derive(Debug)]
pub enum ShieldError<E: core::fmt::Debug> {
    PwmError(PwmError<E>),
}

impl<E: core::fmt::Debug> From<PwmError<E>> for ShieldError<E> {
    fn from(e: PwmError<E>) -> Self {
        ShieldError::PwmError(e)
    }
}

/// Adafruit Motor Shield V2 over I2C.
pub struct MotorShield<I2C> {
    pwm: Pca9685<I2C>,
}

impl<I2C, E> MotorShield<I2C>
where
    I2C: I2c<Error = E>,
    E: core::fmt::Debug,
{
    /// Create a shield driver at the default address.
    pub fn new(i2c: I2C) -> Result<Self, ShieldError<E>> {
        Self::with_address(i2c, SHIELD_ADDRESS)
    }

    /// Create a shield driver for a board with its address jumpers set.
    pub fn with_address(
        i2c: I2C,
        address: u8,
    ) -> Result<Self, ShieldError<E>> {
        let pwm = Pca9685::new(i2c, PwmAddress::from(address))?;
        Ok(Self { pwm })
    }

    /// Drive a bridge input fully high or low.
    fn set_pin(
        &mut self,
        channel: Channel,
        high: bool,
    ) -> Result<(), ShieldError<E>> {
        let off = if high { MAX_DUTY } else { 0 };
        self.pwm.set_channel_on_off(channel, 0, off)?;
        Ok(())
    }
}

impl<I2C, E> MotorDriver for MotorShield<I2C>
where
    I2C: I2c<Error = E>,
    E: core::fmt::Debug,
{
    type Error = ShieldError<E>;

    fn begin(&mut self) -> Result<(), Self::Error> {
        self.pwm.enable()?;
        self.pwm.set_prescale(SHIELD_PRESCALE)?;
        tracing::info!("Motor shield enabled, prescale {}", SHIELD_PRESCALE);
        Ok(())
    }

    fn set_speed(
        &mut self,
        port: MotorPort,
        speed: u8,
    ) -> Result<(), Self::Error> {
        let (pwm, _, _) = port.channels();
        self.pwm
            .set_channel_on_off(pwm, 0, speed as u16 * SPEED_TO_DUTY)?;
        Ok(())
    }

    fn run(
        &mut self,
        port: MotorPort,
        direction: Direction,
    ) -> Result<(), Self::Error> {
        let (_, in1, in2) = port.channels();
        match direction {
            Direction::Forward => {
                self.set_pin(in2, false)?;
                self.set_pin(in1, true)
            }
            Direction::Backward => {
                self.set_pin(in1, false)?;
                self.set_pin(in2, true)
            }
            Direction::Release => {
                self.set_pin(in1, false)?;
                self.set_pin(in2, false)
            }
        }
    }
}

/// Which shield port drives each wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelLayout {
    pub front_left: MotorPort,
    pub rear_left: MotorPort,
    pub rear_right: MotorPort,
    pub front_right: MotorPort,
}

impl WheelLayout {
    pub const fn port(
        &self,
        wheel: Wheel,
    ) -> MotorPort {
        match wheel {
            Wheel::FrontLeft => self.front_left,
            Wheel::RearLeft => self.rear_left,
            Wheel::RearRight => self.rear_right,
            Wheel::FrontRight => self.front_right,
        }
    }
}

impl Default for WheelLayout {
    fn default() -> Self {
        Self {
            front_left: MotorPort::M1,
            rear_left: MotorPort::M2,
            rear_right: MotorPort::M3,
            front_right: MotorPort::M4,
        }
    }
}

/// The four wheels driven together.
pub struct Drivetrain<M> {
    motors: M,
    layout: WheelLayout,
}

impl<M: MotorDriver> Drivetrain<M> {
    pub fn new(motors: M) -> Self {
        Self::with_layout(motors, WheelLayout::default())
    }

    pub fn with_layout(
        motors: M,
        layout: WheelLayout,
    ) -> Self {
        Self { motors, layout }
    }

    pub fn begin(&mut self) -> Result<(), M::Error> {
        self.motors.begin()
    }

    /// Set `speed` on every wheel, run `maneuver` for `duration`, then release.
    ///
    /// Blocks on `delay` for the whole duration. If a motor call fails, the
    /// wheels are released before the error is returned.
    pub fn run_for<D: DelayNs>(
        &mut self,
        maneuver: Maneuver,
        speed: u8,
        duration: Duration,
        delay: &mut D,
    ) -> Result<(), M::Error> {
        let spin = self
            .set_speed_all(speed)
            .and_then(|()| self.apply(&maneuver.wheel_directions()));

        if let Err(e) = spin {
            let _ = self.release_all();
            return Err(e);
        }

        delay.delay_ms(duration.as_millis() as u32);
        self.release_all()
    }

    /// Coast all four wheels.
    pub fn release_all(&mut self) -> Result<(), M::Error> {
        self.apply(&WheelDirections::uniform(Direction::Release))
    }

    fn set_speed_all(
        &mut self,
        speed: u8,
    ) -> Result<(), M::Error> {
        for wheel in Wheel::ALL {
            self.motors.set_speed(self.layout.port(wheel), speed)?;
        }
        Ok(())
    }

    fn apply(
        &mut self,
        directions: &WheelDirections,
    ) -> Result<(), M::Error> {
        for (wheel, direction) in directions.iter() {
            self.motors.run(self.layout.port(wheel), direction)?;
        }
        Ok(())
    }

    pub fn motors(&mut self) -> &mut M {
        &mut self.motors
    }
}
