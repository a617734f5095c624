use core::cell::RefCell;

use embedded_hal::delay::DelayNs;
use embedded_hal_bus::i2c::RefCellDevice;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};
use rover_core::utils::{
    controllers::{
        motors::{Direction, Drivetrain, MotorDriver, MotorPort, MotorShield},
        thermometer::{Adt7410, Adt7410Error, Thermometer},
    },
    Duration, Maneuver,
};

/// Default I2C address of the motor shield.
pub const SHIELD_ADDRESS: u8 = 0x60;
/// Default I2C address of the temperature sensor.
pub const ADT7410_ADDRESS: u8 = 0x48;

/// Create a write transaction for the given I2C address and data payload.
pub fn write(
    addr: u8,
    data: Vec<u8>,
) -> I2cTrans {
    I2cTrans::write(addr, data)
}
/// Create a write_read transaction for the given I2C address/payloads.
pub fn write_read(
    addr: u8,
    write: Vec<u8>,
    read: Vec<u8>,
) -> I2cTrans {
    I2cTrans::write_read(addr, write, read)
}

/// Channel register write putting `off` on a PCA9685 channel register.
fn channel(
    reg: u8,
    off: u16,
) -> I2cTrans {
    let [lo, hi] = off.to_le_bytes();
    write(SHIELD_ADDRESS, vec![reg, 0x00, 0x00, lo, hi])
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(
        &mut self,
        _ns: u32,
    ) {
    }
}

#[test]
fn test_shield_begin() {
    // enable, then prescale 3 with the sleep/wake dance
    let expectations = [
        write(SHIELD_ADDRESS, vec![0x00, 0x01]),
        write(SHIELD_ADDRESS, vec![0x00, 0x11]),
        write(SHIELD_ADDRESS, vec![0xFE, 3]),
        write(SHIELD_ADDRESS, vec![0x00, 0x01]),
    ];

    let mock = I2cMock::new(&expectations);
    let i2c_bus = RefCell::new(mock);
    let mut shield = MotorShield::new(RefCellDevice::new(&i2c_bus)).unwrap();
    shield.begin().unwrap();
    i2c_bus.borrow_mut().done();
}

#[test]
fn test_shield_speed_and_direction_m1() {
    let expectations = [
        write(SHIELD_ADDRESS, vec![0x00, 0x01]),
        write(SHIELD_ADDRESS, vec![0x00, 0x11]),
        write(SHIELD_ADDRESS, vec![0xFE, 3]),
        write(SHIELD_ADDRESS, vec![0x00, 0x01]),
        // auto-increment before the first channel write
        write(SHIELD_ADDRESS, vec![0x00, 0x21]),
        // M1 pwm on C8, speed 150 * 16
        channel(0x26, 2400),
        // forward: in2 (C9) low, in1 (C10) high
        channel(0x2A, 0),
        channel(0x2E, 4095),
        // backward: in1 low, in2 high
        channel(0x2E, 0),
        channel(0x2A, 4095),
        // release: both low
        channel(0x2E, 0),
        channel(0x2A, 0),
    ];

    let mock = I2cMock::new(&expectations);
    let i2c_bus = RefCell::new(mock);
    let mut shield = MotorShield::new(RefCellDevice::new(&i2c_bus)).unwrap();
    shield.begin().unwrap();
    shield.set_speed(MotorPort::M1, 150).unwrap();
    shield.run(MotorPort::M1, Direction::Forward).unwrap();
    shield.run(MotorPort::M1, Direction::Backward).unwrap();
    shield.run(MotorPort::M1, Direction::Release).unwrap();
    i2c_bus.borrow_mut().done();
}

#[test]
fn test_drivetrain_release_all() {
    // fresh chip: auto-increment on top of the sleeping default mode
    let expectations = [
        write(SHIELD_ADDRESS, vec![0x00, 0x31]),
        channel(0x2E, 0),
        channel(0x2A, 0),
        channel(0x32, 0),
        channel(0x36, 0),
        channel(0x16, 0),
        channel(0x12, 0),
        channel(0x1A, 0),
        channel(0x1E, 0),
    ];

    let mock = I2cMock::new(&expectations);
    let i2c_bus = RefCell::new(mock);
    let shield = MotorShield::new(RefCellDevice::new(&i2c_bus)).unwrap();
    let mut drivetrain = Drivetrain::new(shield);
    drivetrain.release_all().unwrap();
    i2c_bus.borrow_mut().done();
}

#[test]
fn test_drivetrain_pivot_left() {
    let expectations = [
        write(SHIELD_ADDRESS, vec![0x00, 0x31]),
        // speed on M1..M4 pwm channels C8, C13, C2, C7
        channel(0x26, 1600),
        channel(0x3A, 1600),
        channel(0x0E, 1600),
        channel(0x22, 1600),
        // M1 backward: in1 C10 low, in2 C9 high
        channel(0x2E, 0),
        channel(0x2A, 4095),
        // M2 backward: in1 C11 low, in2 C12 high
        channel(0x32, 0),
        channel(0x36, 4095),
        // M3 forward: in2 C3 low, in1 C4 high
        channel(0x12, 0),
        channel(0x16, 4095),
        // M4 forward: in2 C6 low, in1 C5 high
        channel(0x1E, 0),
        channel(0x1A, 4095),
        // release
        channel(0x2E, 0),
        channel(0x2A, 0),
        channel(0x32, 0),
        channel(0x36, 0),
        channel(0x16, 0),
        channel(0x12, 0),
        channel(0x1A, 0),
        channel(0x1E, 0),
    ];

    let mock = I2cMock::new(&expectations);
    let i2c_bus = RefCell::new(mock);
    let shield = MotorShield::new(RefCellDevice::new(&i2c_bus)).unwrap();
    let mut drivetrain = Drivetrain::new(shield);
    drivetrain
        .run_for(Maneuver::PivotLeft, 100, Duration::from_millis(100), &mut NoDelay)
        .unwrap();
    i2c_bus.borrow_mut().done();
}

#[test]
fn test_adt7410_begin_and_read() {
    let expectations = [
        write_read(ADT7410_ADDRESS, vec![0x0B], vec![0xCB]),
        write(ADT7410_ADDRESS, vec![0x03, 0x80]),
        // 23.5 C = 3008 counts
        write_read(ADT7410_ADDRESS, vec![0x00], vec![0x0B, 0xC0]),
        // -10 C = -1280 counts
        write_read(ADT7410_ADDRESS, vec![0x00], vec![0xFB, 0x00]),
    ];

    let mock = I2cMock::new(&expectations);
    let i2c_bus = RefCell::new(mock);
    let mut sensor = Adt7410::new(RefCellDevice::new(&i2c_bus));
    sensor.begin().unwrap();
    assert_eq!(sensor.read_celsius().unwrap(), 23.5);
    assert_eq!(sensor.read_celsius().unwrap(), -10.0);
    i2c_bus.borrow_mut().done();
}

#[test]
fn test_adt7410_wrong_id() {
    let expectations = [write_read(ADT7410_ADDRESS, vec![0x0B], vec![0x00])];

    let mock = I2cMock::new(&expectations);
    let i2c_bus = RefCell::new(mock);
    let mut sensor = Adt7410::new(RefCellDevice::new(&i2c_bus));
    assert!(matches!(
        sensor.begin(),
        Err(Adt7410Error::NotFound { id: 0x00 })
    ));
    i2c_bus.borrow_mut().done();
}

#[test]
fn test_shared_bus_bring_up() {
    // shield and sensor on one bus, brought up in firmware order
    let expectations = [
        write(SHIELD_ADDRESS, vec![0x00, 0x01]),
        write(SHIELD_ADDRESS, vec![0x00, 0x11]),
        write(SHIELD_ADDRESS, vec![0xFE, 3]),
        write(SHIELD_ADDRESS, vec![0x00, 0x01]),
        write_read(ADT7410_ADDRESS, vec![0x0B], vec![0xC8]),
        write(ADT7410_ADDRESS, vec![0x03, 0x80]),
    ];

    let mock = I2cMock::new(&expectations);
    let i2c_bus = RefCell::new(mock);
    let mut shield = MotorShield::new(RefCellDevice::new(&i2c_bus)).unwrap();
    let mut sensor = Adt7410::new(RefCellDevice::new(&i2c_bus));
    shield.begin().unwrap();
    sensor.begin().unwrap();
    i2c_bus.borrow_mut().done();
}
