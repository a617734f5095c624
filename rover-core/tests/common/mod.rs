//! Recording fakes for the rover's hardware seams.
//!
//! Every fake appends to one shared event log stamped with a fake clock that
//! only advances when the code under test delays.
#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    convert::Infallible,
    rc::Rc,
};

use embedded_hal::delay::DelayNs;
use rover_core::utils::{
    controllers::{
        motors::{Direction, MotorDriver, MotorPort},
        ActuatorBank, Buzzer, RoverController, Thermometer,
    },
    Radio, RoverConfig,
};
use smart_leds_trait::{SmartLedsWrite, RGB8};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Speed(MotorPort, u8),
    Run(MotorPort, Direction),
    Show(RGB8),
    Tone(u32),
    Silence,
    Transmit(Vec<u8>),
}

impl Event {
    pub fn is_motor(&self) -> bool {
        matches!(self, Event::Speed(..) | Event::Run(..))
    }

    pub fn is_buzzer(&self) -> bool {
        matches!(self, Event::Tone(_) | Event::Silence)
    }
}

/// Shared log and clock handed to every fake.
#[derive(Clone, Default)]
pub struct Bench {
    log: Rc<RefCell<Vec<(u64, Event)>>>,
    clock_ns: Rc<Cell<u64>>,
}

impl Bench {
    pub fn now_ms(&self) -> u64 {
        self.clock_ns.get() / 1_000_000
    }

    fn record(
        &self,
        event: Event,
    ) {
        self.log.borrow_mut().push((self.now_ms(), event));
    }

    /// All events with their timestamps in milliseconds.
    pub fn stamped(&self) -> Vec<(u64, Event)> {
        self.log.borrow().clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().iter().map(|(_, e)| e.clone()).collect()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

#[derive(Debug)]
pub struct FakeError;

pub struct FakeMotors {
    pub bench: Bench,
    pub present: bool,
    pub fail_run: bool,
}

impl MotorDriver for FakeMotors {
    type Error = FakeError;

    fn begin(&mut self) -> Result<(), Self::Error> {
        if self.present { Ok(()) } else { Err(FakeError) }
    }

    fn set_speed(
        &mut self,
        port: MotorPort,
        speed: u8,
    ) -> Result<(), Self::Error> {
        self.bench.record(Event::Speed(port, speed));
        Ok(())
    }

    fn run(
        &mut self,
        port: MotorPort,
        direction: Direction,
    ) -> Result<(), Self::Error> {
        if self.fail_run && direction != Direction::Release {
            return Err(FakeError);
        }
        self.bench.record(Event::Run(port, direction));
        Ok(())
    }
}

pub struct FakeLeds {
    pub bench: Bench,
}

impl SmartLedsWrite for FakeLeds {
    type Color = RGB8;
    type Error = Infallible;

    fn write<T, I>(
        &mut self,
        iterator: T,
    ) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        for c in iterator {
            self.bench.record(Event::Show(c.into()));
        }
        Ok(())
    }
}

pub struct FakeBuzzer {
    pub bench: Bench,
}

impl Buzzer for FakeBuzzer {
    type Error = FakeError;

    fn tone(
        &mut self,
        hz: u32,
    ) -> Result<(), Self::Error> {
        self.bench.record(Event::Tone(hz));
        Ok(())
    }

    fn silence(&mut self) -> Result<(), Self::Error> {
        self.bench.record(Event::Silence);
        Ok(())
    }
}

pub struct FakeThermometer {
    pub present: bool,
    pub celsius: f32,
}

impl Thermometer for FakeThermometer {
    type Error = FakeError;

    fn begin(&mut self) -> Result<(), Self::Error> {
        if self.present { Ok(()) } else { Err(FakeError) }
    }

    fn read_celsius(&mut self) -> Result<f32, Self::Error> {
        Ok(self.celsius)
    }
}

pub struct FakeDelay {
    pub bench: Bench,
}

impl DelayNs for FakeDelay {
    fn delay_ns(
        &mut self,
        ns: u32,
    ) {
        let clock = &self.bench.clock_ns;
        clock.set(clock.get() + ns as u64);
    }

    fn delay_ms(
        &mut self,
        ms: u32,
    ) {
        let clock = &self.bench.clock_ns;
        clock.set(clock.get() + ms as u64 * 1_000_000);
    }
}

#[derive(Debug, PartialEq)]
pub enum FakeRadioError {
    /// Inbox is empty; stands in for a receive timeout or a corrupt packet.
    Nothing,
    Dead,
}

pub struct FakeRadio {
    pub bench: Bench,
    pub inbox: VecDeque<Vec<u8>>,
    pub alive: bool,
    pub receives: usize,
    pub frequency: Option<u32>,
    pub power: Option<i8>,
}

impl FakeRadio {
    pub fn new(bench: Bench) -> Self {
        Self {
            bench,
            inbox: VecDeque::new(),
            alive: true,
            receives: 0,
            frequency: None,
            power: None,
        }
    }

    fn check(&self) -> Result<(), FakeRadioError> {
        if self.alive { Ok(()) } else { Err(FakeRadioError::Dead) }
    }
}

impl Radio for FakeRadio {
    type Error = FakeRadioError;

    fn initialise_pins(&mut self) -> Result<(), Self::Error> {
        self.check()
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.check()
    }

    fn initialise(&mut self) -> Result<(), Self::Error> {
        self.check()
    }

    fn set_frequency(
        &mut self,
        hz: u32,
    ) -> Result<(), Self::Error> {
        self.frequency = Some(hz);
        self.check()
    }

    fn set_power(
        &mut self,
        dbm: i8,
    ) -> Result<(), Self::Error> {
        self.power = Some(dbm);
        self.check()
    }

    fn transmit(
        &mut self,
        payload: &[u8],
    ) -> Result<(), Self::Error> {
        self.bench.record(Event::Transmit(payload.to_vec()));
        Ok(())
    }

    fn blocking_receive(
        &mut self,
        buf: &mut [u8],
    ) -> Result<usize, Self::Error> {
        self.receives += 1;
        let packet = self.inbox.pop_front().ok_or(FakeRadioError::Nothing)?;
        let len = packet.len().min(buf.len());
        buf[..len].copy_from_slice(&packet[..len]);
        Ok(len)
    }
}

pub type FakeBank = ActuatorBank<FakeMotors, FakeLeds, FakeBuzzer, FakeThermometer, FakeDelay>;

pub type FakeRover =
    RoverController<FakeRadio, FakeMotors, FakeLeds, FakeBuzzer, FakeThermometer, FakeDelay>;

/// Knobs for building a rig with missing or failing hardware.
pub struct RigOptions {
    pub motors_present: bool,
    pub thermometer_present: bool,
    pub radio_alive: bool,
    pub motors_fail_run: bool,
    pub celsius: f32,
}

impl Default for RigOptions {
    fn default() -> Self {
        Self {
            motors_present: true,
            thermometer_present: true,
            radio_alive: true,
            motors_fail_run: false,
            celsius: 21.0,
        }
    }
}

pub fn bank(
    bench: &Bench,
    options: &RigOptions,
) -> FakeBank {
    ActuatorBank::new(
        FakeMotors {
            bench: bench.clone(),
            present: options.motors_present,
            fail_run: options.motors_fail_run,
        },
        FakeLeds {
            bench: bench.clone(),
        },
        FakeBuzzer {
            bench: bench.clone(),
        },
        FakeThermometer {
            present: options.thermometer_present,
            celsius: options.celsius,
        },
        FakeDelay {
            bench: bench.clone(),
        },
    )
}

/// Config with full brightness so indicator frames carry the raw colors.
pub fn test_config() -> RoverConfig {
    RoverConfig {
        brightness: u8::MAX,
        ..RoverConfig::default()
    }
}

pub fn rig_with(
    config: RoverConfig,
    options: RigOptions,
) -> (FakeRover, Bench) {
    let bench = Bench::default();
    let mut radio = FakeRadio::new(bench.clone());
    radio.alive = options.radio_alive;
    let rover = RoverController::new(radio, bank(&bench, &options), config);
    (rover, bench)
}

pub fn rig() -> (FakeRover, Bench) {
    rig_with(test_config(), RigOptions::default())
}
