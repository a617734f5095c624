//! Module Exports
//!
//! This file exports the actuator drivers and ties them together into the
//! rover's dispatch table and main loop.
//!
//! - `motors`: motor shield driver and the four-wheel drivetrain.
//! - `leds`: RGB indicator over an addressable LED driver.
//! - `buzzer`: tone output seam.
//! - `thermometer`: temperature sensor seam and the ADT7410 driver.

pub mod buzzer;
pub mod leds;
pub mod motors;
pub mod thermometer;

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use smart_leds_trait::{SmartLedsWrite, RGB8};

pub use buzzer::Buzzer;
pub use leds::Indicator;
pub use motors::{Direction, Drivetrain, MotorDriver, MotorPort, MotorShield};
pub use thermometer::{Adt7410, Thermometer};

use crate::utils::{
    config::RoverConfig,
    connection::{
        protocol::{format_telemetry, Command, DecodeError, Verb},
        radio::Radio,
    },
    math::kinematics::Maneuver,
};

/// Largest payload the LoRa modem delivers in one packet.
pub const RX_BUFFER_LEN: usize = 251;

/// Component that failed to come up during bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    Radio,
    MotorShield,
    Thermometer,
    Buzzer,
    Indicator,
}

/// Actuator whose call failed part way through an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    Motor,
    Indicator,
    Buzzer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryError {
    Sensor,
    /// Packet did not fit the telemetry buffer.
    Format,
    Radio,
}

/// What became of one received payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The verb's action ran to completion.
    Executed(Verb),
    /// Well-formed, but addressed to another rover.
    Foreign,
    /// Did not decode; nothing was done.
    Dropped(DecodeError),
    /// An actuator call failed during the action.
    Failed(Verb, ActionError),
}

/// Every actuator on the rover plus the delay source timed actions block on.
pub struct ActuatorBank<M, L, B, T, D> {
    pub drivetrain: Drivetrain<M>,
    pub indicator: Indicator<L>,
    pub buzzer: B,
    pub thermometer: T,
    delay: D,
}

impl<M, L, B, T, D> ActuatorBank<M, L, B, T, D>
where
    M: MotorDriver,
    L: SmartLedsWrite<Color = RGB8>,
    L::Error: core::fmt::Debug,
    B: Buzzer,
    T: Thermometer,
    D: DelayNs,
{
    pub fn new(
        motors: M,
        leds: L,
        buzzer: B,
        thermometer: T,
        delay: D,
    ) -> Self {
        Self {
            drivetrain: Drivetrain::new(motors),
            indicator: Indicator::new(leds),
            buzzer,
            thermometer,
            delay,
        }
    }

    /// Bring up every actuator in the order the board expects.
    pub fn begin(
        &mut self,
        config: &RoverConfig,
    ) -> Result<(), InitError> {
        self.drivetrain.begin().map_err(|error| {
            tracing::error!(?error, "Could not find motor shield");
            InitError::MotorShield
        })?;
        self.thermometer.begin().map_err(|error| {
            tracing::error!(?error, "Could not find temperature sensor");
            InitError::Thermometer
        })?;
        self.buzzer.begin().map_err(|error| {
            tracing::error!(?error, "Buzzer init failed");
            InitError::Buzzer
        })?;
        self.indicator.begin(config.brightness).map_err(|error| {
            tracing::error!(?error, "Indicator init failed");
            InitError::Indicator
        })?;
        Ok(())
    }

    /// Run the action bound to `verb`, blocking until it completes.
    pub fn execute(
        &mut self,
        verb: Verb,
        config: &RoverConfig,
    ) -> Result<(), ActionError> {
        tracing::debug!("Command: {}", verb);
        match verb {
            Verb::Test => self.flash_test_sequence(config.test_level, config.test_hold()),
            Verb::Forward => self.drive(Maneuver::Forward, config),
            Verb::Backward => self.drive(Maneuver::Backward, config),
            Verb::Left => self.drive(Maneuver::PivotLeft, config),
            Verb::Right => self.drive(Maneuver::PivotRight, config),
            Verb::Stop => self.drivetrain.release_all().map_err(|error| {
                tracing::error!(?error, "Motor release failed");
                ActionError::Motor
            }),
            // Reserved, no behaviour defined yet.
            Verb::Start => Ok(()),
            Verb::Beep => self.beep(config.beep_hz, config.beep_duration()),
        }
    }

    /// Block the loop for `duration`.
    pub fn pause(
        &mut self,
        duration: Duration,
    ) {
        self.delay.delay_ms(duration.as_millis() as u32);
    }

    fn drive(
        &mut self,
        maneuver: Maneuver,
        config: &RoverConfig,
    ) -> Result<(), ActionError> {
        self.drivetrain
            .run_for(
                maneuver,
                config.motor_speed,
                config.motion_duration(),
                &mut self.delay,
            )
            .map_err(|error| {
                tracing::error!(?error, ?maneuver, "Drive failed");
                ActionError::Motor
            })
    }

    /// Red, green, blue, each held for `hold`, then off.
    fn flash_test_sequence(
        &mut self,
        level: u8,
        hold: Duration,
    ) -> Result<(), ActionError> {
        let led_err = |error: L::Error| {
            tracing::error!(?error, "Indicator write failed");
            ActionError::Indicator
        };

        self.indicator.clear();
        for (r, g, b) in [(level, 0, 0), (0, level, 0), (0, 0, level)] {
            self.indicator.set_color(r, g, b);
            self.indicator.show().map_err(led_err)?;
            self.pause(hold);
        }
        self.indicator.clear();
        self.indicator.show().map_err(led_err)
    }

    fn beep(
        &mut self,
        hz: u32,
        duration: Duration,
    ) -> Result<(), ActionError> {
        if let Err(error) = self.buzzer.tone(hz) {
            tracing::error!(?error, "Buzzer tone failed");
            let _ = self.buzzer.silence();
            return Err(ActionError::Buzzer);
        }
        self.pause(duration);
        self.buzzer.silence().map_err(|error| {
            tracing::error!(?error, "Buzzer silence failed");
            ActionError::Buzzer
        })
    }
}

/// Act on `command` if it is addressed to this rover.
#[tracing::instrument(level = "debug", skip_all, fields(rover_id = command.rover_id, verb = %command.verb))]
pub fn dispatch<M, L, B, T, D>(
    bank: &mut ActuatorBank<M, L, B, T, D>,
    config: &RoverConfig,
    command: &Command<'_>,
) -> Dispatch
where
    M: MotorDriver,
    L: SmartLedsWrite<Color = RGB8>,
    L::Error: core::fmt::Debug,
    B: Buzzer,
    T: Thermometer,
    D: DelayNs,
{
    if !config.rover_id.matches(command.rover_id) {
        tracing::debug!("Ignoring command for another rover");
        return Dispatch::Foreign;
    }

    match bank.execute(command.verb, config) {
        Ok(()) => Dispatch::Executed(command.verb),
        Err(e) => Dispatch::Failed(command.verb, e),
    }
}

/// Position of the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Hardware not yet brought up.
    Init,
    /// Blocked on the radio.
    AwaitCommand,
    /// A packet is in the receive buffer.
    Dispatching,
    /// Bring-up failed; the rover does nothing until power-cycled.
    Halted(InitError),
}

/// The rover's single sequential control loop.
pub struct RoverController<R, M, L, B, T, D> {
    radio: R,
    bank: ActuatorBank<M, L, B, T, D>,
    config: RoverConfig,
    state: LoopState,
    rx: [u8; RX_BUFFER_LEN],
    rx_len: usize,
    last_dispatch: Option<Dispatch>,
}

impl<R, M, L, B, T, D> RoverController<R, M, L, B, T, D>
where
    R: Radio,
    M: MotorDriver,
    L: SmartLedsWrite<Color = RGB8>,
    L::Error: core::fmt::Debug,
    B: Buzzer,
    T: Thermometer,
    D: DelayNs,
{
    pub fn new(
        radio: R,
        bank: ActuatorBank<M, L, B, T, D>,
        config: RoverConfig,
    ) -> Self {
        Self {
            radio,
            bank,
            config,
            state: LoopState::Init,
            rx: [0; RX_BUFFER_LEN],
            rx_len: 0,
            last_dispatch: None,
        }
    }

    /// Run forever. Parks the CPU if bring-up fails.
    pub fn run(&mut self) -> ! {
        loop {
            if let LoopState::Halted(component) = self.step() {
                tracing::error!(?component, "Bring-up failed, halting");
                loop {
                    core::hint::spin_loop();
                }
            }
        }
    }

    /// Advance the state machine by one transition and return the new state.
    pub fn step(&mut self) -> LoopState {
        self.state = match self.state {
            LoopState::Init => match self.bring_up() {
                Ok(()) => {
                    tracing::info!(rover_id = %self.config.rover_id, "Rover ready");
                    LoopState::AwaitCommand
                }
                Err(component) => LoopState::Halted(component),
            },
            LoopState::AwaitCommand => self.await_command(),
            LoopState::Dispatching => {
                let outcome = self.dispatch_received();
                self.last_dispatch = Some(outcome);

                if self.config.telemetry {
                    if let Err(error) = self.transmit_temperature() {
                        tracing::warn!(?error, "Telemetry not sent");
                    }
                }

                self.bank.pause(self.config.idle_delay());
                LoopState::AwaitCommand
            }
            halted @ LoopState::Halted(_) => halted,
        };
        self.state
    }

    fn bring_up(&mut self) -> Result<(), InitError> {
        let freq = self.config.radio_frequency_hz;
        let power = self.config.radio_power_dbm;

        Self::init_radio(&mut self.radio, freq, power).map_err(|error| {
            tracing::error!(?error, "Radio init failed");
            InitError::Radio
        })?;
        tracing::info!("Radio up at {} Hz, {} dBm", freq, power);

        self.bank.begin(&self.config)
    }

    fn init_radio(
        radio: &mut R,
        freq: u32,
        power: i8,
    ) -> Result<(), R::Error> {
        radio.initialise_pins()?;
        radio.reset()?;
        radio.initialise()?;
        radio.set_frequency(freq)?;
        radio.set_power(power)
    }

    fn await_command(&mut self) -> LoopState {
        match self.radio.blocking_receive(&mut self.rx) {
            Ok(0) => {
                self.bank.pause(self.config.idle_delay());
                LoopState::AwaitCommand
            }
            Ok(len) => {
                self.rx_len = len.min(RX_BUFFER_LEN);
                LoopState::Dispatching
            }
            Err(error) => {
                tracing::warn!(?error, "Receive failed");
                self.bank.pause(self.config.idle_delay());
                LoopState::AwaitCommand
            }
        }
    }

    fn dispatch_received(&mut self) -> Dispatch {
        let payload = &self.rx[..self.rx_len];
        match Command::decode(payload) {
            Ok(command) => {
                tracing::debug!(%command, "Received");
                dispatch(&mut self.bank, &self.config, &command)
            }
            Err(reason) => {
                tracing::debug!(?reason, len = payload.len(), "Dropping packet");
                Dispatch::Dropped(reason)
            }
        }
    }

    /// Decode and dispatch one payload directly, bypassing the radio.
    pub fn handle_payload(
        &mut self,
        payload: &[u8],
    ) -> Dispatch {
        match Command::decode(payload) {
            Ok(command) => dispatch(&mut self.bank, &self.config, &command),
            Err(reason) => Dispatch::Dropped(reason),
        }
    }

    /// Read the sensor and broadcast `"<rover_id>,<celsius>"`.
    pub fn transmit_temperature(&mut self) -> Result<(), TelemetryError> {
        let c = self.bank.thermometer.read_celsius().map_err(|error| {
            tracing::error!(?error, "Temperature read failed");
            TelemetryError::Sensor
        })?;
        let f = c * 9.0 / 5.0 + 32.0;
        tracing::debug!("Temp: {}*C\t{}*F", c, f);

        let packet = format_telemetry(self.config.rover_id.as_str(), c)
            .map_err(|_| TelemetryError::Format)?;
        self.radio.transmit(packet.as_bytes()).map_err(|error| {
            tracing::error!(?error, "Telemetry transmit failed");
            TelemetryError::Radio
        })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Outcome of the most recent `Dispatching` step.
    pub fn last_dispatch(&self) -> Option<Dispatch> {
        self.last_dispatch
    }

    pub fn config(&self) -> &RoverConfig {
        &self.config
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    pub fn bank_mut(&mut self) -> &mut ActuatorBank<M, L, B, T, D> {
        &mut self.bank
    }
}
