//! Utility re-exports for the rover firmware.
//!
//! This module re-exports the configuration, the radio protocol, the actuator
//! controllers and the wheel mapping used by the main loop:
//!
//! - `config`: compile-time defaults and host overrides for every constant
//! - `connection`: radio transport seam and the `"<id>,<verb>"` wire format
//! - `controllers`: actuator drivers, the dispatch table and the main loop
//! - `math`: maneuver to per-wheel direction mapping for the skid-steer base

pub mod config;
pub mod connection;
pub mod controllers;
pub mod math;

pub use config::{RoverConfig, RoverId};
pub use connection::protocol::{Command, DecodeError, Verb};
pub use connection::radio::Radio;
pub use controllers::{ActuatorBank, Dispatch, LoopState, RoverController};
pub use embassy_time::Duration;
pub use math::kinematics::{Maneuver, WheelDirections};
