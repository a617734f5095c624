//! Command dispatch, actuator drivers and the main loop for a LoRa-controlled
//! four-wheel rover on no-std embedded platforms.
//!
//! For a host-side run of the same loop, see the `mock-rover` binary in the
//! workspace.
#![no_std]

pub mod utils;
