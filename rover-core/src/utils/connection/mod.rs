//! Module Exports
//!
//! This file exports the modules used to talk to the rover over the radio link.
//!
//! # Modules
//! - `protocol`: the `"<rover_id>,<verb>"` command format and telemetry packets.
//! - `radio`: the half-duplex packet radio seam.

pub mod protocol;
pub mod radio;
