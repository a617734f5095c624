//! Math utilities for the rover.
//!
//! This module maps drive maneuvers onto the four wheels of a skid-steer base.

pub mod kinematics;
