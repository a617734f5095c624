//! Rover configuration.
//!
//! `RoverConfig::default()` carries the values the firmware is built with.
//! Hosts may deserialize overrides; any field left out keeps its default.

use embassy_time::Duration;
use serde::Deserialize;

/// Maximum length of a rover identity string.
pub const ROVER_ID_CAPACITY: usize = 8;

/// Identity compiled into the firmware.
pub const DEFAULT_ROVER_ID: &str = "1";

/// Address string this device answers to. Never changes after start-up.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "heapless::String<ROVER_ID_CAPACITY>")]
pub struct RoverId(heapless::String<ROVER_ID_CAPACITY>);

/// A configured identity was empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyRoverId;

impl core::fmt::Display for EmptyRoverId {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.write_str("rover id must not be empty")
    }
}

impl TryFrom<heapless::String<ROVER_ID_CAPACITY>> for RoverId {
    type Error = EmptyRoverId;

    fn try_from(id: heapless::String<ROVER_ID_CAPACITY>) -> Result<Self, Self::Error> {
        if id.is_empty() {
            return Err(EmptyRoverId);
        }
        Ok(Self(id))
    }
}

impl RoverId {
    /// Build an identity, or `None` if it is empty or longer than
    /// [`ROVER_ID_CAPACITY`] bytes.
    pub fn new(id: &str) -> Option<Self> {
        if id.is_empty() {
            return None;
        }
        let mut s = heapless::String::new();
        s.push_str(id).ok()?;
        Some(Self(s))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Exact, case-sensitive comparison against a received id field.
    pub fn matches(
        &self,
        candidate: &str,
    ) -> bool {
        self.0.as_str() == candidate
    }
}

impl Default for RoverId {
    fn default() -> Self {
        let mut s = heapless::String::new();
        // DEFAULT_ROVER_ID is one byte, always fits
        let _ = s.push_str(DEFAULT_ROVER_ID);
        Self(s)
    }
}

impl core::fmt::Display for RoverId {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every tunable of the rover in one place.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoverConfig {
    pub rover_id: RoverId,
    /// Wheel speed for motion verbs (0-255).
    pub motor_speed: u8,
    /// How long a motion verb drives before releasing the wheels.
    pub motion_ms: u32,
    /// Hold time of each color in the `test` sequence.
    pub test_hold_ms: u32,
    /// Channel level used for the red, green and blue test colors.
    pub test_level: u8,
    pub beep_hz: u32,
    pub beep_ms: u32,
    /// Pause after every loop iteration, matched or not.
    pub idle_ms: u32,
    /// Initial indicator brightness (0-255).
    pub brightness: u8,
    pub radio_frequency_hz: u32,
    pub radio_power_dbm: i8,
    /// Broadcast a temperature reading after each dispatched command.
    pub telemetry: bool,
}

impl Default for RoverConfig {
    fn default() -> Self {
        Self {
            rover_id: RoverId::default(),
            motor_speed: 150,
            motion_ms: 100,
            test_hold_ms: 1000,
            test_level: 150,
            beep_hz: 1000,
            beep_ms: 100,
            idle_ms: 10,
            brightness: 100,
            radio_frequency_hz: 915_000_000,
            radio_power_dbm: 23,
            telemetry: false,
        }
    }
}

impl RoverConfig {
    pub fn motion_duration(&self) -> Duration {
        Duration::from_millis(self.motion_ms as u64)
    }

    pub fn test_hold(&self) -> Duration {
        Duration::from_millis(self.test_hold_ms as u64)
    }

    pub fn beep_duration(&self) -> Duration {
        Duration::from_millis(self.beep_ms as u64)
    }

    pub fn idle_delay(&self) -> Duration {
        Duration::from_millis(self.idle_ms as u64)
    }
}
