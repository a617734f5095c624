//! Command protocol spoken over the radio link.
//!
//! A command is a single ASCII packet `"<rover_id>,<verb>"`, for example
//! `"1,forward"`. There is no checksum, addressing or acknowledgement beyond
//! the id field; anything that does not decode is dropped.
//!
//! # Example
//! ```rust
//! use rover_core::utils::connection::protocol::{Command, Verb};
//! let cmd = Command::parse("1,forward").unwrap();
//! assert_eq!(cmd.rover_id, "1");
//! assert_eq!(cmd.verb, Verb::Forward);
//! assert!(Command::parse("1forward").is_err());
//! ```

use core::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Separator between the id field and the verb.
pub const DELIMITER: char = ',';

/// Upper bound on a telemetry packet, `"<id>,<celsius>"`.
pub const TELEMETRY_CAPACITY: usize = 20;

/// Formatted telemetry packet.
pub type TelemetryPacket = heapless::String<TELEMETRY_CAPACITY>;

/// Action keyword of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    /// Cycle the indicator through red, green and blue.
    Test,
    Forward,
    Backward,
    /// Pivot counter-clockwise.
    Left,
    /// Pivot clockwise.
    Right,
    /// Release all wheels.
    Stop,
    /// Reserved; does nothing.
    Start,
    /// Short buzzer tone.
    Beep,
}

impl Verb {
    pub const ALL: [Verb; 8] = [
        Verb::Test,
        Verb::Forward,
        Verb::Backward,
        Verb::Left,
        Verb::Right,
        Verb::Stop,
        Verb::Start,
        Verb::Beep,
    ];

    /// Wire spelling of the verb.
    pub const fn as_str(self) -> &'static str {
        match self {
            Verb::Test => "test",
            Verb::Forward => "forward",
            Verb::Backward => "backward",
            Verb::Left => "left",
            Verb::Right => "right",
            Verb::Stop => "stop",
            Verb::Start => "start",
            Verb::Beep => "beep",
        }
    }
}

impl FromStr for Verb {
    type Err = DecodeError;

    /// Case-sensitive, untrimmed match against the eight wire spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Verb::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or(DecodeError::UnknownVerb)
    }
}

impl fmt::Display for Verb {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a received payload did not decode into a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    NotUtf8,
    MissingDelimiter,
    ExtraDelimiter,
    EmptyRoverId,
    EmptyVerb,
    UnknownVerb,
}

/// One decoded command, borrowing its id from the receive buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command<'a> {
    pub rover_id: &'a str,
    pub verb: Verb,
}

impl<'a> Command<'a> {
    pub fn new(
        rover_id: &'a str,
        verb: Verb,
    ) -> Self {
        Self { rover_id, verb }
    }

    /// Split on the first delimiter and look the verb up.
    pub fn parse(text: &'a str) -> Result<Self, DecodeError> {
        let (rover_id, verb) = text
            .split_once(DELIMITER)
            .ok_or(DecodeError::MissingDelimiter)?;

        if verb.contains(DELIMITER) {
            return Err(DecodeError::ExtraDelimiter);
        }
        if rover_id.is_empty() {
            return Err(DecodeError::EmptyRoverId);
        }
        if verb.is_empty() {
            return Err(DecodeError::EmptyVerb);
        }

        Ok(Self {
            rover_id,
            verb: verb.parse()?,
        })
    }

    /// Decode raw packet bytes as received from the radio.
    pub fn decode(payload: &'a [u8]) -> Result<Self, DecodeError> {
        let text = core::str::from_utf8(payload).map_err(|_| DecodeError::NotUtf8)?;
        Self::parse(text)
    }
}

impl fmt::Display for Command<'_> {
    /// Renders the wire form, `"<rover_id>,<verb>"`.
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}{}{}", self.rover_id, DELIMITER, self.verb)
    }
}

/// Format a temperature reading as `"<rover_id>,<celsius to 1 decimal>"`.
///
/// Fails only if the result would not fit in [`TELEMETRY_CAPACITY`] bytes.
pub fn format_telemetry(
    rover_id: &str,
    celsius: f32,
) -> Result<TelemetryPacket, fmt::Error> {
    use core::fmt::Write;

    let mut packet = TelemetryPacket::new();
    write!(packet, "{rover_id}{DELIMITER}{celsius:.1}")?;
    Ok(packet)
}
