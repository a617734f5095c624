//! Piezo buzzer seam.
//!
//! Tone generation is board specific (a PWM slice or a timer toggling a pin),
//! so the rover only depends on this trait.

/// A buzzer that can hold a square-wave tone until told to stop.
pub trait Buzzer {
    type Error: core::fmt::Debug;

    /// Configure the output pin. The buzzer must be silent afterwards.
    fn begin(&mut self) -> Result<(), Self::Error> {
        self.silence()
    }

    /// Start a tone at `hz`. Returns immediately; the tone keeps playing.
    fn tone(
        &mut self,
        hz: u32,
    ) -> Result<(), Self::Error>;

    fn silence(&mut self) -> Result<(), Self::Error>;
}
