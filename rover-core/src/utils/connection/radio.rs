//! Half-duplex packet radio seam.
//!
//! The vendor LoRa driver lives outside this crate. The main loop only needs
//! the bring-up calls, a blocking receive and a fire-and-forget transmit.

/// A half-duplex packet radio such as an RFM95 LoRa module.
pub trait Radio {
    type Error: core::fmt::Debug;

    /// Configure chip-select, reset and interrupt lines.
    fn initialise_pins(&mut self) -> Result<(), Self::Error>;

    /// Pulse the module's reset line.
    fn reset(&mut self) -> Result<(), Self::Error>;

    /// Bring the modem up in packet mode.
    fn initialise(&mut self) -> Result<(), Self::Error>;

    fn set_frequency(
        &mut self,
        hz: u32,
    ) -> Result<(), Self::Error>;

    fn set_power(
        &mut self,
        dbm: i8,
    ) -> Result<(), Self::Error>;

    /// Send one packet. No acknowledgement is expected.
    fn transmit(
        &mut self,
        payload: &[u8],
    ) -> Result<(), Self::Error>;

    /// Block until a packet arrives, copy it into `buf` and return its length.
    ///
    /// Packets longer than `buf` are truncated.
    fn blocking_receive(
        &mut self,
        buf: &mut [u8],
    ) -> Result<usize, Self::Error>;
}
