//! RGB indicator for the rover.
//!
//! Drives the single on-board NeoPixel through `SmartLedsWrite`. Colors are
//! staged with `set_color`/`clear` and only reach the hardware on `show`,
//! the same two-step model as the Adafruit NeoPixel library.

use smart_leds_trait::{SmartLedsWrite, RGB8};

/// Number of pixels in the indicator.
const PIXEL_COUNT: usize = 1;

const OFF: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// Staged color buffer over an addressable LED driver.
pub struct Indicator<Driver> {
    driver: Driver,
    pixels: [RGB8; PIXEL_COUNT],
    brightness: u8,
}

impl<Driver, E> Indicator<Driver>
where
    Driver: SmartLedsWrite<Color = RGB8, Error = E>,
{
    /// Create an indicator at full brightness with every pixel off.
    pub fn new(driver: Driver) -> Self {
        Self {
            driver,
            pixels: [OFF; PIXEL_COUNT],
            brightness: u8::MAX,
        }
    }

    /// Set the brightness and push a blank frame to the strip.
    pub fn begin(
        &mut self,
        brightness: u8,
    ) -> Result<(), E> {
        self.set_brightness(brightness);
        self.clear();
        self.show()
    }

    /// Scale applied to every channel on `show` (0-255).
    pub fn set_brightness(
        &mut self,
        brightness: u8,
    ) {
        self.brightness = brightness;
    }

    /// Stage a color on every pixel.
    pub fn set_color(
        &mut self,
        r: u8,
        g: u8,
        b: u8,
    ) {
        self.pixels = [RGB8 { r, g, b }; PIXEL_COUNT];
    }

    /// Stage all pixels off.
    pub fn clear(&mut self) {
        self.pixels = [OFF; PIXEL_COUNT];
    }

    /// Write the staged pixels to the hardware.
    pub fn show(&mut self) -> Result<(), E> {
        let brightness = self.brightness;
        let frame = self.pixels.map(|c| scale(c, brightness));
        self.driver.write(frame.into_iter())
    }
}

/// NeoPixel brightness scaling, `(c * (b + 1)) >> 8`.
fn scale(
    color: RGB8,
    brightness: u8,
) -> RGB8 {
    let level = brightness as u16 + 1;
    let ch = |c: u8| ((c as u16 * level) >> 8) as u8;
    RGB8 {
        r: ch(color.r),
        g: ch(color.g),
        b: ch(color.b),
    }
}
