//! Colours used by drawing operations.

/// RGBA colour used for drawing commands.
///
/// Channels are stored as straight (non premultiplied) `u8` values in the
/// range `0 ..= 255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (opacity)
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const GREEN: Color = Color::rgb(0, 0xff, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 0xff);
    /// Fully transparent black. Freshly allocated surfaces start out this way.
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    /// Creates a new colour from `u8` channel values.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    /// Creates a fully opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color::new(r, g, b, 0xff)
    }

    /// Returns the channels as `f64` values in the range `0.0 ..= 1.0`, in
    /// `(r, g, b, a)` order.
    pub fn to_f64(self) -> (f64, f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
            self.a as f64 / 255.0,
        )
    }

    /// Returns the colour as RGBA8 bytes.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl From<[u8; 4]> for Color {
    fn from(px: [u8; 4]) -> Self {
        Color::new(px[0], px[1], px[2], px[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_opaque() {
        for c in [Color::BLACK, Color::WHITE, Color::GREEN, Color::BLUE] {
            assert_eq!(c.a, 255);
        }
        assert_eq!(Color::TRANSPARENT.a, 0);
    }

    #[test]
    fn rgba8_conversion() {
        let c = Color::new(1, 2, 3, 4);
        assert_eq!(Color::from(c.to_rgba8()), c);
        assert_eq!(Color::BLUE.to_f64(), (0.0, 0.0, 1.0, 1.0));
    }
}
