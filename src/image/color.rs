/// A 24-bit RGB color packed as `0x00RRGGBB`.
///
/// Red lives in bits 16–23, green in bits 8–15 and blue in bits 0–7. The top
/// byte is always zero, so every channel is a plain `u8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedColor(u32);

impl PackedColor {
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);
    pub const WHITE: Self = Self::from_rgb(u8::MAX, u8::MAX, u8::MAX);

    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(u32::from_be_bytes([0, red, green, blue]))
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Channels in `[red, green, blue]` order.
    pub const fn channels(self) -> [u8; 3] {
        let [_, red, green, blue] = self.0.to_be_bytes();
        [red, green, blue]
    }

    pub const fn red(self) -> u8 {
        self.channels()[0]
    }

    pub const fn green(self) -> u8 {
        self.channels()[1]
    }

    pub const fn blue(self) -> u8 {
        self.channels()[2]
    }
}

impl From<[u8; 3]> for PackedColor {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self::from_rgb(red, green, blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_channels_into_expected_bits() {
        let color = PackedColor::from_rgb(0x12, 0x34, 0x56);
        assert_eq!(color.raw(), 0x0012_3456);
        assert_eq!(color.channels(), [0x12, 0x34, 0x56]);
        assert_eq!(
            (color.red(), color.green(), color.blue()),
            (0x12, 0x34, 0x56)
        );
    }

    #[test]
    fn top_byte_is_always_clear() {
        let color = PackedColor::from([0xFF, 0xFF, 0xFF]);
        assert_eq!(color.raw() >> 24, 0);
        assert_eq!(color, PackedColor::WHITE);
    }

    #[test]
    fn white_and_black_constants() {
        assert_eq!(PackedColor::WHITE.raw(), 0x00FF_FFFF);
        assert_eq!(PackedColor::BLACK.raw(), 0);
        assert_eq!(PackedColor::default(), PackedColor::BLACK);
    }
}
